//! Demo catalog
//!
//! Loads a small set of categories and products into an empty store so the
//! API has something to show. Does nothing if the store already has data.

use crate::storage::{InventoryStore, ItemQuery, NewCategory, NewItem, StorageResult};

struct DemoCategory {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
}

struct DemoProduct {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    price: f64,
    quantity: i64,
    min_stock_level: i64,
    sku: &'static str,
    barcode: &'static str,
    supplier: &'static str,
}

const CATEGORIES: &[DemoCategory] = &[
    DemoCategory { name: "Electronics", description: "Electronic devices and accessories", icon: "📱", color: "bg-blue-500" },
    DemoCategory { name: "Clothing", description: "Apparel and fashion items", icon: "👕", color: "bg-purple-500" },
    DemoCategory { name: "Home & Garden", description: "Home improvement and gardening supplies", icon: "🏠", color: "bg-green-500" },
    DemoCategory { name: "Sports & Outdoors", description: "Sports equipment and outdoor gear", icon: "⚽", color: "bg-orange-500" },
    DemoCategory { name: "Books & Media", description: "Books, movies, and media content", icon: "📚", color: "bg-indigo-500" },
    DemoCategory { name: "Health & Beauty", description: "Health and beauty products", icon: "💄", color: "bg-pink-500" },
    DemoCategory { name: "Automotive", description: "Car parts and automotive supplies", icon: "🚗", color: "bg-gray-500" },
    DemoCategory { name: "Toys & Games", description: "Toys and gaming products", icon: "🎮", color: "bg-red-500" },
    DemoCategory { name: "Food & Beverages", description: "Food items and beverages", icon: "🍕", color: "bg-yellow-500" },
    DemoCategory { name: "Office Supplies", description: "Office and business supplies", icon: "📋", color: "bg-teal-500" },
];

const PRODUCTS: &[DemoProduct] = &[
    DemoProduct { name: "iPhone 15 Pro", description: "Latest Apple smartphone", category: "Electronics", price: 999.0, quantity: 50, min_stock_level: 10, sku: "IP15P-001", barcode: "1234567890123", supplier: "Apple Inc." },
    DemoProduct { name: "Samsung Galaxy S24", description: "Flagship Android phone", category: "Electronics", price: 849.0, quantity: 35, min_stock_level: 10, sku: "SGS24-001", barcode: "1234567890124", supplier: "Samsung" },
    DemoProduct { name: "MacBook Air M3", description: "13-inch laptop with M3 chip", category: "Electronics", price: 1299.0, quantity: 25, min_stock_level: 5, sku: "MBA-M3-001", barcode: "1234567890125", supplier: "Apple Inc." },
    DemoProduct { name: "Nike Air Max 270", description: "Comfortable running shoes", category: "Clothing", price: 150.0, quantity: 80, min_stock_level: 20, sku: "NAM270-001", barcode: "2234567890123", supplier: "Nike" },
    DemoProduct { name: "Levi's 501 Jeans", description: "Classic straight-leg jeans", category: "Clothing", price: 89.0, quantity: 120, min_stock_level: 25, sku: "LV501-001", barcode: "2234567890124", supplier: "Levi Strauss" },
    DemoProduct { name: "Dyson V15 Detect", description: "Cordless vacuum cleaner", category: "Home & Garden", price: 449.0, quantity: 30, min_stock_level: 8, sku: "DV15D-001", barcode: "3234567890123", supplier: "Dyson" },
    DemoProduct { name: "Instant Pot Duo 7-in-1", description: "Multi-use pressure cooker", category: "Home & Garden", price: 99.0, quantity: 45, min_stock_level: 12, sku: "IPD7-001", barcode: "3234567890124", supplier: "Instant Brands" },
    DemoProduct { name: "Wilson Pro Staff Tennis Racket", description: "Professional tennis racket", category: "Sports & Outdoors", price: 199.0, quantity: 40, min_stock_level: 10, sku: "WPS-001", barcode: "4234567890123", supplier: "Wilson" },
    DemoProduct { name: "Yeti Rambler Tumbler", description: "Insulated travel mug", category: "Sports & Outdoors", price: 35.0, quantity: 100, min_stock_level: 25, sku: "YRT-001", barcode: "4234567890124", supplier: "Yeti" },
    DemoProduct { name: "The Psychology of Money", description: "Financial wisdom book", category: "Books & Media", price: 18.0, quantity: 75, min_stock_level: 20, sku: "POM-001", barcode: "5234567890123", supplier: "Harriman House" },
    DemoProduct { name: "L'Oreal Paris Lipstick", description: "Rouge signature matte lipstick", category: "Health & Beauty", price: 12.0, quantity: 150, min_stock_level: 30, sku: "LOR-LS-001", barcode: "6234567890123", supplier: "L'Oreal" },
    DemoProduct { name: "Mobil 1 Motor Oil", description: "Synthetic motor oil 5W-30", category: "Automotive", price: 28.0, quantity: 60, min_stock_level: 15, sku: "MOB1-5W30", barcode: "7234567890123", supplier: "ExxonMobil" },
    DemoProduct { name: "LEGO Creator Expert Set", description: "Advanced building set for adults", category: "Toys & Games", price: 89.0, quantity: 35, min_stock_level: 8, sku: "LEGO-CE-001", barcode: "8234567890123", supplier: "LEGO Group" },
    DemoProduct { name: "Organic Coffee Beans", description: "Premium arabica coffee beans", category: "Food & Beverages", price: 15.0, quantity: 200, min_stock_level: 50, sku: "OCB-001", barcode: "9234567890123", supplier: "Green Mountain Coffee" },
    DemoProduct { name: "Staples Copy Paper", description: "White multipurpose paper 500 sheets", category: "Office Supplies", price: 8.0, quantity: 300, min_stock_level: 75, sku: "SCP-500", barcode: "1034567890123", supplier: "Staples" },
];

/// What a seed run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { categories: usize, items: usize },
    /// The store already had categories or items
    Skipped,
}

/// Load the demo catalog into an empty store
pub fn seed_demo_catalog(store: &InventoryStore) -> StorageResult<SeedOutcome> {
    let has_items = !store.list_items(&ItemQuery::new().limit(1))?.is_empty();
    if has_items || !store.list_categories()?.is_empty() {
        tracing::info!("Store already has data, skipping demo catalog");
        return Ok(SeedOutcome::Skipped);
    }

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for demo in CATEGORIES {
        let category = store.create_category(
            NewCategory::new(demo.name)
                .description(demo.description)
                .icon(demo.icon)
                .color(demo.color),
        )?;
        category_ids.push((demo.name, category.id));
    }

    for demo in PRODUCTS {
        let mut new = NewItem::new(demo.name, demo.price)
            .description(demo.description)
            .quantity(demo.quantity)
            .min_stock_level(demo.min_stock_level)
            .sku(demo.sku)
            .barcode(demo.barcode)
            .supplier(demo.supplier);
        if let Some((_, id)) = category_ids.iter().find(|(name, _)| *name == demo.category) {
            new = new.category(*id);
        }
        store.create_item(new, None)?;
    }

    tracing::info!(
        categories = CATEGORIES.len(),
        items = PRODUCTS.len(),
        "Seeded demo catalog"
    );

    Ok(SeedOutcome::Seeded {
        categories: CATEGORIES.len(),
        items: PRODUCTS.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_product_has_a_category() {
        for product in PRODUCTS {
            assert!(
                CATEGORIES.iter().any(|c| c.name == product.category),
                "{} has unknown category {}",
                product.name,
                product.category
            );
        }
    }

    #[test]
    fn test_seed_is_idempotent() {
        let store = InventoryStore::open_in_memory().unwrap();

        let first = seed_demo_catalog(&store).unwrap();
        assert_eq!(
            first,
            SeedOutcome::Seeded {
                categories: 10,
                items: 15
            }
        );

        let second = seed_demo_catalog(&store).unwrap();
        assert_eq!(second, SeedOutcome::Skipped);

        let stats = store.inventory_stats(7).unwrap();
        assert_eq!(stats.total_products, 15);
        assert_eq!(stats.categories, 10);

        let phone = store.find_by_barcode("1234567890123").unwrap().unwrap();
        assert_eq!(phone.category.unwrap().name, "Electronics");
    }
}
