//! Inventory statistics
//!
//! Aggregates computed in SQL over the current item table.

use crate::storage::error::StorageResult;
use crate::storage::store::{opt_uuid_col, InventoryStore};
use crate::storage::types::{CategoryBreakdown, InventoryStats};
use chrono::{Duration, Utc};
use rusqlite::params;

impl InventoryStore {
    /// Compute stats; items created within `recent_days` count as recently added
    pub fn inventory_stats(&self, recent_days: u32) -> StorageResult<InventoryStats> {
        let since = Utc::now() - Duration::days(i64::from(recent_days));
        let conn = self.conn()?;

        let (total_products, total_value, total_cost, low_stock_items, out_of_stock_items, recently_added) =
            conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(price * quantity), 0.0),
                        COALESCE(SUM(COALESCE(cost_price, 0.0) * quantity), 0.0),
                        COALESCE(SUM(CASE WHEN quantity <= min_stock_level THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN quantity = 0 THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN created_at >= ?1 THEN 1 ELSE 0 END), 0)
                 FROM items",
                params![since],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                },
            )?;

        let categories: i64 =
            conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            "SELECT c.id, COALESCE(c.name, 'Uncategorized') AS category_name,
                    COUNT(*), COALESCE(SUM(i.price * i.quantity), 0.0)
             FROM items i
             LEFT JOIN categories c ON c.id = i.category_id
             GROUP BY c.id
             ORDER BY COUNT(*) DESC, category_name COLLATE NOCASE",
        )?;
        let by_category = stmt
            .query_map([], |row| {
                Ok(CategoryBreakdown {
                    id: opt_uuid_col(row, 0)?,
                    name: row.get(1)?,
                    product_count: row.get(2)?,
                    total_value: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(InventoryStats {
            total_products,
            total_value,
            total_cost,
            potential_profit: total_value - total_cost,
            low_stock_items,
            out_of_stock_items,
            categories,
            recently_added,
            by_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::{NewCategory, NewItem};

    #[test]
    fn test_empty_inventory_stats() {
        let store = InventoryStore::open_in_memory().unwrap();
        let stats = store.inventory_stats(7).unwrap();

        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_value, 0.0);
        assert_eq!(stats.low_stock_items, 0);
        assert!(stats.by_category.is_empty());
    }

    #[test]
    fn test_inventory_stats() {
        let store = InventoryStore::open_in_memory().unwrap();
        let electronics = store
            .create_category(NewCategory::new("Electronics"))
            .unwrap();
        store.create_category(NewCategory::new("Empty")).unwrap();

        store
            .create_item(
                NewItem::new("Phone", 100.0)
                    .cost_price(60.0)
                    .quantity(10)
                    .category(electronics.id),
                None,
            )
            .unwrap();
        store
            .create_item(
                NewItem::new("Cable", 5.0)
                    .cost_price(1.0)
                    .quantity(2)
                    .category(electronics.id),
                None,
            )
            .unwrap();
        store
            .create_item(NewItem::new("Sold out", 9.0).quantity(0), None)
            .unwrap();

        let stats = store.inventory_stats(7).unwrap();

        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.total_value, 1010.0);
        assert_eq!(stats.total_cost, 602.0);
        assert_eq!(stats.potential_profit, 408.0);
        assert_eq!(stats.low_stock_items, 2);
        assert_eq!(stats.out_of_stock_items, 1);
        assert_eq!(stats.categories, 2);
        assert_eq!(stats.recently_added, 3);

        assert_eq!(stats.by_category.len(), 2);
        assert_eq!(stats.by_category[0].id, Some(electronics.id));
        assert_eq!(stats.by_category[0].product_count, 2);
        assert_eq!(stats.by_category[0].total_value, 1010.0);
        assert_eq!(stats.by_category[1].id, None);
        assert_eq!(stats.by_category[1].name, "Uncategorized");
    }

    #[test]
    fn test_zero_day_window_counts_nothing_as_recent() {
        let store = InventoryStore::open_in_memory().unwrap();
        store.create_item(NewItem::new("Old", 1.0), None).unwrap();

        let stats = store.inventory_stats(0).unwrap();
        assert_eq!(stats.recently_added, 0);
        assert_eq!(store.inventory_stats(1).unwrap().recently_added, 1);
    }
}
