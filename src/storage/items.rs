//! Item operations on the inventory store
//!
//! Reads always come back as `ItemDetail`, with the category name and the
//! creator joined in. Barcodes are unique among items that have one; a
//! blank barcode is stored as NULL so it never collides.

use crate::storage::categories::fetch_category;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::store::{clean_text, opt_uuid_col, sql_bound, uuid_col, InventoryStore};
use crate::storage::types::{
    CategoryRef, Item, ItemDetail, ItemQuery, ItemUpdate, NewItem, SortKey, SortOrder, UserRef,
};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const SELECT_DETAIL: &str = "
    SELECT i.id, i.name, i.description, i.category_id, i.price, i.cost_price,
           i.quantity, i.min_stock_level, i.sku, i.barcode, i.image, i.supplier,
           i.created_by, i.created_at, i.updated_at,
           c.name, u.email, u.full_name
    FROM items i
    LEFT JOIN categories c ON c.id = i.category_id
    LEFT JOIN users u ON u.id = i.created_by";

impl InventoryStore {
    /// Create an item, recording who created it
    pub fn create_item(&self, new: NewItem, created_by: Option<Uuid>) -> StorageResult<ItemDetail> {
        let barcode = clean_text(new.barcode);
        let conn = self.conn()?;

        if let Some(category_id) = new.category_id {
            ensure_category_exists(&conn, category_id)?;
        }
        if let Some(code) = barcode.as_deref() {
            ensure_barcode_free(&conn, code, None)?;
        }

        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            description: clean_text(new.description),
            category_id: new.category_id,
            price: new.price,
            cost_price: new.cost_price,
            quantity: new.quantity,
            min_stock_level: new.min_stock_level,
            sku: clean_text(new.sku),
            barcode,
            image: clean_text(new.image),
            supplier: clean_text(new.supplier),
            created_by,
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            "INSERT INTO items (id, name, description, category_id, price, cost_price,
                                quantity, min_stock_level, sku, barcode, image, supplier,
                                created_by, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                item.id.to_string(),
                item.name,
                item.description,
                item.category_id.map(|id| id.to_string()),
                item.price,
                item.cost_price,
                item.quantity,
                item.min_stock_level,
                item.sku,
                item.barcode,
                item.image,
                item.supplier,
                item.created_by.map(|id| id.to_string()),
                item.created_at,
                item.updated_at,
            ],
        )?;

        tracing::info!(item_id = %item.id, name = %item.name, quantity = item.quantity, "Created item");

        fetch_item(&conn, item.id)?.ok_or_else(|| StorageError::NotFound("Item".to_string()))
    }

    pub fn get_item(&self, id: Uuid) -> StorageResult<Option<ItemDetail>> {
        let conn = self.conn()?;
        fetch_item(&conn, id)
    }

    /// Barcode scan lookup
    pub fn find_by_barcode(&self, barcode: &str) -> StorageResult<Option<ItemDetail>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                &format!("{} WHERE i.barcode = ?1", SELECT_DETAIL),
                params![barcode.trim()],
                detail_from_row,
            )
            .optional()?;
        Ok(item)
    }

    pub fn barcode_exists(&self, barcode: &str) -> StorageResult<bool> {
        let conn = self.conn()?;
        barcode_owner(&conn, barcode).map(|owner| owner.is_some())
    }

    /// List items matching the query's filters, in the requested order
    pub fn list_items(&self, query: &ItemQuery) -> StorageResult<Vec<ItemDetail>> {
        let mut sql = format!("{} WHERE 1 = 1", SELECT_DETAIL);
        let mut args: Vec<Value> = Vec::new();

        if let Some(term) = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            args.push(Value::Text(term.to_lowercase()));
            let n = args.len();
            sql.push_str(&format!(
                " AND (instr(lower(i.name), ?{n}) > 0
                   OR instr(lower(COALESCE(i.description, '')), ?{n}) > 0
                   OR instr(lower(COALESCE(i.sku, '')), ?{n}) > 0
                   OR instr(lower(COALESCE(i.barcode, '')), ?{n}) > 0)",
                n = n
            ));
        }

        if let Some(category_id) = query.category_id {
            args.push(Value::Text(category_id.to_string()));
            sql.push_str(&format!(" AND i.category_id = ?{}", args.len()));
        }

        if query.low_stock {
            sql.push_str(" AND i.quantity <= i.min_stock_level");
        }

        let key = match query.sort {
            SortKey::Name => "i.name COLLATE NOCASE",
            SortKey::Price => "i.price",
            SortKey::Stock => "i.quantity",
            SortKey::Category => "COALESCE(c.name, '') COLLATE NOCASE",
            SortKey::Created => "i.created_at",
        };
        let direction = match query.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        sql.push_str(&format!(
            " ORDER BY {} {}, i.name COLLATE NOCASE, i.id",
            key, direction
        ));

        // SQLite needs a LIMIT before an OFFSET; -1 means unbounded
        if query.limit.is_some() || query.offset.is_some() {
            let limit = query.limit.map(sql_bound).unwrap_or(-1);
            let offset = query.offset.map(sql_bound).unwrap_or(0);
            sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
        }

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params_from_iter(args.iter()), detail_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Items at or under their minimum stock level, emptiest first
    pub fn low_stock_items(&self) -> StorageResult<Vec<ItemDetail>> {
        self.list_items(
            &ItemQuery::new()
                .low_stock()
                .sort(SortKey::Stock, SortOrder::Asc),
        )
    }

    /// Apply a partial update; blank text fields clear the stored value
    pub fn update_item(&self, id: Uuid, update: ItemUpdate) -> StorageResult<ItemDetail> {
        let conn = self.conn()?;
        let mut item = fetch_item(&conn, id)?
            .ok_or_else(|| StorageError::NotFound("Item".to_string()))?
            .item;

        if let Some(name) = update.name {
            item.name = name.trim().to_string();
        }
        if update.description.is_some() {
            item.description = clean_text(update.description);
        }
        if let Some(category_id) = update.category_id {
            ensure_category_exists(&conn, category_id)?;
            item.category_id = Some(category_id);
        }
        if let Some(price) = update.price {
            item.price = price;
        }
        if let Some(cost) = update.cost_price {
            item.cost_price = Some(cost);
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity;
        }
        if let Some(level) = update.min_stock_level {
            item.min_stock_level = level;
        }
        if update.sku.is_some() {
            item.sku = clean_text(update.sku);
        }
        if update.barcode.is_some() {
            let barcode = clean_text(update.barcode);
            if let Some(code) = barcode.as_deref() {
                ensure_barcode_free(&conn, code, Some(id))?;
            }
            item.barcode = barcode;
        }
        if update.image.is_some() {
            item.image = clean_text(update.image);
        }
        if update.supplier.is_some() {
            item.supplier = clean_text(update.supplier);
        }
        item.updated_at = Utc::now();

        conn.execute(
            "UPDATE items SET name = ?1, description = ?2, category_id = ?3, price = ?4,
                              cost_price = ?5, quantity = ?6, min_stock_level = ?7, sku = ?8,
                              barcode = ?9, image = ?10, supplier = ?11, updated_at = ?12
             WHERE id = ?13",
            params![
                item.name,
                item.description,
                item.category_id.map(|id| id.to_string()),
                item.price,
                item.cost_price,
                item.quantity,
                item.min_stock_level,
                item.sku,
                item.barcode,
                item.image,
                item.supplier,
                item.updated_at,
                item.id.to_string(),
            ],
        )?;

        fetch_item(&conn, id)?.ok_or_else(|| StorageError::NotFound("Item".to_string()))
    }

    /// Delete an item and its transactions, returning the removed item
    pub fn delete_item(&self, id: Uuid) -> StorageResult<ItemDetail> {
        let conn = self.conn()?;
        let item =
            fetch_item(&conn, id)?.ok_or_else(|| StorageError::NotFound("Item".to_string()))?;

        conn.execute("DELETE FROM items WHERE id = ?1", params![id.to_string()])?;

        tracing::info!(item_id = %id, "Deleted item");
        Ok(item)
    }
}

pub(crate) fn fetch_item(conn: &Connection, id: Uuid) -> StorageResult<Option<ItemDetail>> {
    let item = conn
        .query_row(
            &format!("{} WHERE i.id = ?1", SELECT_DETAIL),
            params![id.to_string()],
            detail_from_row,
        )
        .optional()?;
    Ok(item)
}

fn ensure_category_exists(conn: &Connection, category_id: Uuid) -> StorageResult<()> {
    match fetch_category(conn, category_id)? {
        Some(_) => Ok(()),
        None => Err(StorageError::InvalidReference(format!(
            "Category {} does not exist",
            category_id
        ))),
    }
}

fn barcode_owner(conn: &Connection, barcode: &str) -> StorageResult<Option<String>> {
    let owner = conn
        .query_row(
            "SELECT id FROM items WHERE barcode = ?1",
            params![barcode.trim()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(owner)
}

fn ensure_barcode_free(conn: &Connection, barcode: &str, exclude: Option<Uuid>) -> StorageResult<()> {
    if let Some(owner) = barcode_owner(conn, barcode)? {
        if exclude.map(|id| id.to_string()) != Some(owner) {
            return Err(StorageError::Conflict(format!(
                "Barcode '{}' is already assigned to another item",
                barcode
            )));
        }
    }
    Ok(())
}

fn detail_from_row(row: &Row<'_>) -> rusqlite::Result<ItemDetail> {
    let item = Item {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category_id: opt_uuid_col(row, 3)?,
        price: row.get(4)?,
        cost_price: row.get(5)?,
        quantity: row.get(6)?,
        min_stock_level: row.get(7)?,
        sku: row.get(8)?,
        barcode: row.get(9)?,
        image: row.get(10)?,
        supplier: row.get(11)?,
        created_by: opt_uuid_col(row, 12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    };

    let category_name: Option<String> = row.get(15)?;
    let creator_email: Option<String> = row.get(16)?;
    let creator_name: Option<String> = row.get(17)?;

    let category = match (item.category_id, category_name) {
        (Some(id), Some(name)) => Some(CategoryRef { id, name }),
        _ => None,
    };
    let created_by = match (item.created_by, creator_email) {
        (Some(id), Some(email)) => Some(UserRef {
            id,
            email,
            full_name: creator_name.unwrap_or_default(),
        }),
        _ => None,
    };

    Ok(ItemDetail {
        item,
        category,
        created_by,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::{NewCategory, NewUser, Role};

    fn names(items: &[ItemDetail]) -> Vec<&str> {
        items.iter().map(|i| i.item.name.as_str()).collect()
    }

    #[test]
    fn test_create_item_populates_references() {
        let store = InventoryStore::open_in_memory().unwrap();
        let user = store
            .create_user(NewUser::new("clerk@example.com", Role::Staff).full_name("Clerk"))
            .unwrap();
        let phones = store.create_category(NewCategory::new("Phones")).unwrap();

        let created = store
            .create_item(
                NewItem::new("  iPhone 15 Pro ", 999.0)
                    .category(phones.id)
                    .quantity(50)
                    .sku("IP15P-001")
                    .barcode("1234567890123")
                    .description("   "),
                Some(user.id),
            )
            .unwrap();

        assert_eq!(created.item.name, "iPhone 15 Pro");
        assert_eq!(created.item.description, None);
        assert_eq!(created.item.min_stock_level, 5);
        assert_eq!(created.category.as_ref().map(|c| c.name.as_str()), Some("Phones"));
        let creator = created.created_by.clone().unwrap();
        assert_eq!(creator.email, "clerk@example.com");
        assert_eq!(creator.full_name, "Clerk");

        let fetched = store.get_item(created.item.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let store = InventoryStore::open_in_memory().unwrap();
        let err = store
            .create_item(NewItem::new("Ghost", 1.0).category(Uuid::new_v4()), None)
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidReference(_)));
    }

    #[test]
    fn test_barcode_uniqueness() {
        let store = InventoryStore::open_in_memory().unwrap();
        store
            .create_item(NewItem::new("First", 1.0).barcode("111"), None)
            .unwrap();

        let err = store
            .create_item(NewItem::new("Second", 1.0).barcode(" 111 "), None)
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        // Items without barcodes never collide
        store.create_item(NewItem::new("A", 1.0), None).unwrap();
        store
            .create_item(NewItem::new("B", 1.0).barcode(""), None)
            .unwrap();

        assert!(store.barcode_exists("111").unwrap());
        assert!(!store.barcode_exists("222").unwrap());
        assert_eq!(
            store.find_by_barcode("111").unwrap().map(|i| i.item.name),
            Some("First".to_string())
        );
        assert!(store.find_by_barcode("999").unwrap().is_none());
    }

    #[test]
    fn test_list_items_search_and_filters() {
        let store = InventoryStore::open_in_memory().unwrap();
        let shoes = store.create_category(NewCategory::new("Shoes")).unwrap();

        store
            .create_item(
                NewItem::new("Nike Air Max 270", 150.0)
                    .category(shoes.id)
                    .quantity(80)
                    .sku("NAM270-001"),
                None,
            )
            .unwrap();
        store
            .create_item(
                NewItem::new("Trail Runner", 120.0)
                    .category(shoes.id)
                    .quantity(3)
                    .description("Grippy NIKE sole"),
                None,
            )
            .unwrap();
        store
            .create_item(
                NewItem::new("Coffee Beans", 15.0)
                    .quantity(200)
                    .barcode("9234567890123"),
                None,
            )
            .unwrap();

        let all = store.list_items(&ItemQuery::new()).unwrap();
        assert_eq!(names(&all), vec!["Coffee Beans", "Nike Air Max 270", "Trail Runner"]);

        let nike = store.list_items(&ItemQuery::new().search("nike")).unwrap();
        assert_eq!(names(&nike), vec!["Nike Air Max 270", "Trail Runner"]);

        let by_sku = store.list_items(&ItemQuery::new().search("nam270")).unwrap();
        assert_eq!(names(&by_sku), vec!["Nike Air Max 270"]);

        let by_barcode = store.list_items(&ItemQuery::new().search("92345")).unwrap();
        assert_eq!(names(&by_barcode), vec!["Coffee Beans"]);

        let in_shoes = store
            .list_items(&ItemQuery::new().category(shoes.id))
            .unwrap();
        assert_eq!(in_shoes.len(), 2);

        let low = store.list_items(&ItemQuery::new().low_stock()).unwrap();
        assert_eq!(names(&low), vec!["Trail Runner"]);
        assert_eq!(names(&store.low_stock_items().unwrap()), vec!["Trail Runner"]);
    }

    #[test]
    fn test_list_items_sorting_and_paging() {
        let store = InventoryStore::open_in_memory().unwrap();
        let zed = store.create_category(NewCategory::new("Zed")).unwrap();
        let alpha = store.create_category(NewCategory::new("Alpha")).unwrap();

        store
            .create_item(NewItem::new("b", 20.0).quantity(1).category(zed.id), None)
            .unwrap();
        store
            .create_item(NewItem::new("a", 30.0).quantity(9).category(alpha.id), None)
            .unwrap();
        store
            .create_item(NewItem::new("C", 10.0).quantity(5), None)
            .unwrap();

        let by_name = store.list_items(&ItemQuery::new()).unwrap();
        assert_eq!(names(&by_name), vec!["a", "b", "C"]);

        let by_price_desc = store
            .list_items(&ItemQuery::new().sort(SortKey::Price, SortOrder::Desc))
            .unwrap();
        assert_eq!(names(&by_price_desc), vec!["a", "b", "C"]);

        let by_stock = store
            .list_items(&ItemQuery::new().sort(SortKey::Stock, SortOrder::Asc))
            .unwrap();
        assert_eq!(names(&by_stock), vec!["b", "C", "a"]);

        // Uncategorized sorts first
        let by_category = store
            .list_items(&ItemQuery::new().sort(SortKey::Category, SortOrder::Asc))
            .unwrap();
        assert_eq!(names(&by_category), vec!["C", "a", "b"]);

        let page = store
            .list_items(&ItemQuery::new().limit(1).offset(1))
            .unwrap();
        assert_eq!(names(&page), vec!["b"]);

        let skipped = store.list_items(&ItemQuery::new().offset(2)).unwrap();
        assert_eq!(names(&skipped), vec!["C"]);
    }

    #[test]
    fn test_paging_past_i64_range() {
        let store = InventoryStore::open_in_memory().unwrap();
        store.create_item(NewItem::new("Only", 1.0), None).unwrap();

        let past_end = store
            .list_items(&ItemQuery::new().offset(usize::MAX))
            .unwrap();
        assert!(past_end.is_empty());

        let unbounded = store
            .list_items(&ItemQuery::new().limit(usize::MAX))
            .unwrap();
        assert_eq!(names(&unbounded), vec!["Only"]);
    }

    #[test]
    fn test_update_item() {
        let store = InventoryStore::open_in_memory().unwrap();
        let created = store
            .create_item(
                NewItem::new("Lamp", 40.0).sku("LMP-1").barcode("555"),
                None,
            )
            .unwrap();
        let other = store
            .create_item(NewItem::new("Bulb", 2.0).barcode("777"), None)
            .unwrap();

        let updated = store
            .update_item(
                created.item.id,
                ItemUpdate {
                    price: Some(35.5),
                    quantity: Some(12),
                    sku: Some(String::new()),
                    barcode: Some("555".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.item.price, 35.5);
        assert_eq!(updated.item.quantity, 12);
        assert_eq!(updated.item.sku, None);
        assert_eq!(updated.item.barcode.as_deref(), Some("555"));
        assert!(updated.item.updated_at >= created.item.updated_at);
        assert_eq!(updated.item.created_at, created.item.created_at);

        let err = store
            .update_item(
                other.item.id,
                ItemUpdate {
                    barcode: Some("555".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let err = store
            .update_item(Uuid::new_v4(), ItemUpdate::default())
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn test_delete_item() {
        let store = InventoryStore::open_in_memory().unwrap();
        let created = store.create_item(NewItem::new("Mug", 8.0), None).unwrap();

        let deleted = store.delete_item(created.item.id).unwrap();
        assert_eq!(deleted.item.id, created.item.id);
        assert!(store.get_item(created.item.id).unwrap().is_none());

        let err = store.delete_item(created.item.id).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
