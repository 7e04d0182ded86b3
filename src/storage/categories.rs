//! Category operations on the inventory store

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::store::{clean_text, uuid_col, InventoryStore};
use crate::storage::types::{Category, CategoryUpdate, CategoryWithCount, NewCategory};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const CATEGORY_COLUMNS: &str = "c.id, c.name, c.description, c.icon, c.color, c.created_at";

impl InventoryStore {
    /// Create a category; names are unique regardless of case
    pub fn create_category(&self, new: NewCategory) -> StorageResult<Category> {
        let name = new.name.trim().to_string();
        let conn = self.conn()?;

        ensure_name_free(&conn, &name, None)?;

        let category = Category {
            id: Uuid::new_v4(),
            name,
            description: new.description.trim().to_string(),
            icon: clean_text(new.icon),
            color: clean_text(new.color),
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO categories (id, name, description, icon, color, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                category.id.to_string(),
                category.name,
                category.description,
                category.icon,
                category.color,
                category.created_at,
            ],
        )?;

        tracing::info!(category_id = %category.id, name = %category.name, "Created category");
        Ok(category)
    }

    pub fn get_category(&self, id: Uuid) -> StorageResult<Option<Category>> {
        let conn = self.conn()?;
        fetch_category(&conn, id)
    }

    /// All categories with their item counts, sorted by name
    pub fn list_categories(&self) -> StorageResult<Vec<CategoryWithCount>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {}, COUNT(i.id)
             FROM categories c
             LEFT JOIN items i ON i.category_id = c.id
             GROUP BY c.id
             ORDER BY c.name COLLATE NOCASE",
            CATEGORY_COLUMNS
        ))?;

        let categories = stmt
            .query_map([], |row| {
                Ok(CategoryWithCount {
                    category: category_from_row(row)?,
                    product_count: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Apply a partial update and return the stored result
    pub fn update_category(&self, id: Uuid, update: CategoryUpdate) -> StorageResult<Category> {
        let conn = self.conn()?;
        let mut category = fetch_category(&conn, id)?
            .ok_or_else(|| StorageError::NotFound("Category".to_string()))?;

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            ensure_name_free(&conn, &name, Some(id))?;
            category.name = name;
        }
        if let Some(description) = update.description {
            category.description = description.trim().to_string();
        }
        if update.icon.is_some() {
            category.icon = clean_text(update.icon);
        }
        if update.color.is_some() {
            category.color = clean_text(update.color);
        }

        conn.execute(
            "UPDATE categories SET name = ?1, description = ?2, icon = ?3, color = ?4
             WHERE id = ?5",
            params![
                category.name,
                category.description,
                category.icon,
                category.color,
                category.id.to_string(),
            ],
        )?;

        Ok(category)
    }

    /// Delete a category; its items are kept with no category
    pub fn delete_category(&self, id: Uuid) -> StorageResult<Category> {
        let conn = self.conn()?;
        let category = fetch_category(&conn, id)?
            .ok_or_else(|| StorageError::NotFound("Category".to_string()))?;

        conn.execute(
            "DELETE FROM categories WHERE id = ?1",
            params![id.to_string()],
        )?;

        tracing::info!(category_id = %id, "Deleted category");
        Ok(category)
    }
}

pub(crate) fn fetch_category(conn: &Connection, id: Uuid) -> StorageResult<Option<Category>> {
    let category = conn
        .query_row(
            &format!("SELECT {} FROM categories c WHERE c.id = ?1", CATEGORY_COLUMNS),
            params![id.to_string()],
            category_from_row,
        )
        .optional()?;
    Ok(category)
}

fn ensure_name_free(conn: &Connection, name: &str, exclude: Option<Uuid>) -> StorageResult<()> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM categories WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(found) = existing {
        if exclude.map(|id| id.to_string()) != Some(found) {
            return Err(StorageError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }
    }

    Ok(())
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        icon: row.get(3)?,
        color: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::NewItem;

    #[test]
    fn test_create_and_list_categories() {
        let store = InventoryStore::open_in_memory().unwrap();
        let tools = store
            .create_category(
                NewCategory::new("Tools")
                    .description("Hardware")
                    .icon("wrench")
                    .color("bg-slate-500"),
            )
            .unwrap();
        store.create_category(NewCategory::new("apparel")).unwrap();

        store
            .create_item(NewItem::new("Hammer", 12.0).category(tools.id), None)
            .unwrap();

        let listed = store.list_categories().unwrap();
        let names: Vec<&str> = listed.iter().map(|c| c.category.name.as_str()).collect();
        assert_eq!(names, vec!["apparel", "Tools"]);
        assert_eq!(listed[1].product_count, 1);
        assert_eq!(listed[0].product_count, 0);
        assert_eq!(listed[1].category.icon.as_deref(), Some("wrench"));
    }

    #[test]
    fn test_duplicate_name_conflicts() {
        let store = InventoryStore::open_in_memory().unwrap();
        store.create_category(NewCategory::new("Books")).unwrap();

        let err = store
            .create_category(NewCategory::new(" books "))
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[test]
    fn test_update_category() {
        let store = InventoryStore::open_in_memory().unwrap();
        let books = store.create_category(NewCategory::new("Books")).unwrap();
        let media = store.create_category(NewCategory::new("Media")).unwrap();

        // Renaming to its own name (different case) is allowed
        let renamed = store
            .update_category(
                books.id,
                CategoryUpdate {
                    name: Some("BOOKS".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "BOOKS");

        // Taking another category's name is not
        let err = store
            .update_category(
                media.id,
                CategoryUpdate {
                    name: Some("books".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[test]
    fn test_delete_category_detaches_items() {
        let store = InventoryStore::open_in_memory().unwrap();
        let toys = store.create_category(NewCategory::new("Toys")).unwrap();
        let item = store
            .create_item(NewItem::new("Yo-yo", 3.0).category(toys.id), None)
            .unwrap();

        let deleted = store.delete_category(toys.id).unwrap();
        assert_eq!(deleted.id, toys.id);
        assert!(store.get_category(toys.id).unwrap().is_none());

        let item = store.get_item(item.item.id).unwrap().unwrap();
        assert_eq!(item.item.category_id, None);
        assert!(item.category.is_none());
    }

    #[test]
    fn test_delete_missing_category() {
        let store = InventoryStore::open_in_memory().unwrap();
        let err = store.delete_category(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
