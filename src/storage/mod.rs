//! Glo Stock Storage
//!
//! This module provides the inventory record store:
//!
//! - **types**: Records (User, Category, Item, Transaction) and query types
//! - **store**: `InventoryStore`, the SQLite connection, schema and user operations
//! - **categories**, **items**, **transactions**, **stats**: entity operations
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use glostock::storage::{InventoryStore, ItemQuery, NewCategory, NewItem};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InventoryStore::open("./glostock.db")?;
//!
//!     let phones = store.create_category(NewCategory::new("Phones"))?;
//!     store.create_item(
//!         NewItem::new("iPhone 15 Pro", 999.0)
//!             .category(phones.id)
//!             .quantity(50)
//!             .barcode("1234567890123"),
//!         None,
//!     )?;
//!
//!     let low = store.list_items(&ItemQuery::new().low_stock())?;
//!     println!("{} items need restocking", low.len());
//!
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod error;
pub mod items;
pub mod stats;
pub mod store;
pub mod transactions;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use store::InventoryStore;
pub use types::{
    Category, CategoryBreakdown, CategoryRef, CategoryUpdate, CategoryWithCount, InventoryStats,
    Item, ItemDetail, ItemQuery, ItemSummary, ItemUpdate, NewCategory, NewItem, NewTransaction,
    NewUser, Role, SortKey, SortOrder, Transaction, TransactionDetail, TransactionKind, User,
    UserRef, UserUpdate, DEFAULT_MIN_STOCK_LEVEL,
};
