//! # Glo Stock
//!
//! Inventory management backend: a REST API over items, categories and stock
//! movements, with bearer-token auth and role checks.
//!
//! ## Features
//!
//! - **SQLite storage**: one file, foreign keys enforced, schema created on open
//! - **Atomic stock movements**: a stock-out can never drive quantity negative
//! - **Role-based access**: `admin`, `staff` and `user`, checked against the
//!   stored user on every request
//! - **Reporting**: inventory value, low-stock and per-category figures
//!
//! ## Modules
//!
//! - [`storage`]: SQLite-backed inventory store
//! - [`auth`]: JWT issuance/validation and auth middleware
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`seed`]: Demo catalog
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glostock::storage::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InventoryStore::open("./glostock.db")?;
//!
//!     let clerk = store.create_user(NewUser::new("clerk@example.com", Role::Staff).verified())?;
//!     let item = store.create_item(NewItem::new("Copy Paper", 8.0).quantity(300), Some(clerk.id))?;
//!
//!     store.record_transaction(
//!         NewTransaction {
//!             item_id: item.item.id,
//!             kind: TransactionKind::Out,
//!             quantity: 20,
//!             notes: Some("Office restock".to_string()),
//!         },
//!         Some(clerk.id),
//!     )?;
//!
//!     let stats = store.inventory_stats(7)?;
//!     println!("Inventory value: {:.2}", stats.total_value);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod seed;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    Category, InventoryStats, InventoryStore, Item, ItemDetail, ItemQuery, Role, StorageError,
    StorageResult, Transaction, TransactionKind, User,
};

pub use auth::{AuthError, AuthUser, Claims, JwtHandler};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
