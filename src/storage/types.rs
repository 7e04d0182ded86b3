//! Core data types for the inventory store
//!
//! This module defines the records kept by the store:
//! - `User` and `Role`: who may touch the inventory
//! - `Category`: grouping for items
//! - `Item`: a stocked product
//! - `Transaction`: a stock-in or stock-out movement
//! - `ItemQuery` and `InventoryStats`: listing and reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default minimum stock level for new items
pub const DEFAULT_MIN_STOCK_LEVEL: i64 = 5;

// ============================================
// USERS
// ============================================

/// User roles for access checks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including deletes and user management
    Admin,
    /// Warehouse staff: may manage categories and record stock movements
    Staff,
    /// Regular user: may read and edit items
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "user" => Ok(Role::User),
            other => Err(format!(
                "Unknown role '{}'. Valid roles: admin, staff, user",
                other
            )),
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Data needed to provision a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub verified: bool,
}

impl NewUser {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            full_name: String::new(),
            role,
            verified: false,
        }
    }

    /// Builder method: set the display name
    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = name.into();
        self
    }

    /// Builder method: mark the account verified
    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }
}

/// Partial update of a user
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub is_verified: Option<bool>,
}

/// Populated creator reference on items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

// ============================================
// CATEGORIES
// ============================================

/// Item category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Category with the number of items filed under it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: i64,
}

/// Data needed to create a category
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Partial update of a category
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Populated category reference on items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

// ============================================
// ITEMS
// ============================================

/// A stocked product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: f64,
    pub cost_price: Option<f64>,
    pub quantity: i64,
    pub min_stock_level: i64,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub image: Option<String>,
    pub supplier: Option<String>,
    /// Serialized through `ItemDetail::created_by` in populated form
    #[serde(skip_serializing, default)]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// At or under the minimum stock level
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock_level
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }
}

/// Item with its references populated
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: Item,
    pub category: Option<CategoryRef>,
    pub created_by: Option<UserRef>,
}

/// Data needed to create an item
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: f64,
    pub cost_price: Option<f64>,
    pub quantity: i64,
    pub min_stock_level: i64,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub image: Option<String>,
    pub supplier: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            category_id: None,
            price,
            cost_price: None,
            quantity: 0,
            min_stock_level: DEFAULT_MIN_STOCK_LEVEL,
            sku: None,
            barcode: None,
            image: None,
            supplier: None,
        }
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn min_stock_level(mut self, level: i64) -> Self {
        self.min_stock_level = level;
        self
    }

    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    pub fn cost_price(mut self, cost: f64) -> Self {
        self.cost_price = Some(cost);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Partial update of an item
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: Option<f64>,
    pub cost_price: Option<f64>,
    pub quantity: Option<i64>,
    pub min_stock_level: Option<i64>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub image: Option<String>,
    pub supplier: Option<String>,
}

/// Short item view embedded in transactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSummary {
    pub id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    pub quantity: i64,
}

/// Sort key for item listings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Price,
    Stock,
    Category,
    Created,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filter and ordering for item listings
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    /// Case-insensitive match on name, description, SKU or barcode
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    /// Only items at or under their minimum stock level
    pub low_stock: bool,
    pub sort: SortKey,
    pub order: SortOrder,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn low_stock(mut self) -> Self {
        self.low_stock = true;
        self
    }

    pub fn sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = key;
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

// ============================================
// TRANSACTIONS
// ============================================

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Stock received
    In,
    /// Stock issued
    Out,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::In => "in",
            TransactionKind::Out => "out",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(TransactionKind::In),
            "out" => Ok(TransactionKind::Out),
            other => Err(format!("Unknown transaction type '{}'", other)),
        }
    }
}

/// A recorded stock movement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub item_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub quantity: i64,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub date: DateTime<Utc>,
}

/// Transaction with its item populated
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionDetail {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub item: ItemSummary,
}

/// Data needed to record a stock movement
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub item_id: Uuid,
    pub kind: TransactionKind,
    pub quantity: i64,
    pub notes: Option<String>,
}

// ============================================
// STATS
// ============================================

/// Aggregate figures for the whole inventory
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_products: i64,
    pub total_value: f64,
    pub total_cost: f64,
    pub potential_profit: f64,
    pub low_stock_items: i64,
    pub out_of_stock_items: i64,
    pub categories: i64,
    pub recently_added: i64,
    pub by_category: Vec<CategoryBreakdown>,
}

/// Per-category slice of the stats; `id` is `None` for uncategorized items
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub id: Option<Uuid>,
    pub name: String,
    pub product_count: i64,
    pub total_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" STAFF ".parse::<Role>(), Ok(Role::Staff));
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Staff).unwrap();
        assert_eq!(json, r#""staff""#);
    }

    #[test]
    fn test_item_stock_helpers() {
        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            name: "Widget".to_string(),
            description: None,
            category_id: None,
            price: 2.5,
            cost_price: None,
            quantity: 4,
            min_stock_level: 5,
            sku: None,
            barcode: None,
            image: None,
            supplier: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        };

        assert!(item.is_low_stock());
        assert!(!item.is_out_of_stock());
    }

    #[test]
    fn test_transaction_kind_json() {
        let kind: TransactionKind = serde_json::from_str(r#""out""#).unwrap();
        assert_eq!(kind, TransactionKind::Out);
        assert_eq!("in".parse::<TransactionKind>(), Ok(TransactionKind::In));
        assert!("sideways".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_item_query_builder() {
        let category = Uuid::new_v4();
        let query = ItemQuery::new()
            .search("phone")
            .category(category)
            .low_stock()
            .sort(SortKey::Price, SortOrder::Desc)
            .limit(10);

        assert_eq!(query.search.as_deref(), Some("phone"));
        assert_eq!(query.category_id, Some(category));
        assert!(query.low_stock);
        assert_eq!(query.sort, SortKey::Price);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.limit, Some(10));
    }
}
