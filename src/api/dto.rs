//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{Category, ItemDetail, TransactionDetail, User};

// ============================================
// COMMON DTOs
// ============================================

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================
// ITEM DTOs
// ============================================

/// Item list query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsParams {
    /// Matches name, description, SKU or barcode
    pub search: Option<String>,
    pub category_id: Option<String>,
    /// Only items at or under their minimum stock level
    pub low_stock: Option<bool>,
    /// name, price, stock, category or created
    pub sort: Option<String>,
    /// asc or desc
    pub order: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Create item request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub min_stock_level: Option<i64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
}

/// Update item request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub cost_price: Option<f64>,
    pub quantity: Option<i64>,
    pub min_stock_level: Option<i64>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub image: Option<String>,
    pub supplier: Option<String>,
}

/// Item mutation response
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub message: String,
    pub item: ItemDetail,
}

// ============================================
// BARCODE DTOs
// ============================================

/// Generated barcode
#[derive(Debug, Serialize)]
pub struct BarcodeResponse {
    pub barcode: String,
}

// ============================================
// CATEGORY DTOs
// ============================================

/// Create category request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Update category request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Category mutation response
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub message: String,
    pub category: Category,
}

// ============================================
// TRANSACTION DTOs
// ============================================

/// Transaction list query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsParams {
    pub item_id: Option<String>,
    pub limit: Option<usize>,
}

/// Record transaction request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub item_id: String,
    /// "in" or "out"
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Transaction mutation response
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub message: String,
    pub transaction: TransactionDetail,
}

// ============================================
// USER DTOs
// ============================================

/// Update user request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub is_verified: Option<bool>,
}

/// User mutation response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "OK"
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// "Connected" or "Disconnected"
    pub database: String,
    /// Application version
    pub version: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
}
