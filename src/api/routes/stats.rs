//! Stats Routes
//!
//! - GET /api/stats - Inventory totals and per-category breakdown
//! - GET /api/stats/low-stock - Items at or under their minimum level

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::storage::{InventoryStats, ItemDetail};

/// GET /api/stats
pub async fn inventory_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<InventoryStats>> {
    let stats = state.store.inventory_stats(state.config.recent_days)?;
    Ok(Json(stats))
}

/// GET /api/stats/low-stock
pub async fn low_stock(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ItemDetail>>> {
    Ok(Json(state.store.low_stock_items()?))
}
