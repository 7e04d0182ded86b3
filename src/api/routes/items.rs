//! Item Routes
//!
//! CRUD endpoints for stocked items.
//!
//! - GET /api/items - List items (search, category, low-stock, sort, paging)
//! - POST /api/items - Create an item
//! - GET /api/items/:id - Get a specific item
//! - PUT /api/items/:id - Partially update an item
//! - DELETE /api/items/:id - Delete an item (admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::api::dto::{CreateItemRequest, ItemResponse, ListItemsParams, UpdateItemRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::routes::{parse_id, validate_limit, validate_name};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::storage::{Item, ItemDetail, ItemQuery, ItemUpdate, NewItem, SortKey, SortOrder};

const MAX_NAME_LEN: usize = 200;
const MAX_TEXT_LEN: usize = 2000;

fn sku_pattern() -> &'static Regex {
    static SKU: OnceLock<Regex> = OnceLock::new();
    SKU.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$").expect("valid SKU regex"))
}

fn barcode_pattern() -> &'static Regex {
    static BARCODE: OnceLock<Regex> = OnceLock::new();
    BARCODE.get_or_init(|| Regex::new(r"^[A-Za-z0-9-]{4,64}$").expect("valid barcode regex"))
}

/// GET /api/items
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListItemsParams>,
) -> ApiResult<Json<Vec<ItemDetail>>> {
    let query = build_query(params)?;
    let items = state.store.list_items(&query)?;
    Ok(Json(items))
}

/// GET /api/items/:id
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemDetail>> {
    let id = parse_id(&id, "item")?;
    let item = state
        .store
        .get_item(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Item {} not found", id)))?;
    Ok(Json(item))
}

/// POST /api/items
///
/// The caller is recorded as the item's creator.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(req): ApiJson<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse>)> {
    validate_create_request(&req)?;

    let mut new = NewItem::new(req.name, req.price)
        .quantity(req.quantity.unwrap_or(0))
        .min_stock_level(
            req.min_stock_level
                .unwrap_or(state.config.default_min_stock_level),
        );
    if let Some(raw) = req.category_id.as_deref().filter(|c| !c.trim().is_empty()) {
        new = new.category(parse_id(raw, "category")?);
    }
    new.description = req.description;
    new.cost_price = req.cost_price;
    new.sku = req.sku;
    new.barcode = req.barcode;
    new.image = req.image;
    new.supplier = req.supplier;

    let item = state.store.create_item(new, Some(auth.id()))?;

    tracing::info!(item_id = %item.item.id, user_id = %auth.id(), "Item added");
    warn_if_restock_needed(&item.item);

    Ok((
        StatusCode::CREATED,
        Json(ItemResponse {
            message: "Item added successfully".to_string(),
            item,
        }),
    ))
}

/// PUT /api/items/:id
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateItemRequest>,
) -> ApiResult<Json<ItemResponse>> {
    let id = parse_id(&id, "item")?;
    validate_update_request(&req)?;

    // Blank means "leave as is", same as on create
    let category_id = match req.category_id.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(raw) => Some(parse_id(raw, "category")?),
        None => None,
    };

    let update = ItemUpdate {
        name: req.name,
        description: req.description,
        category_id,
        price: req.price,
        cost_price: req.cost_price,
        quantity: req.quantity,
        min_stock_level: req.min_stock_level,
        sku: req.sku,
        barcode: req.barcode,
        image: req.image,
        supplier: req.supplier,
    };

    let item = state.store.update_item(id, update)?;
    warn_if_restock_needed(&item.item);

    Ok(Json(ItemResponse {
        message: "Item updated successfully".to_string(),
        item,
    }))
}

/// DELETE /api/items/:id
///
/// Admin only; the item's transactions go with it.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemResponse>> {
    let id = parse_id(&id, "item")?;
    let item = state.store.delete_item(id)?;

    tracing::info!(item_id = %id, user_id = %auth.id(), "Item deleted");

    Ok(Json(ItemResponse {
        message: "Item deleted successfully".to_string(),
        item,
    }))
}

fn warn_if_restock_needed(item: &Item) {
    if item.is_out_of_stock() {
        tracing::warn!(item_id = %item.id, name = %item.name, "Item is out of stock");
    } else if item.is_low_stock() {
        tracing::warn!(
            item_id = %item.id,
            quantity = item.quantity,
            min_stock_level = item.min_stock_level,
            "Item is at or under its minimum stock level"
        );
    }
}

/// Turn list query parameters into a store query
fn build_query(params: ListItemsParams) -> ApiResult<ItemQuery> {
    let mut query = ItemQuery::new();

    if let Some(term) = params.search.filter(|s| !s.trim().is_empty()) {
        query = query.search(term);
    }
    if let Some(raw) = params.category_id.as_deref().filter(|c| !c.trim().is_empty()) {
        query = query.category(parse_id(raw, "category")?);
    }
    if params.low_stock.unwrap_or(false) {
        query = query.low_stock();
    }

    let key = params
        .sort
        .as_deref()
        .map(parse_sort_key)
        .transpose()?
        .unwrap_or_default();
    let order = params
        .order
        .as_deref()
        .map(parse_sort_order)
        .transpose()?
        .unwrap_or_default();
    query = query.sort(key, order);

    if let Some(limit) = validate_limit(params.limit)? {
        query = query.limit(limit);
    }
    if let Some(offset) = params.offset {
        query = query.offset(offset);
    }

    Ok(query)
}

/// Parse sort key string
fn parse_sort_key(s: &str) -> ApiResult<SortKey> {
    match s.trim().to_lowercase().as_str() {
        "name" => Ok(SortKey::Name),
        "price" => Ok(SortKey::Price),
        "stock" | "quantity" => Ok(SortKey::Stock),
        "category" => Ok(SortKey::Category),
        "created" | "date" | "dateadded" => Ok(SortKey::Created),
        _ => Err(ApiError::Validation(format!(
            "Invalid sort: {}. Use name, price, stock, category, or created",
            s
        ))),
    }
}

/// Parse sort order string
fn parse_sort_order(s: &str) -> ApiResult<SortOrder> {
    match s.trim().to_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        _ => Err(ApiError::Validation(format!(
            "Invalid order: {}. Use asc or desc",
            s
        ))),
    }
}

/// Validate create item request
fn validate_create_request(req: &CreateItemRequest) -> ApiResult<()> {
    validate_name(&req.name, "Name", MAX_NAME_LEN)?;
    validate_price(req.price, "Price")?;
    if let Some(cost) = req.cost_price {
        validate_price(cost, "Cost price")?;
    }
    if let Some(quantity) = req.quantity {
        validate_count(quantity, "Quantity")?;
    }
    if let Some(level) = req.min_stock_level {
        validate_count(level, "Minimum stock level")?;
    }
    validate_codes(req.sku.as_deref(), req.barcode.as_deref())?;
    validate_text(req.description.as_deref(), "Description")?;
    validate_text(req.supplier.as_deref(), "Supplier")?;
    Ok(())
}

/// Validate update item request
fn validate_update_request(req: &UpdateItemRequest) -> ApiResult<()> {
    if let Some(name) = &req.name {
        validate_name(name, "Name", MAX_NAME_LEN)?;
    }
    if let Some(price) = req.price {
        validate_price(price, "Price")?;
    }
    if let Some(cost) = req.cost_price {
        validate_price(cost, "Cost price")?;
    }
    if let Some(quantity) = req.quantity {
        validate_count(quantity, "Quantity")?;
    }
    if let Some(level) = req.min_stock_level {
        validate_count(level, "Minimum stock level")?;
    }
    validate_codes(req.sku.as_deref(), req.barcode.as_deref())?;
    validate_text(req.description.as_deref(), "Description")?;
    validate_text(req.supplier.as_deref(), "Supplier")?;
    Ok(())
}

fn validate_price(value: f64, field: &str) -> ApiResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

fn validate_count(value: i64, field: &str) -> ApiResult<()> {
    if value < 0 {
        return Err(ApiError::Validation(format!("{} cannot be negative", field)));
    }
    Ok(())
}

fn validate_text(value: Option<&str>, field: &str) -> ApiResult<()> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_LEN => Err(ApiError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_TEXT_LEN
        ))),
        _ => Ok(()),
    }
}

/// Blank codes are allowed (they clear the field); others must match the format
fn validate_codes(sku: Option<&str>, barcode: Option<&str>) -> ApiResult<()> {
    if let Some(sku) = sku.map(str::trim).filter(|s| !s.is_empty()) {
        if !sku_pattern().is_match(sku) {
            return Err(ApiError::Validation(format!(
                "Invalid SKU '{}': use letters, digits, '.', '_' or '-'",
                sku
            )));
        }
    }
    if let Some(code) = barcode.map(str::trim).filter(|s| !s.is_empty()) {
        if !barcode_pattern().is_match(code) {
            return Err(ApiError::Validation(format!(
                "Invalid barcode '{}': use 4 to 64 letters, digits or '-'",
                code
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateItemRequest {
        CreateItemRequest {
            name: "iPhone 15 Pro".to_string(),
            price: 999.0,
            description: None,
            category_id: None,
            cost_price: Some(700.0),
            quantity: Some(50),
            min_stock_level: Some(10),
            sku: Some("IP15P-001".to_string()),
            barcode: Some("1234567890123".to_string()),
            image: None,
            supplier: Some("Apple Inc.".to_string()),
        }
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!(parse_sort_key("price").unwrap(), SortKey::Price);
        assert_eq!(parse_sort_key("STOCK").unwrap(), SortKey::Stock);
        assert_eq!(parse_sort_key("created").unwrap(), SortKey::Created);
        assert!(parse_sort_key("colour").is_err());
    }

    #[test]
    fn test_parse_sort_order() {
        assert_eq!(parse_sort_order("desc").unwrap(), SortOrder::Desc);
        assert_eq!(parse_sort_order("Asc").unwrap(), SortOrder::Asc);
        assert!(parse_sort_order("up").is_err());
    }

    #[test]
    fn test_validate_create_request() {
        assert!(validate_create_request(&create_request()).is_ok());

        let blank = CreateItemRequest {
            name: "  ".to_string(),
            ..create_request()
        };
        assert!(validate_create_request(&blank).is_err());

        let negative_price = CreateItemRequest {
            price: -1.0,
            ..create_request()
        };
        assert!(validate_create_request(&negative_price).is_err());

        let nan_cost = CreateItemRequest {
            cost_price: Some(f64::NAN),
            ..create_request()
        };
        assert!(validate_create_request(&nan_cost).is_err());

        let negative_quantity = CreateItemRequest {
            quantity: Some(-3),
            ..create_request()
        };
        assert!(validate_create_request(&negative_quantity).is_err());
    }

    #[test]
    fn test_code_formats() {
        assert!(validate_codes(Some("MBA-M3-001"), Some("1234567890125")).is_ok());
        assert!(validate_codes(Some(""), Some("   ")).is_ok());
        assert!(validate_codes(Some("bad sku!"), None).is_err());
        assert!(validate_codes(None, Some("12")).is_err());
    }

    #[test]
    fn test_build_query() {
        let query = build_query(ListItemsParams {
            search: Some("phone".to_string()),
            low_stock: Some(true),
            sort: Some("price".to_string()),
            order: Some("desc".to_string()),
            limit: Some(20),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(query.search.as_deref(), Some("phone"));
        assert!(query.low_stock);
        assert_eq!(query.sort, SortKey::Price);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.limit, Some(20));

        let bad_limit = build_query(ListItemsParams {
            limit: Some(0),
            ..Default::default()
        });
        assert!(bad_limit.is_err());

        let bad_category = build_query(ListItemsParams {
            category_id: Some("electronics".to_string()),
            ..Default::default()
        });
        assert!(bad_category.is_err());
    }
}
