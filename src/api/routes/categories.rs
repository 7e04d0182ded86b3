//! Category Routes
//!
//! - GET /api/categories - List categories with product counts
//! - POST /api/categories - Create a category (admin, staff)
//! - GET /api/categories/:id - Get a specific category
//! - PUT /api/categories/:id - Update a category (admin, staff)
//! - DELETE /api/categories/:id - Delete a category (admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::api::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::ApiJson;
use crate::api::routes::{parse_id, validate_name};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::storage::{Category, CategoryUpdate, CategoryWithCount, NewCategory, Role};

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// Roles allowed to create and edit categories
const EDITORS: &[Role] = &[Role::Admin, Role::Staff];

/// GET /api/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoryWithCount>>> {
    Ok(Json(state.store.list_categories()?))
}

/// GET /api/categories/:id
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    let id = parse_id(&id, "category")?;
    let category = state
        .store
        .get_category(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", id)))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    auth.require_any(EDITORS)?;
    validate_name(&req.name, "Category name", MAX_NAME_LEN)?;
    validate_description(req.description.as_deref())?;

    let new = NewCategory {
        name: req.name,
        description: req.description.unwrap_or_default(),
        icon: req.icon,
        color: req.color,
    };
    let category = state.store.create_category(new)?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            message: "Category created successfully".to_string(),
            category,
        }),
    ))
}

/// PUT /api/categories/:id
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateCategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    auth.require_any(EDITORS)?;
    let id = parse_id(&id, "category")?;
    if let Some(name) = &req.name {
        validate_name(name, "Category name", MAX_NAME_LEN)?;
    }
    validate_description(req.description.as_deref())?;

    let category = state.store.update_category(
        id,
        CategoryUpdate {
            name: req.name,
            description: req.description,
            icon: req.icon,
            color: req.color,
        },
    )?;

    Ok(Json(CategoryResponse {
        message: "Category updated successfully".to_string(),
        category,
    }))
}

/// DELETE /api/categories/:id
///
/// Admin only; items in the category become uncategorized.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CategoryResponse>> {
    let id = parse_id(&id, "category")?;
    let category = state.store.delete_category(id)?;

    Ok(Json(CategoryResponse {
        message: "Category deleted successfully".to_string(),
        category,
    }))
}

fn validate_description(description: Option<&str>) -> ApiResult<()> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => {
            Err(ApiError::Validation(format!(
                "Description exceeds maximum length of {} characters",
                MAX_DESCRIPTION_LEN
            )))
        }
        _ => Ok(()),
    }
}
