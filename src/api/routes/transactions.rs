//! Transaction Routes
//!
//! Stock movements. Recording one adjusts the item's quantity in the same
//! database transaction.
//!
//! - GET /api/transactions - List movements, newest first
//! - POST /api/transactions - Record a stock-in or stock-out (admin, staff)
//! - GET /api/transactions/:id - Get a specific movement

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateTransactionRequest, ListTransactionsParams, TransactionResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::routes::{parse_id, validate_limit};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::storage::{NewTransaction, Role, TransactionDetail, TransactionKind};

const MAX_NOTES_LEN: usize = 500;

/// GET /api/transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListTransactionsParams>,
) -> ApiResult<Json<Vec<TransactionDetail>>> {
    let item_id = match params.item_id.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(parse_id(raw, "item")?),
        None => None,
    };

    let limit = validate_limit(params.limit)?;

    Ok(Json(state.store.list_transactions(item_id, limit)?))
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TransactionDetail>> {
    let id = parse_id(&id, "transaction")?;
    let transaction = state
        .store
        .get_transaction(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Transaction {} not found", id)))?;
    Ok(Json(transaction))
}

/// POST /api/transactions
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(req): ApiJson<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    auth.require_any(&[Role::Admin, Role::Staff])?;
    let new = validate_create_request(req)?;

    let transaction = state.store.record_transaction(new, Some(auth.id()))?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            message: "Transaction recorded successfully".to_string(),
            transaction,
        }),
    ))
}

/// Validate a record request and convert it for the store
fn validate_create_request(req: CreateTransactionRequest) -> ApiResult<NewTransaction> {
    let item_id = parse_id(&req.item_id, "item")?;
    let kind: TransactionKind = req
        .kind
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| ApiError::Validation("Transaction type must be 'in' or 'out'".to_string()))?;

    if req.quantity <= 0 {
        return Err(ApiError::Validation(
            "Quantity must be a positive integer".to_string(),
        ));
    }
    if let Some(notes) = &req.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(ApiError::Validation(format!(
                "Notes exceed maximum length of {} characters",
                MAX_NOTES_LEN
            )));
        }
    }

    Ok(NewTransaction {
        item_id,
        kind,
        quantity: req.quantity,
        notes: req.notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn request(kind: &str, quantity: i64) -> CreateTransactionRequest {
        CreateTransactionRequest {
            item_id: Uuid::new_v4().to_string(),
            kind: kind.to_string(),
            quantity,
            notes: None,
        }
    }

    #[test]
    fn test_validate_create_request() {
        let new = validate_create_request(request("OUT", 3)).unwrap();
        assert_eq!(new.kind, TransactionKind::Out);
        assert_eq!(new.quantity, 3);

        assert!(validate_create_request(request("transfer", 3)).is_err());
        assert!(validate_create_request(request("in", 0)).is_err());
        assert!(validate_create_request(request("in", -5)).is_err());

        let bad_item = CreateTransactionRequest {
            item_id: "42".to_string(),
            ..request("in", 1)
        };
        assert!(validate_create_request(bad_item).is_err());
    }
}
