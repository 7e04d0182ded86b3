//! User Routes
//!
//! - GET /api/users - List users (admin)
//! - GET /api/users/:id - Own profile, or any profile for admins
//! - PUT /api/users/:id - Update own name; role and verification changes need admin

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::api::dto::{UpdateUserRequest, UserResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::ApiJson;
use crate::api::routes::parse_id;
use crate::api::state::AppState;
use crate::auth::{AuthError, AuthUser};
use crate::storage::{Role, User, UserUpdate};

const MAX_NAME_LEN: usize = 100;

/// GET /api/users
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users()?))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id, "user")?;
    ensure_self_or_admin(&auth, id)?;

    let user = state
        .store
        .get_user(id)?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;
    Ok(Json(user))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let id = parse_id(&id, "user")?;
    ensure_self_or_admin(&auth, id)?;
    let update = validate_update_request(&auth, req)?;

    let user = state.store.update_user(id, update)?;

    tracing::info!(user_id = %id, updated_by = %auth.id(), "User updated");

    Ok(Json(UserResponse {
        message: "User updated successfully".to_string(),
        user,
    }))
}

fn ensure_self_or_admin(auth: &AuthUser, id: uuid::Uuid) -> Result<(), AuthError> {
    if auth.id() == id || auth.is_admin() {
        Ok(())
    } else {
        Err(AuthError::Forbidden(
            "You can only access your own account.".to_string(),
        ))
    }
}

/// Check field-level permissions and convert the request for the store
fn validate_update_request(auth: &AuthUser, req: UpdateUserRequest) -> ApiResult<UserUpdate> {
    if (req.role.is_some() || req.is_verified.is_some()) && !auth.is_admin() {
        return Err(AuthError::Forbidden(
            "Admin role required to change role or verification.".to_string(),
        )
        .into());
    }

    if let Some(name) = &req.full_name {
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ApiError::Validation(format!(
                "Full name exceeds maximum length of {} characters",
                MAX_NAME_LEN
            )));
        }
    }

    let role = req
        .role
        .as_deref()
        .map(|r| r.parse::<Role>().map_err(ApiError::Validation))
        .transpose()?;

    Ok(UserUpdate {
        full_name: req.full_name,
        role,
        is_verified: req.is_verified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn auth(role: Role) -> AuthUser {
        AuthUser(User {
            id: Uuid::new_v4(),
            email: format!("{}@glostock.test", role),
            full_name: String::new(),
            role,
            is_verified: true,
            created_at: Utc::now(),
        })
    }

    #[test]
    fn test_self_or_admin() {
        let staff = auth(Role::Staff);
        assert!(ensure_self_or_admin(&staff, staff.id()).is_ok());
        assert!(ensure_self_or_admin(&staff, Uuid::new_v4()).is_err());

        let admin = auth(Role::Admin);
        assert!(ensure_self_or_admin(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_role_change_requires_admin() {
        let req = UpdateUserRequest {
            role: Some("admin".to_string()),
            ..Default::default()
        };

        let err = validate_update_request(&auth(Role::User), req.clone()).unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::Forbidden(_))));

        let update = validate_update_request(&auth(Role::Admin), req).unwrap();
        assert_eq!(update.role, Some(Role::Admin));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let req = UpdateUserRequest {
            role: Some("owner".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_update_request(&auth(Role::Admin), req),
            Err(ApiError::Validation(_))
        ));
    }
}
