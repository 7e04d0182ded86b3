//! Authentication Middleware
//!
//! `require_auth` validates the bearer token, loads the user it names and
//! attaches it to the request as `AuthUser`. Handlers behind it take
//! `Extension<AuthUser>`.

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::auth::error::AuthError;
use crate::storage::{Role, User};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// The verified user making the request
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// Fail with 403 unless the caller has one of `roles`
    pub fn require_any(&self, roles: &[Role]) -> Result<(), AuthError> {
        if roles.contains(&self.0.role) {
            return Ok(());
        }

        let allowed: Vec<&str> = roles.iter().map(Role::as_str).collect();
        Err(AuthError::Forbidden(format!(
            "Requires one of roles: {}.",
            allowed.join(", ")
        )))
    }
}

/// Verify the bearer token and resolve it to a verified user
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)?;
    let claims = state.jwt.validate_token(token)?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
    let user = state
        .store
        .get_user(user_id)?
        .ok_or(AuthError::UserNotFound)?;

    if !user.is_verified {
        tracing::debug!(user_id = %user.id, "Rejected unverified user");
        return Err(AuthError::NotVerified.into());
    }

    req.extensions_mut().insert(AuthUser(user));
    Ok(next.run(req).await)
}

/// Admin-only guard; must run after `require_auth`
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<AuthUser>() {
        Some(user) if user.is_admin() => Ok(next.run(req).await),
        Some(_) => Err(AuthError::Forbidden("Admin role required.".to_string()).into()),
        None => Err(AuthError::MissingToken.into()),
    }
}

fn bearer_token(req: &Request) -> Result<&str, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let value = header.to_str().map_err(|_| AuthError::InvalidFormat)?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidFormat)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}
