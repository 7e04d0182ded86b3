//! Auth Routes
//!
//! - GET /api/auth/profile - The caller's own user record
//! - POST /api/auth/logout - Acknowledge logout (tokens are stateless)

use axum::{Extension, Json};

use crate::api::dto::MessageResponse;
use crate::auth::AuthUser;
use crate::storage::User;

/// GET /api/auth/profile
pub async fn profile(Extension(auth): Extension<AuthUser>) -> Json<User> {
    Json(auth.0)
}

/// POST /api/auth/logout
///
/// Nothing to revoke server-side; the client drops its token.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logout successful"))
}
