//! Authentication
//!
//! Bearer-token auth for the API:
//!
//! - **jwt**: `JwtHandler` signs and validates HS256 tokens carrying `Claims`
//! - **middleware**: `require_auth` resolves the caller to a verified user,
//!   `require_admin` guards admin-only routes
//! - **error**: `AuthError` and its status mapping
//!
//! Tokens are stateless. The user record in the store, not the role claim in
//! the token, decides what a caller may do.

pub mod error;
pub mod jwt;
pub mod middleware;

pub use error::AuthError;
pub use jwt::{Claims, JwtHandler};
pub use middleware::{require_admin, require_auth, AuthUser};
