//! Authentication errors

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Access denied. No token provided.")]
    MissingToken,

    #[error("Invalid authorization format. Use: Bearer <token>")]
    InvalidFormat,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Invalid token. User not found.")]
    UserNotFound,

    #[error("Please verify your email to access this resource.")]
    NotVerified,

    /// Authenticated, but the role is not allowed here
    #[error("Access denied. {0}")]
    Forbidden(String),

    #[error("Token lifetime of {0} hours is out of range")]
    InvalidLifetime(i64),

    #[error("Failed to generate token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidFormat
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthError::NotVerified | AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::InvalidLifetime(_) | AuthError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidFormat | AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::NotVerified => "NOT_VERIFIED",
            AuthError::Forbidden(_) => "FORBIDDEN",
            AuthError::InvalidLifetime(_) | AuthError::Signing(_) => "TOKEN_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(AuthError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNotFound.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::NotVerified.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::Forbidden("Admin role required.".to_string()).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_forbidden_message() {
        let err = AuthError::Forbidden("Admin role required.".to_string());
        assert_eq!(err.to_string(), "Access denied. Admin role required.");
    }
}
