//! API Routes
//!
//! Route handlers organized by functionality.

pub mod auth;
pub mod barcodes;
pub mod categories;
pub mod health;
pub mod items;
pub mod stats;
pub mod transactions;
pub mod users;

use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};

/// Largest page a list endpoint returns
pub(crate) const MAX_PAGE_SIZE: usize = 1000;

/// Parse a path or query id, rejecting malformed ones with 400
pub(crate) fn parse_id(raw: &str, what: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::Validation(format!("Invalid {} id: '{}'", what, raw)))
}

/// Require a non-blank name no longer than `max` characters
pub(crate) fn validate_name(name: &str, field: &str, max: usize) -> ApiResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max {
        return Err(ApiError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Check an optional `limit` query parameter against [`MAX_PAGE_SIZE`]
pub(crate) fn validate_limit(limit: Option<usize>) -> ApiResult<Option<usize>> {
    match limit {
        Some(limit) if limit == 0 || limit > MAX_PAGE_SIZE => Err(ApiError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "item").unwrap(), id);
        assert!(matches!(
            parse_id("not-a-uuid", "item"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Widgets", "Name", 10).is_ok());
        assert!(validate_name("   ", "Name", 10).is_err());
        assert!(validate_name("abcdefghijk", "Name", 10).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(None).unwrap(), None);
        assert_eq!(validate_limit(Some(50)).unwrap(), Some(50));
        assert_eq!(validate_limit(Some(MAX_PAGE_SIZE)).unwrap(), Some(MAX_PAGE_SIZE));
        assert!(validate_limit(Some(0)).is_err());
        assert!(validate_limit(Some(MAX_PAGE_SIZE + 1)).is_err());
        assert!(validate_limit(Some(usize::MAX)).is_err());
    }
}
