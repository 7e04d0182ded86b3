//! Barcode Routes
//!
//! - GET /api/barcodes/:code - Scan lookup
//! - POST /api/barcodes/generate - Propose an unused EAN-13 barcode

use axum::{
    extract::{Path, State},
    Json,
};
use rand::Rng;
use std::sync::Arc;

use crate::api::dto::BarcodeResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::ItemDetail;

const GENERATE_ATTEMPTS: usize = 16;

/// GET /api/barcodes/:code
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<ItemDetail>> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ApiError::Validation("Barcode is required".to_string()));
    }

    let item = state
        .store
        .find_by_barcode(code)?
        .ok_or_else(|| ApiError::NotFound(format!("No item with barcode {}", code)))?;

    tracing::debug!(barcode = %code, item_id = %item.item.id, "Barcode scanned");
    Ok(Json(item))
}

/// POST /api/barcodes/generate
///
/// The barcode is only proposed, not reserved.
pub async fn generate(State(state): State<Arc<AppState>>) -> ApiResult<Json<BarcodeResponse>> {
    for _ in 0..GENERATE_ATTEMPTS {
        let candidate = random_ean13(&mut rand::thread_rng());
        if !state.store.barcode_exists(&candidate)? {
            return Ok(Json(BarcodeResponse { barcode: candidate }));
        }
    }

    Err(ApiError::Internal(
        "Could not find an unused barcode".to_string(),
    ))
}

/// Random 13-digit EAN with a valid check digit and no leading zero
fn random_ean13(rng: &mut impl Rng) -> String {
    let mut digits = [0u8; 12];
    digits[0] = rng.gen_range(1..=9);
    for digit in digits.iter_mut().skip(1) {
        *digit = rng.gen_range(0..=9);
    }

    let mut code: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    code.push(char::from(b'0' + ean13_check_digit(&digits)));
    code
}

/// Weights alternate 1 and 3 from the left
fn ean13_check_digit(digits: &[u8; 12]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_digit() {
        // 4006381333931 is a published EAN-13
        let digits = [4, 0, 0, 6, 3, 8, 1, 3, 3, 3, 9, 3];
        assert_eq!(ean13_check_digit(&digits), 1);
    }

    #[test]
    fn test_random_ean13_shape() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let code = random_ean13(&mut rng);
            assert_eq!(code.len(), 13);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));

            let digits: Vec<u8> = code.bytes().map(|b| b - b'0').collect();
            let mut head = [0u8; 12];
            head.copy_from_slice(&digits[..12]);
            assert_eq!(digits[12], ean13_check_digit(&head));
        }
    }
}
