//! Request Extractors
//!
//! Wrappers around axum's `Json` and `Query` that report bad input as
//! [`ApiError::Validation`], so malformed bodies and query strings get the
//! same 400 error body as every other rejected request.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};

use crate::api::error::ApiError;

/// JSON request body
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Query string parameters
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct PricedBody {
        name: String,
        price: f64,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Params {
        low_stock: Option<bool>,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body_accepted() {
        let ApiJson(body) = ApiJson::<PricedBody>::from_request(
            json_request(r#"{"name":"Paper","price":8}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(body.name, "Paper");
        assert_eq!(body.price, 8.0);
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let err = ApiJson::<PricedBody>::from_request(json_request(r#"{"name":"Paper"}"#), &())
            .await
            .err()
            .unwrap();
        match err {
            ApiError::Validation(message) => assert!(message.contains("price")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bad_query_value_is_validation_error() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/?lowStock=maybe")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let err = ApiQuery::<Params>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::Validation(_)));

        let (mut parts, _) = axum::http::Request::builder()
            .uri("/?lowStock=true")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let ApiQuery(params) = ApiQuery::<Params>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(params.low_stock, Some(true));
    }
}
