//! Glo Stock REST API
//!
//! HTTP API layer for Glo Stock, built with Axum.
//!
//! Everything under `/api` except `/api/health` and `/api/auth/logout`
//! requires `Authorization: Bearer <token>` for a verified user.
//!
//! # Endpoints
//!
//! ## Auth
//! - `GET /api/auth/profile` - Current user
//! - `POST /api/auth/logout` - Stateless logout acknowledgement
//!
//! ## Items
//! - `GET /api/items` - List items (`search`, `categoryId`, `lowStock`, `sort`, `order`, `limit`, `offset`)
//! - `POST /api/items` - Create an item
//! - `GET /api/items/:id` - Get an item
//! - `PUT /api/items/:id` - Update an item
//! - `DELETE /api/items/:id` - Delete an item (admin)
//!
//! ## Barcodes
//! - `GET /api/barcodes/:code` - Scan lookup
//! - `POST /api/barcodes/generate` - Propose an unused barcode
//!
//! ## Categories
//! - `GET /api/categories` - List categories with product counts
//! - `POST /api/categories` - Create a category (admin, staff)
//! - `GET /api/categories/:id` - Get a category
//! - `PUT /api/categories/:id` - Update a category (admin, staff)
//! - `DELETE /api/categories/:id` - Delete a category (admin)
//!
//! ## Transactions
//! - `GET /api/transactions` - List stock movements
//! - `POST /api/transactions` - Record a stock-in or stock-out (admin, staff)
//! - `GET /api/transactions/:id` - Get a movement
//!
//! ## Stats
//! - `GET /api/stats` - Inventory statistics
//! - `GET /api/stats/low-stock` - Items needing restock
//!
//! ## Users
//! - `GET /api/users` - List users (admin)
//! - `GET /api/users/:id` - Get a user (self or admin)
//! - `PUT /api/users/:id` - Update a user (self or admin)
//!
//! ## Health
//! - `GET /` - Welcome banner
//! - `GET /api/health` - Service and database status
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! # Example
//!
//! ```rust,ignore
//! use glostock::api::{serve, ApiConfig, AppState};
//! use glostock::auth::JwtHandler;
//! use glostock::storage::InventoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InventoryStore::open("./glostock.db")?);
//!     let jwt = Arc::new(JwtHandler::new("change-me", 24));
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, jwt, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiQuery};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{require_admin, require_auth};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);
    let config = Arc::clone(&shared_state.config);

    let public_routes = Router::new()
        .route("/health", get(routes::health::api_health))
        .route("/auth/logout", post(routes::auth::logout));

    let protected_routes = Router::new()
        // Auth routes
        .route("/auth/profile", get(routes::auth::profile))
        // Item routes
        .route(
            "/items",
            get(routes::items::list_items).post(routes::items::create_item),
        )
        .route(
            "/items/:id",
            get(routes::items::get_item).put(routes::items::update_item),
        )
        .route(
            "/items/:id",
            delete(routes::items::delete_item).route_layer(middleware::from_fn(require_admin)),
        )
        // Barcode routes
        .route("/barcodes/generate", post(routes::barcodes::generate))
        .route("/barcodes/:code", get(routes::barcodes::lookup))
        // Category routes
        .route(
            "/categories",
            get(routes::categories::list_categories).post(routes::categories::create_category),
        )
        .route(
            "/categories/:id",
            get(routes::categories::get_category).put(routes::categories::update_category),
        )
        .route(
            "/categories/:id",
            delete(routes::categories::delete_category)
                .route_layer(middleware::from_fn(require_admin)),
        )
        // Transaction routes
        .route(
            "/transactions",
            get(routes::transactions::list_transactions)
                .post(routes::transactions::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(routes::transactions::get_transaction),
        )
        // Stats routes
        .route("/stats", get(routes::stats::inventory_stats))
        .route("/stats/low-stock", get(routes::stats::low_stock))
        // User routes
        .route(
            "/users",
            get(routes::users::list_users).route_layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user).put(routes::users::update_user),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&shared_state),
            require_auth,
        ));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness));

    Router::new()
        .route("/", get(routes::health::welcome))
        .nest("/api", public_routes.merge(protected_routes))
        .nest("/health", health_routes)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(shared_state)
}

/// CORS for the configured origins, with credentials; permissive when none are set
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Glo Stock API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Glo Stock API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
