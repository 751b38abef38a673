//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Health check
//!
//! # Customers
//! GET    /api/customers                - List customers
//! GET    /api/customers/{id}           - Customer detail
//! POST   /api/customers                - Create customer (201)
//! PUT    /api/customers/{id}           - Update customer
//! DELETE /api/customers/{id}           - Delete customer + its follow-ups (204)
//! GET    /api/customers/{id}/followups - Follow-ups for a customer
//!
//! # Follow-ups
//! GET    /api/followups                - List follow-ups
//! GET    /api/followups/{id}           - Follow-up detail
//! POST   /api/followups                - Create follow-up (201)
//! PUT    /api/followups/{id}           - Update follow-up
//! DELETE /api/followups/{id}           - Delete follow-up (204)
//!
//! # Products
//! GET    /api/products                 - List products
//! GET    /api/products/{id}            - Product detail
//! POST   /api/products                 - Create product (201; 400 on duplicate name)
//! DELETE /api/products/{id}            - Delete product (204)
//! ```
//!
//! Anything else falls through to the static front-end bundle when one is
//! present (SPA fallback to its `index.html`).

pub mod customers;
pub mod follow_ups;
pub mod products;

use axum::{Router, routing::get};
use serde::de::DeserializeOwned;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Create the `/api` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/customers", customers::router())
        .nest("/followups", follow_ups::router())
        .nest("/products", products::router())
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes());

    // Serve the compiled front-end bundle if it has been built, with an SPA
    // fallback to index.html for client-side routes.
    let static_dir = &state.config().static_dir;
    let router = if static_dir.is_dir() {
        let index = ServeFile::new(static_dir.join("index.html"));
        router.fallback_service(ServeDir::new(static_dir).fallback(index))
    } else {
        tracing::info!(
            static_dir = %static_dir.display(),
            "static bundle directory not found; serving API only"
        );
        router
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies: with
/// the persistent backend down the server keeps serving from memory.
async fn health() -> &'static str {
    "ok"
}

/// Parse a request body into a typed payload.
///
/// Schema violations become 400 responses carrying the deserialization
/// message, so clients see what field was missing or malformed.
pub(crate) fn parse_payload<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}
