//! Product CRUD handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use veda_crm_core::{NewProduct, Product, ProductId};

use super::parse_payload;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).delete(remove))
}

async fn list(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.storage().products().await)
}

async fn show(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Json<Product>> {
    state
        .storage()
        .product(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Product"))
}

/// Create a product.
///
/// Name uniqueness is enforced here via a lookup-then-create, not atomically
/// by the store; see the storage module notes.
async fn create(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Product>)> {
    let new: NewProduct = parse_payload(body)?;

    if new.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Product name must not be empty".to_owned()));
    }
    if state.storage().product_by_name(&new.name).await.is_some() {
        return Err(ApiError::BadRequest(format!(
            "Product \"{}\" already exists",
            new.name
        )));
    }

    let product = state.storage().create_product(new).await;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn remove(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<StatusCode> {
    if state.storage().delete_product(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Product"))
    }
}
