//! Customer CRUD handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use veda_crm_core::{Customer, CustomerId, FollowUp, NewCustomer};

use super::parse_payload;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
        .route("/{id}/followups", get(follow_ups))
}

async fn list(State(state): State<AppState>) -> Json<Vec<Customer>> {
    Json(state.storage().customers().await)
}

async fn show(State(state): State<AppState>, Path(id): Path<CustomerId>) -> Result<Json<Customer>> {
    state
        .storage()
        .customer(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Customer"))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Customer>)> {
    let new: NewCustomer = parse_payload(body)?;
    let customer = state.storage().create_customer(new).await;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Customer>> {
    let new: NewCustomer = parse_payload(body)?;
    state
        .storage()
        .update_customer(id, new)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Customer"))
}

async fn remove(State(state): State<AppState>, Path(id): Path<CustomerId>) -> Result<StatusCode> {
    if state.storage().delete_customer(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Customer"))
    }
}

async fn follow_ups(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Json<Vec<FollowUp>> {
    Json(state.storage().follow_ups_by_customer(id).await)
}
