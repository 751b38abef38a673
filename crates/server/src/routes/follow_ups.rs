//! Follow-up CRUD handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use veda_crm_core::{FollowUp, FollowUpId, NewFollowUp};

use super::parse_payload;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Build the follow-ups router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Json<Vec<FollowUp>> {
    Json(state.storage().follow_ups().await)
}

async fn show(State(state): State<AppState>, Path(id): Path<FollowUpId>) -> Result<Json<FollowUp>> {
    state
        .storage()
        .follow_up(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Follow-up"))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<FollowUp>)> {
    let new: NewFollowUp = parse_payload(body)?;
    let follow_up = state.storage().create_follow_up(new).await;
    Ok((StatusCode::CREATED, Json(follow_up)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<FollowUpId>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<FollowUp>> {
    let new: NewFollowUp = parse_payload(body)?;
    state
        .storage()
        .update_follow_up(id, new)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Follow-up"))
}

async fn remove(State(state): State<AppState>, Path(id): Path<FollowUpId>) -> Result<StatusCode> {
    if state.storage().delete_follow_up(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Follow-up"))
    }
}
