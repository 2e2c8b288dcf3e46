use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use batepapo_types::Participant;
use batepapo_types::api::RegisterRequest;

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let participant = run_blocking(move || state.registry.register(&req.name)).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Participant>>, ApiError> {
    let participants = run_blocking(move || state.registry.list()).await?;
    Ok(Json(participants))
}
