use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use batepapo_types::api::{MessageDraft, MessageQuery, PostMessageResponse};
use batepapo_types::{ChatError, Message};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::Identity;
use crate::{AppState, run_blocking};

pub async fn post_message(
    State(state): State<AppState>,
    Extension(Identity(sender)): Extension<Identity>,
    payload: Result<Json<MessageDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = payload?;
    let id = run_blocking(move || state.messages.post(&sender, &draft)).await?;
    Ok((StatusCode::CREATED, Json(PostMessageResponse { id })))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(Identity(viewer)): Extension<Identity>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let limit = query.parsed_limit();
    let messages = run_blocking(move || state.messages.list_visible_to(&viewer, limit)).await?;
    Ok(Json(messages))
}

pub async fn update_message(
    State(state): State<AppState>,
    Extension(Identity(editor)): Extension<Identity>,
    Path(message_id): Path<String>,
    payload: Result<Json<MessageDraft>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(draft) = payload?;
    let id = parse_message_id(&message_id)?;
    run_blocking(move || state.messages.update(id, &editor, &draft)).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_message(
    State(state): State<AppState>,
    Extension(Identity(requester)): Extension<Identity>,
    Path(message_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_message_id(&message_id)?;
    run_blocking(move || state.messages.delete(id, &requester)).await?;
    Ok(StatusCode::OK)
}

/// An id that cannot name any stored message is simply not found.
fn parse_message_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(ChatError::NotFound(format!("message {raw}"))))
}
