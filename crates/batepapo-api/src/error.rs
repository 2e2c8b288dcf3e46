use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use batepapo_types::ChatError;
use batepapo_types::api::ErrorResponse;
use tracing::debug;

/// A core error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ChatError);

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        ApiError(e)
    }
}

/// Unreadable or mistyped bodies are invalid input like any other.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ChatError::InvalidInput(rejection.body_text()))
    }
}

pub fn status_for(err: &ChatError) -> StatusCode {
    match err {
        ChatError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ChatError::NameTaken(_) => StatusCode::CONFLICT,
        ChatError::UnknownSender(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ChatError::NotFound(_) => StatusCode::NOT_FOUND,
        ChatError::Forbidden(_) => StatusCode::FORBIDDEN,
        ChatError::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        debug!("Request failed with {}: {}", status, self.0);
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
