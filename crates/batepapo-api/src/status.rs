use axum::{Extension, extract::State, http::StatusCode};

use crate::error::ApiError;
use crate::middleware::Identity;
use crate::{AppState, run_blocking};

/// Keeps the caller from being reaped.
pub async fn heartbeat(
    State(state): State<AppState>,
    Extension(Identity(name)): Extension<Identity>,
) -> Result<StatusCode, ApiError> {
    run_blocking(move || state.registry.heartbeat(&name)).await?;
    Ok(StatusCode::OK)
}
