//! HTTP surface of the chat room. Handlers only translate requests into
//! core calls; every rule lives in `batepapo-core`.

pub mod error;
pub mod messages;
pub mod middleware;
pub mod participants;
pub mod state;
pub mod status;

use axum::{
    Router, middleware as axum_middleware,
    routing::{post, put},
};
use batepapo_types::ChatError;
use tracing::error;

use crate::error::ApiError;
use crate::middleware::require_identity;
pub use crate::state::{AppState, AppStateInner};

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route(
        "/participants",
        post(participants::register).get(participants::list),
    );

    let identified_routes = Router::new()
        .route("/status", post(status::heartbeat))
        .route(
            "/messages",
            post(messages::post_message).get(messages::list_messages),
        )
        .route(
            "/messages/{message_id}",
            put(messages::update_message).delete(messages::delete_message),
        )
        .route_layer(axum_middleware::from_fn(require_identity));

    Router::new()
        .merge(public_routes)
        .merge(identified_routes)
        .with_state(state)
}

/// Runs a core call on the blocking pool; the store may do disk I/O.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ChatError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError(ChatError::StoreUnavailable)
        })?
        .map_err(ApiError)
}
