use thiserror::Error;

/// Outcomes of a chat operation that the caller can recover from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("name '{0}' is already taken")]
    NameTaken(String),

    #[error("sender '{0}' is not in the room")]
    UnknownSender(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("'{0}' does not own this message")]
    Forbidden(String),

    #[error("store unavailable")]
    StoreUnavailable,
}
