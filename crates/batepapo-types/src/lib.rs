pub mod api;
pub mod error;
pub mod models;

pub use error::ChatError;
pub use models::{BROADCAST_TARGET, Message, MessageKind, Participant};
