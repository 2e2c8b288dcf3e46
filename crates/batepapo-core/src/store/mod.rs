//! Persistence seam shared by the registry, the message log and the reaper.
//!
//! Each method is a single atomic document operation; there are no
//! multi-document transactions. Any `Err` means the store itself failed.

pub mod memory;

use std::sync::Arc;

use anyhow::Result;
use batepapo_types::{ChatError, Message, MessageKind, Participant};
use chrono::{DateTime, Utc};
use tracing::error;
use uuid::Uuid;

pub type SharedStore = Arc<dyn ChatStore>;

/// Mutable fields of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEdit {
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
}

pub trait ChatStore: Send + Sync {
    // -- Participants --

    /// Inserts unless a participant with the same name exists.
    /// Returns `false` when the name was already present.
    fn insert_participant(&self, participant: &Participant) -> Result<bool>;

    /// All participants, oldest registration first.
    fn list_participants(&self) -> Result<Vec<Participant>>;

    fn find_participant(&self, name: &str) -> Result<Option<Participant>>;

    /// Returns `false` when no such participant exists.
    fn touch_participant(&self, name: &str, at: DateTime<Utc>) -> Result<bool>;

    /// No-op when the name is absent.
    fn remove_participant(&self, name: &str) -> Result<()>;

    // -- Messages --

    fn insert_message(&self, message: &Message) -> Result<()>;

    /// Messages in insertion order. With `Some(n)`, only the last `n` stored.
    fn recent_messages(&self, limit: Option<usize>) -> Result<Vec<Message>>;

    fn find_message(&self, id: Uuid) -> Result<Option<Message>>;

    /// Returns `false` when the id is unknown.
    fn update_message(&self, id: Uuid, edit: &MessageEdit) -> Result<bool>;

    /// Returns `false` when the id is unknown.
    fn delete_message(&self, id: Uuid) -> Result<bool>;
}

/// Logs a store failure and collapses it into [`ChatError::StoreUnavailable`].
pub(crate) fn unavailable(op: &'static str) -> impl FnOnce(anyhow::Error) -> ChatError {
    move |e| {
        error!("Store failure during {}: {:#}", op, e);
        ChatError::StoreUnavailable
    }
}
