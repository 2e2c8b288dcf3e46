use std::sync::Arc;

use batepapo_types::api::MessageDraft;
use batepapo_types::{BROADCAST_TARGET, ChatError, Message, MessageKind};
use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::policy;
use crate::store::{MessageEdit, SharedStore, unavailable};

/// Append-only log of chat lines and status notices, read back through
/// the visibility policy.
#[derive(Clone)]
pub struct MessageLog {
    store: SharedStore,
    clock: Arc<dyn Clock>,
}

impl MessageLog {
    pub fn new(store: SharedStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Stores a message under a fresh id and the current time. Content is
    /// not checked here.
    pub fn append(&self, from: &str, edit: MessageEdit) -> Result<Uuid, ChatError> {
        let message = Message {
            id: Uuid::new_v4(),
            from: from.to_string(),
            to: edit.to,
            text: edit.text,
            kind: edit.kind,
            time: self.clock.now_hms(),
        };
        self.store
            .insert_message(&message)
            .map_err(unavailable("insert message"))?;
        Ok(message.id)
    }

    /// Broadcasts a status notice on behalf of `name`.
    pub(crate) fn announce(&self, name: &str, text: &str) -> Result<Uuid, ChatError> {
        self.append(
            name,
            MessageEdit {
                to: BROADCAST_TARGET.to_string(),
                text: text.to_string(),
                kind: MessageKind::Status,
            },
        )
    }

    pub fn post(&self, sender: &str, draft: &MessageDraft) -> Result<Uuid, ChatError> {
        let edit = policy::validate_draft(draft)?;
        self.ensure_registered(sender)?;

        let id = self.append(sender, edit)?;
        debug!("{} posted message {}", sender, id);
        Ok(id)
    }

    /// With a positive `limit`, only the last `limit` stored messages are
    /// considered, and visibility is applied to that window afterwards.
    pub fn list_visible_to(
        &self,
        viewer: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, ChatError> {
        let window = self
            .store
            .recent_messages(limit.filter(|n| *n > 0))
            .map_err(unavailable("list messages"))?;

        Ok(window
            .into_iter()
            .filter(|m| policy::is_visible(m, viewer))
            .collect())
    }

    pub fn get(&self, id: Uuid) -> Result<Message, ChatError> {
        self.store
            .find_message(id)
            .map_err(unavailable("find message"))?
            .ok_or_else(|| ChatError::NotFound(format!("message {id}")))
    }

    pub fn update(&self, id: Uuid, editor: &str, draft: &MessageDraft) -> Result<(), ChatError> {
        let edit = policy::validate_draft(draft)?;
        self.ensure_registered(editor)?;

        let message = self.get(id)?;
        if !policy::can_modify(&message, editor) {
            return Err(ChatError::Forbidden(editor.to_string()));
        }

        // The row may have been deleted since the ownership check.
        let updated = self
            .store
            .update_message(id, &edit)
            .map_err(unavailable("update message"))?;
        if !updated {
            return Err(ChatError::NotFound(format!("message {id}")));
        }

        debug!("{} edited message {}", editor, id);
        Ok(())
    }

    pub fn delete(&self, id: Uuid, requester: &str) -> Result<(), ChatError> {
        let message = self.get(id)?;
        if !policy::can_modify(&message, requester) {
            return Err(ChatError::Forbidden(requester.to_string()));
        }

        let deleted = self
            .store
            .delete_message(id)
            .map_err(unavailable("delete message"))?;
        if !deleted {
            return Err(ChatError::NotFound(format!("message {id}")));
        }

        debug!("{} deleted message {}", requester, id);
        Ok(())
    }

    fn ensure_registered(&self, name: &str) -> Result<(), ChatError> {
        let found = self
            .store
            .find_participant(name)
            .map_err(unavailable("find participant"))?;
        match found {
            Some(_) => Ok(()),
            None => Err(ChatError::UnknownSender(name.to_string())),
        }
    }
}
