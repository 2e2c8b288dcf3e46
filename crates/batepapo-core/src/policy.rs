//! Who may see a message, who may change it, and what counts as valid input.
//! Nothing in here touches the store.

use batepapo_types::api::MessageDraft;
use batepapo_types::{BROADCAST_TARGET, ChatError, Message, MessageKind};

use crate::store::MessageEdit;

pub fn is_visible(message: &Message, viewer: &str) -> bool {
    message.kind == MessageKind::Message
        || message.to == viewer
        || message.from == viewer
        || message.to == BROADCAST_TARGET
}

/// Ownership is plain name equality with the sender.
pub fn can_modify(message: &Message, requester: &str) -> bool {
    message.from == requester
}

/// Returns the trimmed name.
pub fn validate_name(raw: &str) -> Result<String, ChatError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ChatError::InvalidInput("name must not be empty".into()));
    }
    Ok(name.to_string())
}

/// Checks the client-editable fields of a message. Status notices are
/// server-only, so `status` is rejected here.
pub fn validate_draft(draft: &MessageDraft) -> Result<MessageEdit, ChatError> {
    let to = draft.to.trim();
    if to.is_empty() {
        return Err(ChatError::InvalidInput("recipient must not be empty".into()));
    }

    let text = draft.text.trim();
    if text.is_empty() {
        return Err(ChatError::InvalidInput("text must not be empty".into()));
    }

    let kind = match draft.kind.parse::<MessageKind>() {
        Ok(k @ (MessageKind::Message | MessageKind::PrivateMessage)) => k,
        _ => {
            return Err(ChatError::InvalidInput(format!(
                "type must be 'message' or 'private_message', got '{}'",
                draft.kind
            )));
        }
    };

    Ok(MessageEdit {
        to: to.to_string(),
        text: text.to_string(),
        kind,
    })
}
