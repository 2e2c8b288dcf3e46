use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use batepapo_types::{Message, Participant};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ChatStore, MessageEdit};

/// Process-local store. Each call holds one lock for its whole duration,
/// which makes insert-if-absent atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    participants: Mutex<Vec<Participant>>,
    messages: Mutex<Vec<Message>>,
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    m.lock().map_err(|e| anyhow!("Store lock poisoned: {}", e))
}

impl ChatStore for MemoryStore {
    fn insert_participant(&self, participant: &Participant) -> Result<bool> {
        let mut participants = lock(&self.participants)?;
        if participants.iter().any(|p| p.name == participant.name) {
            return Ok(false);
        }
        participants.push(participant.clone());
        Ok(true)
    }

    fn list_participants(&self) -> Result<Vec<Participant>> {
        Ok(lock(&self.participants)?.clone())
    }

    fn find_participant(&self, name: &str) -> Result<Option<Participant>> {
        Ok(lock(&self.participants)?
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    fn touch_participant(&self, name: &str, at: DateTime<Utc>) -> Result<bool> {
        let mut participants = lock(&self.participants)?;
        match participants.iter_mut().find(|p| p.name == name) {
            Some(p) => {
                p.last_seen = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove_participant(&self, name: &str) -> Result<()> {
        lock(&self.participants)?.retain(|p| p.name != name);
        Ok(())
    }

    fn insert_message(&self, message: &Message) -> Result<()> {
        lock(&self.messages)?.push(message.clone());
        Ok(())
    }

    fn recent_messages(&self, limit: Option<usize>) -> Result<Vec<Message>> {
        let messages = lock(&self.messages)?;
        let skip = limit.map_or(0, |n| messages.len().saturating_sub(n));
        Ok(messages[skip..].to_vec())
    }

    fn find_message(&self, id: Uuid) -> Result<Option<Message>> {
        Ok(lock(&self.messages)?.iter().find(|m| m.id == id).cloned())
    }

    fn update_message(&self, id: Uuid, edit: &MessageEdit) -> Result<bool> {
        let mut messages = lock(&self.messages)?;
        match messages.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.to = edit.to.clone();
                m.text = edit.text.clone();
                m.kind = edit.kind;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_message(&self, id: Uuid) -> Result<bool> {
        let mut messages = lock(&self.messages)?;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        Ok(messages.len() != before)
    }
}
