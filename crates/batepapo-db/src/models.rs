//! Row types as stored in SQLite, kept apart from the API models.

use anyhow::{Result, anyhow};
use batepapo_types::{Message, Participant};
use chrono::DateTime;

pub struct ParticipantRow {
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub last_seen: i64,
}

pub struct MessageRow {
    pub id: String,
    pub from_name: String,
    pub to_name: String,
    pub text: String,
    pub kind: String,
    pub time: String,
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = anyhow::Error;

    fn try_from(row: ParticipantRow) -> Result<Self> {
        let last_seen = DateTime::from_timestamp_millis(row.last_seen)
            .ok_or_else(|| anyhow!("Corrupt last_seen {} for '{}'", row.last_seen, row.name))?;
        Ok(Participant {
            name: row.name,
            last_seen,
        })
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = anyhow::Error;

    fn try_from(row: MessageRow) -> Result<Self> {
        let id = row
            .id
            .parse()
            .map_err(|e| anyhow!("Corrupt message id '{}': {}", row.id, e))?;
        let kind = row
            .kind
            .parse()
            .map_err(|e| anyhow!("Corrupt kind on message '{}': {}", row.id, e))?;
        Ok(Message {
            id,
            from: row.from_name,
            to: row.to_name,
            text: row.text,
            kind,
            time: row.time,
        })
    }
}
