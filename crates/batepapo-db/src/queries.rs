use anyhow::Result;
use batepapo_core::{ChatStore, MessageEdit};
use batepapo_types::{Message, Participant};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::Database;
use crate::models::{MessageRow, ParticipantRow};

const MESSAGE_COLUMNS: &str = "id, from_name, to_name, text, kind, time";

impl ChatStore for Database {
    // -- Participants --

    fn insert_participant(&self, participant: &Participant) -> Result<bool> {
        self.with_conn(|conn| {
            // Primary key on name makes this an atomic insert-if-absent
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO participants (name, last_seen) VALUES (?1, ?2)",
                rusqlite::params![participant.name, participant.last_seen.timestamp_millis()],
            )?;
            Ok(inserted == 1)
        })
    }

    fn list_participants(&self) -> Result<Vec<Participant>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT name, last_seen FROM participants ORDER BY rowid")?;
            let rows = stmt
                .query_map([], participant_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter().map(Participant::try_from).collect()
        })
    }

    fn find_participant(&self, name: &str) -> Result<Option<Participant>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT name, last_seen FROM participants WHERE name = ?1",
                [name],
                participant_row,
            )
            .optional()?
            .map(Participant::try_from)
            .transpose()
        })
    }

    fn touch_participant(&self, name: &str, at: DateTime<Utc>) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE participants SET last_seen = ?1 WHERE name = ?2",
                rusqlite::params![at.timestamp_millis(), name],
            )?;
            Ok(changed > 0)
        })
    }

    fn remove_participant(&self, name: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM participants WHERE name = ?1", [name])?;
            Ok(())
        })
    }

    // -- Messages --

    fn insert_message(&self, message: &Message) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, from_name, to_name, text, kind, time) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    message.id.to_string(),
                    message.from,
                    message.to,
                    message.text,
                    message.kind.as_str(),
                    message.time,
                ],
            )?;
            Ok(())
        })
    }

    fn recent_messages(&self, limit: Option<usize>) -> Result<Vec<Message>> {
        self.with_conn(|conn| query_recent_messages(conn, limit))
    }

    fn find_message(&self, id: Uuid) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1");
            conn.query_row(&sql, [id.to_string()], message_row)
                .optional()?
                .map(Message::try_from)
                .transpose()
        })
    }

    fn update_message(&self, id: Uuid, edit: &MessageEdit) -> Result<bool> {
        self.with_conn(|conn| {
            // Same textual key the row was inserted with
            let changed = conn.execute(
                "UPDATE messages SET to_name = ?1, text = ?2, kind = ?3 WHERE id = ?4",
                rusqlite::params![edit.to, edit.text, edit.kind.as_str(), id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    fn delete_message(&self, id: Uuid) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM messages WHERE id = ?1", [id.to_string()])?;
            Ok(changed > 0)
        })
    }
}

fn query_recent_messages(conn: &Connection, limit: Option<usize>) -> Result<Vec<Message>> {
    let rows = match limit {
        Some(n) => {
            // Take the newest n, then restore chronological order
            let sql = format!(
                "SELECT {MESSAGE_COLUMNS} FROM (
                     SELECT seq, {MESSAGE_COLUMNS} FROM messages ORDER BY seq DESC LIMIT ?1
                 ) ORDER BY seq ASC"
            );
            let n = i64::try_from(n).unwrap_or(i64::MAX);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([n], message_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        }
        None => {
            let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY seq ASC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], message_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        }
    };

    rows.into_iter().map(Message::try_from).collect()
}

fn participant_row(row: &Row<'_>) -> rusqlite::Result<ParticipantRow> {
    Ok(ParticipantRow {
        name: row.get(0)?,
        last_seen: row.get(1)?,
    })
}

fn message_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        from_name: row.get(1)?,
        to_name: row.get(2)?,
        text: row.get(3)?,
        kind: row.get(4)?,
        time: row.get(5)?,
    })
}
