use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recipient name that addresses everyone in the room.
pub const BROADCAST_TARGET: &str = "Todos";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Public chat line, visible to every participant.
    Message,
    /// Addressed to a single participant.
    PrivateMessage,
    /// Join/leave notice produced by the server.
    Status,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Message => "message",
            MessageKind::PrivateMessage => "private_message",
            MessageKind::Status => "status",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageKind::Message),
            "private_message" => Ok(MessageKind::PrivateMessage),
            "status" => Ok(MessageKind::Status),
            other => Err(format!("unknown message type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Wall-clock creation time, `HH:MM:SS`.
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_wire_names() {
        assert_eq!("message".parse::<MessageKind>(), Ok(MessageKind::Message));
        assert_eq!(
            "private_message".parse::<MessageKind>(),
            Ok(MessageKind::PrivateMessage)
        );
        assert_eq!("status".parse::<MessageKind>(), Ok(MessageKind::Status));
        assert!("Message".parse::<MessageKind>().is_err());
        assert!("".parse::<MessageKind>().is_err());
    }

    #[test]
    fn message_serializes_kind_as_type() {
        let msg = Message {
            id: Uuid::nil(),
            from: "Alice".into(),
            to: BROADCAST_TARGET.into(),
            text: "hi".into(),
            kind: MessageKind::PrivateMessage,
            time: "12:00:00".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "private_message");
        assert_eq!(json["from"], "Alice");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn participant_uses_camel_case() {
        let p = Participant {
            name: "Bob".into(),
            last_seen: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("lastSeen").is_some());
    }
}
