use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Participants --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
}

// -- Messages --

/// Body of a post or an edit. `type` stays a raw string so an unknown
/// value surfaces as invalid input instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageDraft {
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    /// Kept as text; anything that is not a positive integer is ignored.
    pub limit: Option<String>,
}

impl MessageQuery {
    pub fn parsed_limit(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
