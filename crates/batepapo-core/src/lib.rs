//! Presence and message-visibility core of the chat room.
//!
//! Every component receives the same [`SharedStore`] handle and a [`Clock`]
//! at construction; nothing here reaches for global state.

pub mod clock;
pub mod messages;
pub mod policy;
pub mod reaper;
pub mod registry;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use messages::MessageLog;
pub use reaper::Reaper;
pub use registry::Registry;
pub use store::{ChatStore, MessageEdit, SharedStore, memory::MemoryStore};

#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;

/// Text of the notice appended when a participant registers.
pub const JOIN_TEXT: &str = "entered the room";
/// Text of the notice appended when the reaper evicts a participant.
pub const LEAVE_TEXT: &str = "left the room";
