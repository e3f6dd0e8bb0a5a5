//! Core data models for Callboard.
//!
//! This crate provides the vendor records that flow through the
//! synchronisation pipelines: Aircall calls and their AI artifacts on the
//! way in, Monday.com board items and columns on the way out.
//!
//! These types are deliberately lenient when deserializing. Vendors omit
//! fields or send `null` freely, and a missing field must never abort a run.

pub mod artifact;
pub mod board;
pub mod call;
pub mod ids;

// Re-export main types
pub use artifact::{
    ActionItem, ActionItems, ArtifactKind, CallArtifacts, Sentiment, SentimentParticipant,
    Summary, Topic, Transcription, TranscriptionContent, Utterance,
};
pub use board::{BoardColumn, BoardItem, ColumnValue, ColumnValues, ItemsPage};
pub use call::{Call, CallDirection, CallStatus, Contact, Team, User};
pub use ids::RunId;

/// Prefix of the synthetic de-duplication key stored on every call item.
pub const CALL_KEY_PREFIX: &str = "aircall_";

/// Builds the synthetic board key for a call id (`aircall_<id>`).
pub fn call_key(call_id: u64) -> String {
    format!("{}{}", CALL_KEY_PREFIX, call_id)
}

/// Extracts the call id from a synthetic key, if the text is one.
pub fn parse_call_key(text: &str) -> Option<&str> {
    text.strip_prefix(CALL_KEY_PREFIX).filter(|id| !id.is_empty())
}
