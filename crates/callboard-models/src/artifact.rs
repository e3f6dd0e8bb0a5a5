//! Per-call AI artifacts returned by Aircall Conversation Intelligence.
//!
//! Each artifact is fetched independently and may be missing; a missing
//! artifact is represented as `None` in [`CallArtifacts`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The five artifact endpoints exposed under `/v1/calls/{id}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Transcription,
    Summary,
    Sentiments,
    Topics,
    ActionItems,
}

impl ArtifactKind {
    /// All kinds, in the order a sync run fetches them.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Transcription,
        ArtifactKind::Summary,
        ArtifactKind::Sentiments,
        ArtifactKind::Topics,
        ArtifactKind::ActionItems,
    ];

    /// Path segment appended to `/v1/calls/{id}/`.
    pub fn path(&self) -> &'static str {
        match self {
            ArtifactKind::Transcription => "transcription",
            ArtifactKind::Summary => "summary",
            ArtifactKind::Sentiments => "sentiments",
            ArtifactKind::Topics => "topics",
            ArtifactKind::ActionItems => "action_items",
        }
    }

    /// Key wrapping the payload in the response body.
    ///
    /// Action items are returned unwrapped.
    pub fn envelope_key(&self) -> Option<&'static str> {
        match self {
            ArtifactKind::Transcription => Some("transcription"),
            ArtifactKind::Summary => Some("summary"),
            ArtifactKind::Sentiments => Some("sentiment"),
            ArtifactKind::Topics => Some("topic"),
            ArtifactKind::ActionItems => None,
        }
    }

    /// Pulls the payload out of a response body.
    ///
    /// Returns `None` when the envelope key is missing or `null`.
    pub fn unwrap_body(&self, body: Value) -> Option<Value> {
        let payload = match self.envelope_key() {
            Some(key) => match body {
                Value::Object(mut map) => map.remove(key)?,
                _ => return None,
            },
            None => body,
        };
        (!payload.is_null()).then_some(payload)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One speaker turn in a transcription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    #[serde(default)]
    pub text: Option<String>,
    /// `internal` for the agent, `external` for the caller.
    #[serde(default)]
    pub participant_type: Option<String>,
    /// Offset from call start in seconds.
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionContent {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub utterances: Option<Vec<Utterance>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub content: Option<TranscriptionContent>,
}

impl Transcription {
    /// Utterances in spoken order; empty when none were returned.
    pub fn utterances(&self) -> &[Utterance] {
        self.content
            .as_ref()
            .and_then(|c| c.utterances.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Sentiment for one participant (`POSITIVE`, `NEGATIVE` or `NEUTRAL`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentParticipant {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub participants: Option<Vec<SentimentParticipant>>,
}

impl Sentiment {
    pub fn participants(&self) -> &[SentimentParticipant] {
        self.participants.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub content: Option<Vec<String>>,
}

impl Topic {
    pub fn topics(&self) -> &[String] {
        self.content.as_deref().unwrap_or_default()
    }
}

/// A follow-up extracted from the call, either by the AI or by the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub ai_generated: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionItems {
    #[serde(default)]
    pub action_items: Option<Vec<ActionItem>>,
}

impl ActionItems {
    pub fn items(&self) -> &[ActionItem] {
        self.action_items.as_deref().unwrap_or_default()
    }
}

/// Everything fetched for one call. Each field is `None` when unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArtifacts {
    pub transcription: Option<Transcription>,
    pub summary: Option<Summary>,
    pub sentiment: Option<Sentiment>,
    pub topics: Option<Topic>,
    pub action_items: Option<ActionItems>,
}

impl CallArtifacts {
    /// Stores a raw payload under the slot for `kind`.
    ///
    /// A payload that does not deserialize leaves the slot empty.
    pub fn insert(&mut self, kind: ArtifactKind, payload: Value) -> bool {
        match kind {
            ArtifactKind::Transcription => {
                self.transcription = serde_json::from_value(payload).ok();
                self.transcription.is_some()
            }
            ArtifactKind::Summary => {
                self.summary = serde_json::from_value(payload).ok();
                self.summary.is_some()
            }
            ArtifactKind::Sentiments => {
                self.sentiment = serde_json::from_value(payload).ok();
                self.sentiment.is_some()
            }
            ArtifactKind::Topics => {
                self.topics = serde_json::from_value(payload).ok();
                self.topics.is_some()
            }
            ArtifactKind::ActionItems => {
                self.action_items = serde_json::from_value(payload).ok();
                self.action_items.is_some()
            }
        }
    }

    /// Number of artifacts present.
    pub fn available(&self) -> usize {
        [
            self.transcription.is_some(),
            self.summary.is_some(),
            self.sentiment.is_some(),
            self.topics.is_some(),
            self.action_items.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}
