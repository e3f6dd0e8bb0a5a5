//! Aircall call records.
//!
//! A [`Call`] is produced by the vendor and is read-only to Callboard. Every
//! field except `id` is optional: the API returns `null` for anything that
//! does not apply to a given call (no recording, no team, still ringing...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Direction of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    /// Call received by the team.
    Inbound,
    /// Call placed by an agent.
    Outbound,
    /// Missing or unrecognised direction.
    #[default]
    Unknown,
}

impl CallDirection {
    /// Parses the vendor string, falling back to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "inbound" => CallDirection::Inbound,
            "outbound" => CallDirection::Outbound,
            _ => CallDirection::Unknown,
        }
    }
}

/// Lifecycle status of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// Call is ringing.
    Initial,
    /// Call was picked up.
    Answered,
    /// Call is over.
    Done,
    /// Missing or unrecognised status.
    #[default]
    Unknown,
}

impl CallStatus {
    /// Parses the vendor string, falling back to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "initial" => CallStatus::Initial,
            "answered" => CallStatus::Answered,
            "done" => CallStatus::Done,
            _ => CallStatus::Unknown,
        }
    }
}

/// Agent who handled the call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Team the call was routed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Contact known to Aircall for the remote party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl Contact {
    /// Returns "first last", or `None` when both parts are missing.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// A call as returned by `GET /v1/calls`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Vendor call id.
    pub id: u64,

    #[serde(default)]
    pub direction: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    /// Duration in seconds.
    #[serde(default)]
    pub duration: Option<u64>,

    /// Epoch seconds.
    #[serde(default)]
    pub started_at: Option<i64>,

    /// Epoch seconds; absent while the call is in progress.
    #[serde(default)]
    pub ended_at: Option<i64>,

    /// Remote number as dialled or presented.
    #[serde(default)]
    pub raw_digits: Option<String>,

    /// Cost, sent either as a number or a decimal string.
    #[serde(default)]
    pub cost: Option<Value>,

    #[serde(default)]
    pub currency: Option<String>,

    /// Voicemail URL (or flag) when the caller left a message.
    #[serde(default)]
    pub voicemail: Option<Value>,

    #[serde(default)]
    pub missed_call_reason: Option<String>,

    /// Recording URL.
    #[serde(default)]
    pub recording: Option<String>,

    /// Display name attached to the call.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub user: Option<User>,

    #[serde(default)]
    pub team: Option<Team>,

    #[serde(default)]
    pub contact: Option<Contact>,

    /// Tags, either plain strings or `{ "name": ... }` objects.
    #[serde(default)]
    pub tags: Option<Vec<Value>>,

    /// Comments, either plain strings or `{ "content": ... }` objects.
    #[serde(default)]
    pub comments: Option<Vec<Value>>,
}

impl Call {
    /// Creates a minimal call, mostly useful in tests.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Sets the raw remote number.
    pub fn with_raw_digits(mut self, digits: impl Into<String>) -> Self {
        self.raw_digits = Some(digits.into());
        self
    }

    /// Sets the direction string.
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Sets the status string.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Parsed direction.
    pub fn direction(&self) -> CallDirection {
        self.direction
            .as_deref()
            .map(CallDirection::parse)
            .unwrap_or_default()
    }

    /// Parsed status.
    pub fn status(&self) -> CallStatus {
        self.status.as_deref().map(CallStatus::parse).unwrap_or_default()
    }

    /// Start time, when known.
    pub fn started_at_utc(&self) -> Option<DateTime<Utc>> {
        epoch(self.started_at)
    }

    /// End time; `None` while the call is in progress.
    pub fn ended_at_utc(&self) -> Option<DateTime<Utc>> {
        epoch(self.ended_at)
    }

    /// Raw digits, or an empty string.
    pub fn raw_digits(&self) -> &str {
        self.raw_digits.as_deref().unwrap_or("")
    }

    /// Duration in seconds, zero when unknown.
    pub fn duration_secs(&self) -> u64 {
        self.duration.unwrap_or(0)
    }

    /// Whether a voicemail was left.
    pub fn has_voicemail(&self) -> bool {
        self.voicemail.as_ref().is_some_and(is_truthy)
    }

    /// Cost rendered as text.
    pub fn cost_text(&self) -> Option<String> {
        match self.cost.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Contact display name, preferring the Aircall contact record.
    pub fn contact_name(&self) -> Option<String> {
        self.contact
            .as_ref()
            .and_then(Contact::full_name)
            .or_else(|| self.name.clone())
    }

    /// Tag labels in vendor order.
    pub fn tag_labels(&self) -> Vec<String> {
        labels(self.tags.as_deref(), "name")
    }

    /// Comment bodies in vendor order.
    pub fn comment_texts(&self) -> Vec<String> {
        labels(self.comments.as_deref(), "content")
    }
}

fn labels(values: Option<&[Value]>, field: &str) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get(field).and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

fn epoch(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.filter(|s| *s > 0)
        .and_then(|s| DateTime::from_timestamp(s, 0))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
