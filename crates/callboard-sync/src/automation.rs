//! Named automations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;

/// One runnable automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Automation {
    /// Aircall calls to call board items.
    Sync,
    /// Call items to seller/buyer contacts, as text.
    Link,
    /// AI action items to tasks.
    Tasks,
    /// Task owners from the responsible agent.
    Assign,
    /// Call items to contacts, as board relations.
    Relations,
    /// Existing call items rewritten from fresh call data.
    Refresh,
    /// Every automation above, in order.
    Full,
}

impl Automation {
    pub const ALL: [Automation; 7] = [
        Automation::Sync,
        Automation::Link,
        Automation::Tasks,
        Automation::Assign,
        Automation::Relations,
        Automation::Refresh,
        Automation::Full,
    ];

    /// Steps of a full run, in execution order.
    pub const FULL_SEQUENCE: [Automation; 5] = [
        Automation::Sync,
        Automation::Link,
        Automation::Tasks,
        Automation::Assign,
        Automation::Relations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Automation::Sync => "sync",
            Automation::Link => "link",
            Automation::Tasks => "tasks",
            Automation::Assign => "assign",
            Automation::Relations => "relations",
            Automation::Refresh => "refresh",
            Automation::Full => "full",
        }
    }

    /// Human description, used in response messages.
    pub fn description(&self) -> &'static str {
        match self {
            Automation::Sync => "Synchronisation Aircall",
            Automation::Link => "Liaison des contacts",
            Automation::Tasks => "Création de tâches",
            Automation::Assign => "Assignation des tâches",
            Automation::Relations => "Mise à jour des relations",
            Automation::Refresh => "Mise à jour des appels existants",
            Automation::Full => "Automatisation complète",
        }
    }
}

impl fmt::Display for Automation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Automation {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| SyncError::UnknownAutomation(s.to_string()))
    }
}
