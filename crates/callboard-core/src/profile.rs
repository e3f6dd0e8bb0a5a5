//! Sync profiles: the knobs that bound one sync run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Limits applied to a single sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncProfile {
    /// Preset name, reported back in run results.
    pub name: String,
    /// Calls requested from Aircall.
    pub fetch_limit: u32,
    /// Calls turned into items at most.
    pub max_items: usize,
    /// Timeout applied to every vendor request.
    #[serde(with = "secs")]
    pub per_call_timeout: Duration,
    /// Only calls started within this window are fetched.
    #[serde(with = "secs")]
    pub hours_back: Duration,
    /// Pause between two created items.
    #[serde(with = "secs")]
    pub pause: Duration,
}

impl Default for SyncProfile {
    fn default() -> Self {
        Self::full()
    }
}

impl SyncProfile {
    pub const PRESETS: [&'static str; 4] = ["full", "optimized", "ultra", "batch"];

    /// Complete run: twenty calls over the last day.
    pub fn full() -> Self {
        Self {
            name: "full".to_string(),
            fetch_limit: 20,
            max_items: 20,
            per_call_timeout: Duration::from_secs(30),
            hours_back: Duration::from_secs(24 * 3600),
            pause: Duration::from_secs(1),
        }
    }

    /// Shorter run fitting a serverless time budget.
    pub fn optimized() -> Self {
        Self {
            name: "optimized".to_string(),
            fetch_limit: 10,
            max_items: 3,
            per_call_timeout: Duration::from_secs(20),
            pause: Duration::ZERO,
            ..Self::full()
        }
    }

    /// Single-item run.
    pub fn ultra() -> Self {
        Self {
            name: "ultra".to_string(),
            fetch_limit: 3,
            max_items: 1,
            per_call_timeout: Duration::from_secs(10),
            pause: Duration::ZERO,
            ..Self::full()
        }
    }

    /// Small batch with short timeouts.
    pub fn batch() -> Self {
        Self {
            name: "batch".to_string(),
            fetch_limit: 3,
            max_items: 3,
            per_call_timeout: Duration::from_secs(8),
            pause: Duration::ZERO,
            ..Self::full()
        }
    }

    /// Sets the number of items created at most.
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = max;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.per_call_timeout = timeout;
        self
    }

    /// Sets the pause between items.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }
}

impl FromStr for SyncProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" | "" => Ok(Self::full()),
            "optimized" => Ok(Self::optimized()),
            "ultra" | "ultra_optimized" => Ok(Self::ultra()),
            "batch" => Ok(Self::batch()),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

impl fmt::Display for SyncProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
