//! Process configuration.
//!
//! A [`Config`] is built once at startup, from the environment or an env
//! file, and handed to every client and pipeline. Nothing below this module
//! reads the environment.
//!
//! # Environment Variables
//!
//! - `AIRCALL_API_ID`, `AIRCALL_API_TOKEN`: Aircall basic auth pair (required)
//! - `AIRCALL_API_URL`: Aircall base URL (default `https://api.aircall.io/v1`)
//! - `MONDAY_API_TOKEN`: Monday.com API token (required)
//! - `MONDAY_API_URL`: Monday.com endpoint (default `https://api.monday.com/v2`)
//! - `AIRCALL_BOARD_ID`, `TASKS_BOARD_ID`, `SELLERS_BOARD_ID`, `BUYERS_BOARD_ID`
//! - `COLUMN_<TITLE>`: override one call board column id, e.g. `COLUMN_ID_AIRCALL`
//! - `CALLBOARD_AGENTS`: agent directory, `Name=id;Other Name=id:team`
//! - `CALLBOARD_HOST`, `CALLBOARD_PORT`: HTTP listener
//! - `CALLBOARD_SCHEDULER_INTERVAL`: seconds between schedule checks
//! - `CALLBOARD_PROFILE`: default sync profile

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::columns::{CallField, ColumnIds};
use crate::error::{ConfigError, Result};
use crate::profile::SyncProfile;

pub const AIRCALL_API_ID_ENV: &str = "AIRCALL_API_ID";
pub const AIRCALL_API_TOKEN_ENV: &str = "AIRCALL_API_TOKEN";
pub const MONDAY_API_TOKEN_ENV: &str = "MONDAY_API_TOKEN";

const DEFAULT_AIRCALL_URL: &str = "https://api.aircall.io/v1";
const DEFAULT_MONDAY_URL: &str = "https://api.monday.com/v2";
const DEFAULT_MONDAY_VERSION: &str = "2023-10";

/// Aircall credentials and endpoint.
#[derive(Clone, PartialEq)]
pub struct AircallConfig {
    pub api_id: String,
    pub api_token: String,
    pub base_url: String,
}

impl Default for AircallConfig {
    fn default() -> Self {
        Self {
            api_id: String::new(),
            api_token: String::new(),
            base_url: DEFAULT_AIRCALL_URL.to_string(),
        }
    }
}

impl fmt::Debug for AircallConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AircallConfig")
            .field("api_id", &self.api_id)
            .field("api_token", &redact(&self.api_token))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Monday.com credentials and endpoint.
#[derive(Clone, PartialEq)]
pub struct MondayConfig {
    pub api_token: String,
    pub api_url: String,
    pub api_version: String,
}

impl Default for MondayConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            api_url: DEFAULT_MONDAY_URL.to_string(),
            api_version: DEFAULT_MONDAY_VERSION.to_string(),
        }
    }
}

impl fmt::Debug for MondayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MondayConfig")
            .field("api_token", &redact(&self.api_token))
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Board ids used by the pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardIds {
    /// Board receiving one item per call.
    pub calls: String,
    /// To-do board receiving generated tasks.
    pub tasks: String,
    /// Seller contacts ("PROPRIETAIRE").
    pub sellers: String,
    /// Buyer contacts ("PROSPECT").
    pub buyers: String,
}

impl Default for BoardIds {
    fn default() -> Self {
        Self {
            calls: "2119815514".to_string(),
            tasks: "2079297289".to_string(),
            sellers: "1960934403".to_string(),
            buyers: "1960967970".to_string(),
        }
    }
}

/// Kind of owner written into a people column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    Person,
    Team,
}

impl OwnerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::Person => "person",
            OwnerKind::Team => "team",
        }
    }
}

/// A Monday.com user or team tasks can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Name as it appears in Aircall and in task descriptions.
    pub key: String,
    /// Canonical display name.
    pub name: String,
    /// Monday.com user or team id.
    pub id: u64,
    pub kind: OwnerKind,
}

impl Agent {
    pub fn person(key: impl Into<String>, name: impl Into<String>, id: u64) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            id,
            kind: OwnerKind::Person,
        }
    }

    pub fn team(key: impl Into<String>, id: u64) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            id,
            kind: OwnerKind::Team,
        }
    }

    /// `personsAndTeams` value for a people column.
    pub fn owner_value(&self) -> serde_json::Value {
        serde_json::json!({
            "personsAndTeams": [{ "id": self.id, "kind": self.kind.as_str() }]
        })
    }
}

/// Ordered agent lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDirectory {
    agents: Vec<Agent>,
    default_agent: Agent,
}

impl Default for AgentDirectory {
    fn default() -> Self {
        let maxence = Agent::person("Maxence DAVIOT", "Maxence DAVIOT", 75824915);
        Self {
            agents: vec![
                Agent::person("Maxence Daviot", "Maxence DAVIOT", 75824915),
                maxence.clone(),
                Agent::person("Audrey BENOIT", "Audrey BENOIT", 75833289),
                Agent::person("Timothy Robin", "Timothy Robin", 75833324),
                Agent::team("Assistante", 13160608),
            ],
            default_agent: maxence,
        }
    }
}

impl AgentDirectory {
    /// Creates a directory; the first agent doubles as the default.
    pub fn new(agents: Vec<Agent>) -> Option<Self> {
        let default_agent = agents.first()?.clone();
        Some(Self {
            agents,
            default_agent,
        })
    }

    /// Parses `Name=id;Team Name=id:team`.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || ConfigError::Invalid {
            var: "CALLBOARD_AGENTS".to_string(),
            value: spec.to_string(),
        };

        let mut agents = Vec::new();
        for entry in spec.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, rest) = entry.split_once('=').ok_or_else(invalid)?;
            let (id, kind) = match rest.split_once(':') {
                Some((id, "team")) => (id, OwnerKind::Team),
                Some((id, "person")) => (id, OwnerKind::Person),
                Some(_) => return Err(invalid()),
                None => (rest, OwnerKind::Person),
            };
            let id: u64 = id.trim().parse().map_err(|_| invalid())?;
            let key = key.trim().to_string();
            agents.push(Agent {
                name: key.clone(),
                key,
                id,
                kind,
            });
        }
        Self::new(agents).ok_or_else(invalid)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn default_agent(&self) -> &Agent {
        &self.default_agent
    }

    /// Exact-name lookup, falling back to the default agent.
    pub fn lookup_or_default(&self, name: Option<&str>) -> &Agent {
        name.and_then(|n| self.agents.iter().find(|a| a.key == n.trim()))
            .unwrap_or(&self.default_agent)
    }

    /// First agent whose key contains `name` or is contained in it,
    /// ignoring case.
    pub fn find(&self, name: &str) -> Option<&Agent> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.agents.iter().find(|a| {
            let key = a.key.to_lowercase();
            key.contains(&needle) || needle.contains(&key)
        })
    }
}

/// HTTP listener and scheduler settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Interval between two schedule checks in `serve --scheduler`.
    pub scheduler_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            scheduler_interval: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete Callboard configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub aircall: AircallConfig,
    pub monday: MondayConfig,
    pub boards: BoardIds,
    pub columns: ColumnIds,
    pub agents: AgentDirectory,
    pub server: ServerConfig,
    /// Profile used when a caller does not name one.
    pub profile: SyncProfile,
}

impl Config {
    /// Creates a config with default ids and no credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads an env file, falling back to the process environment for
    /// variables the file does not set.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        tracing::debug!(path = %path.as_ref().display(), vars = vars.len(), "Loaded env file");
        Self::from_lookup(|key| vars.get(key).cloned().or_else(|| std::env::var(key).ok()))
    }

    /// Builds a config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(v) = get(AIRCALL_API_ID_ENV) {
            config.aircall.api_id = v;
        }
        if let Some(v) = get(AIRCALL_API_TOKEN_ENV) {
            config.aircall.api_token = v;
        }
        if let Some(v) = get("AIRCALL_API_URL") {
            config.aircall.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get(MONDAY_API_TOKEN_ENV) {
            config.monday.api_token = v;
        }
        if let Some(v) = get("MONDAY_API_URL") {
            config.monday.api_url = v;
        }

        if let Some(v) = get("AIRCALL_BOARD_ID") {
            config.boards.calls = v;
        }
        if let Some(v) = get("TASKS_BOARD_ID") {
            config.boards.tasks = v;
        }
        if let Some(v) = get("SELLERS_BOARD_ID") {
            config.boards.sellers = v;
        }
        if let Some(v) = get("BUYERS_BOARD_ID") {
            config.boards.buyers = v;
        }

        for field in CallField::ALL {
            if let Some(id) = get(&field.env_var()) {
                config.columns.call = config.columns.call.with_id(field, id);
            }
        }
        if let Some(v) = get("CONTACT_LINK_COLUMN") {
            config.columns.contact_link = v;
        }
        if let Some(v) = get("CLIENT_RELATION_COLUMN") {
            config.columns.client_relation = v;
        }

        if let Some(v) = get("CALLBOARD_AGENTS") {
            config.agents = AgentDirectory::parse(&v)?;
        }

        if let Some(v) = get("CALLBOARD_HOST") {
            config.server.host = v;
        }
        if let Some(v) = get("CALLBOARD_PORT") {
            config.server.port = parse_var("CALLBOARD_PORT", &v)?;
        }
        if let Some(v) = get("CALLBOARD_SCHEDULER_INTERVAL") {
            let secs: u64 = parse_var("CALLBOARD_SCHEDULER_INTERVAL", &v)?;
            config.server.scheduler_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(v) = get("CALLBOARD_PROFILE") {
            config.profile = v.parse()?;
        }

        Ok(config)
    }

    /// Checks that every credential is present.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            (AIRCALL_API_ID_ENV, &self.aircall.api_id),
            (AIRCALL_API_TOKEN_ENV, &self.aircall.api_token),
            (MONDAY_API_TOKEN_ENV, &self.monday.api_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing.join(", ")))
        }
    }

    /// Sets the Aircall credentials.
    pub fn with_aircall_credentials(
        mut self,
        api_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        self.aircall.api_id = api_id.into();
        self.aircall.api_token = api_token.into();
        self
    }

    /// Sets the Aircall base URL.
    pub fn with_aircall_url(mut self, url: impl Into<String>) -> Self {
        self.aircall.base_url = url.into();
        self
    }

    /// Sets the Monday.com token.
    pub fn with_monday_token(mut self, token: impl Into<String>) -> Self {
        self.monday.api_token = token.into();
        self
    }

    /// Sets the Monday.com endpoint.
    pub fn with_monday_url(mut self, url: impl Into<String>) -> Self {
        self.monday.api_url = url.into();
        self
    }

    /// Sets the board ids.
    pub fn with_boards(mut self, boards: BoardIds) -> Self {
        self.boards = boards;
        self
    }

    /// Sets the default sync profile.
    pub fn with_profile(mut self, profile: SyncProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the HTTP port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }
}

fn parse_var<T: std::str::FromStr>(var: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| ConfigError::Invalid {
        var: var.to_string(),
        value: value.to_string(),
    })
}
