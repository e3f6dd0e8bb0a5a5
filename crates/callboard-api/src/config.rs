//! API configuration.

use std::time::Instant;

use callboard_core::ServerConfig;

/// Monitor entries kept in memory when not configured.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Monitor log entries kept before the oldest are dropped.
    pub log_capacity: usize,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl ApiConfig {
    /// Creates a new API configuration with the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            log_capacity: DEFAULT_LOG_CAPACITY,
            start_time: Instant::now(),
        }
    }

    /// Takes host and port from the server section of the process config.
    pub fn from_server(server: &ServerConfig) -> Self {
        Self::new(server.host.clone(), server.port)
    }

    /// Sets the monitor log capacity.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity.max(1);
        self
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_server(&ServerConfig::default())
    }
}
