//! Aircall REST API client.
//!
//! Supports the endpoints Callboard reads:
//! - `GET /ping` to verify credentials
//! - `GET /calls` for the most recent calls
//! - `GET /calls/{id}` for one call
//! - `GET /calls/{id}/{artifact}` for Conversation Intelligence payloads

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use callboard_core::AircallConfig;
use callboard_models::{ArtifactKind, Call};

use crate::error::{AircallError, Result};
use crate::source::CallSource;

/// Body of `GET /calls`.
#[derive(Debug, Deserialize)]
struct CallsPage {
    #[serde(default)]
    calls: Vec<Call>,
}

/// Body of `GET /calls/{id}`.
#[derive(Debug, Deserialize)]
struct CallEnvelope {
    call: Option<Call>,
}

/// Aircall API client using basic auth.
#[derive(Clone)]
pub struct AircallClient {
    client: reqwest::Client,
    base_url: Url,
    api_id: String,
    api_token: String,
}

impl AircallClient {
    /// Creates a client from the Aircall section of the config.
    pub fn new(config: &AircallConfig) -> Result<Self> {
        if config.api_id.is_empty() || config.api_token.is_empty() {
            return Err(AircallError::Configuration(
                "Aircall API id and token are required".to_string(),
            ));
        }

        // Trailing slash so that `join` appends instead of replacing `v1`.
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| AircallError::Configuration(format!("invalid base URL {}: {}", base, e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_id: config.api_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AircallError::Configuration(format!("invalid path {}: {}", path, e)))
    }

    async fn get(
        &self,
        url: Url,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<reqwest::Response> {
        trace!(url = %url, "Aircall GET");
        let response = self
            .client
            .get(url)
            .basic_auth(&self.api_id, Some(&self.api_token))
            .query(query)
            .timeout(timeout)
            .send()
            .await?;
        Ok(response)
    }

    async fn error_for(response: reqwest::Response) -> AircallError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        AircallError::Status { status, body }
    }
}

#[async_trait]
impl CallSource for AircallClient {
    async fn ping(&self, timeout: Duration) -> Result<()> {
        let response = self.get(self.endpoint("ping")?, &[], timeout).await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        debug!("Aircall ping succeeded");
        Ok(())
    }

    async fn recent_calls(
        &self,
        since: Option<DateTime<Utc>>,
        limit: u32,
        timeout: Duration,
    ) -> Result<Vec<Call>> {
        let mut query = vec![
            ("per_page", limit.to_string()),
            ("order", "desc".to_string()),
        ];
        if let Some(since) = since {
            query.push(("from", since.timestamp().to_string()));
        }

        let response = self.get(self.endpoint("calls")?, &query, timeout).await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let page: CallsPage = response
            .json()
            .await
            .map_err(|e| AircallError::Parse(format!("calls page: {}", e)))?;

        debug!(count = page.calls.len(), "Fetched Aircall calls");
        Ok(page.calls)
    }

    async fn call(&self, call_id: u64, timeout: Duration) -> Result<Option<Call>> {
        let url = self.endpoint(&format!("calls/{}", call_id))?;
        let response = self.get(url, &[], timeout).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(call_id, "Call not found");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let envelope: CallEnvelope = response
            .json()
            .await
            .map_err(|e| AircallError::Parse(format!("call {}: {}", call_id, e)))?;
        Ok(envelope.call)
    }

    async fn artifact(
        &self,
        call_id: u64,
        kind: ArtifactKind,
        timeout: Duration,
    ) -> Result<Option<Value>> {
        let url = self.endpoint(&format!("calls/{}/{}", call_id, kind.path()))?;
        let response = self.get(url, &[], timeout).await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(call_id, artifact = %kind, "Artifact not available");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::error_for(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AircallError::Parse(format!("{} payload: {}", kind, e)))?;
        Ok(kind.unwrap_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AircallConfig {
        AircallConfig {
            api_id: "id".to_string(),
            api_token: "token".to_string(),
            base_url: "https://api.aircall.io/v1".to_string(),
        }
    }

    #[test]
    fn test_requires_credentials() {
        let config = AircallConfig::default();
        assert!(matches!(
            AircallClient::new(&config),
            Err(AircallError::Configuration(_))
        ));
    }

    #[test]
    fn test_endpoint_keeps_version_prefix() {
        let client = AircallClient::new(&config()).unwrap();
        assert_eq!(
            client.endpoint("calls/12/summary").unwrap().as_str(),
            "https://api.aircall.io/v1/calls/12/summary"
        );

        let mut trailing = config();
        trailing.base_url = "https://api.aircall.io/v1/".to_string();
        let client = AircallClient::new(&trailing).unwrap();
        assert_eq!(
            client.endpoint("ping").unwrap().as_str(),
            "https://api.aircall.io/v1/ping"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let mut bad = config();
        bad.base_url = "not a url".to_string();
        assert!(AircallClient::new(&bad).is_err());
    }
}
