//! Monitor handlers.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::monitor::MonitorStage;
use crate::state::AppState;
use crate::types::{LogsQuery, LogsResponse, MonitorResponse, StatsResponse};

/// An empty body is an empty object; anything else must be a JSON object.
fn parse_details(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(ApiError::BadRequest("expected a JSON object".into())),
        Err(e) => Err(ApiError::BadRequest(format!("invalid JSON body: {}", e))),
    }
}

/// POST /api/monitor/:stage/:name - Record a stage reported by an automation.
pub async fn record_stage(
    State(state): State<AppState>,
    Path((stage, name)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<MonitorResponse>> {
    let stage: MonitorStage = stage.parse()?;
    let details = parse_details(&body)?;
    let entry = state.monitor.write().await.log(stage, &name, details);

    Ok(Json(MonitorResponse {
        success: true,
        message: entry.message.clone(),
        timestamp: Utc::now(),
        entry,
    }))
}

/// GET /api/monitor/logs - Recent entries, newest first.
pub async fn monitor_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Json<LogsResponse> {
    let logs = state
        .monitor
        .read()
        .await
        .recent(query.automation.as_deref(), query.limit());
    Json(LogsResponse {
        success: true,
        timestamp: Utc::now(),
        total: logs.len(),
        logs,
    })
}

/// GET /api/monitor/stats - Counters per automation.
pub async fn monitor_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.monitor.read().await.stats().clone();
    Json(StatsResponse {
        success: true,
        timestamp: Utc::now(),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_details() {
        assert_eq!(parse_details(b"").unwrap(), Value::Object(Map::new()));
        assert_eq!(parse_details(b"{\"step\":\"fetch\"}").unwrap()["step"], "fetch");
        assert!(matches!(parse_details(b"[1]"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_details(b"{oops"), Err(ApiError::BadRequest(_))));
    }
}
