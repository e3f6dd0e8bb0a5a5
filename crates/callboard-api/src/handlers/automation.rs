//! Automation trigger handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use callboard_core::SyncProfile;
use callboard_sync::Automation;

use crate::error::Result;
use crate::state::AppState;
use crate::types::{AutomationInfo, AutomationQuery, AutomationStatusResponse, RunResponse};

/// Profile named in the query, or the process profile.
pub(crate) fn resolve_profile(state: &AppState, query: &AutomationQuery) -> Result<SyncProfile> {
    match query.profile.as_deref() {
        Some(name) => Ok(name.parse::<SyncProfile>()?),
        None => Ok(state.default_profile()),
    }
}

/// Runs an automation and wraps the outcome in the response envelope.
pub(crate) async fn trigger(
    state: &AppState,
    automation: Automation,
    profile: &SyncProfile,
) -> RunResponse {
    match state.run(automation, profile).await {
        Ok(report) => RunResponse {
            success: report.steps.iter().all(|step| step.success),
            message: report.summary(),
            timestamp: Utc::now(),
            report: Some(report),
            error: None,
        },
        Err(e) => RunResponse {
            success: false,
            message: format!("{} échouée", automation.description()),
            timestamp: Utc::now(),
            report: None,
            error: Some(e.to_string()),
        },
    }
}

/// POST /api/automation/:name - Run an automation now.
pub async fn run_automation(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<AutomationQuery>,
) -> Result<Json<RunResponse>> {
    let automation: Automation = name.parse()?;
    let profile = resolve_profile(&state, &query)?;
    Ok(Json(trigger(&state, automation, &profile).await))
}

/// GET /api/automation/status - List automations with their last outcome.
pub async fn automation_status(State(state): State<AppState>) -> Json<AutomationStatusResponse> {
    let monitor = state.monitor.read().await;
    let automations = Automation::ALL
        .iter()
        .map(|automation| {
            let stats = monitor.stats().get(automation.as_str());
            AutomationInfo {
                name: automation.as_str().to_string(),
                description: automation.description().to_string(),
                endpoint: format!("/api/automation/{}", automation),
                last_status: stats.and_then(|s| s.last_status).map(str::to_string),
                last_run: stats.and_then(|s| s.last_update),
            }
        })
        .collect();

    Json(AutomationStatusResponse {
        success: true,
        timestamp: Utc::now(),
        automations,
    })
}
