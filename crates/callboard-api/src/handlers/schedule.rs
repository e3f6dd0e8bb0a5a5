//! Schedule handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use callboard_sync::{run_due, Automation, SchedulePatch, SyncError};

use crate::error::Result;
use crate::handlers::automation::{resolve_profile, trigger};
use crate::state::AppState;
use crate::types::{
    AutomationQuery, RunResponse, ScheduleCheckResponse, ScheduleStatusResponse,
    ScheduleUpdateResponse,
};

/// GET /api/schedule/status - Schedule table evaluated at local now.
pub async fn schedule_status(State(state): State<AppState>) -> Json<ScheduleStatusResponse> {
    let now = state.local_now();
    let schedules = state.schedule.read().await.status(now);
    Json(ScheduleStatusResponse {
        success: true,
        timestamp: Utc::now(),
        current_time: now,
        schedules,
    })
}

/// GET /api/schedule/check - Run every automation due now.
pub async fn schedule_check(State(state): State<AppState>) -> Json<ScheduleCheckResponse> {
    let now = state.local_now();
    let profile = state.default_profile();
    let executed = run_due(&state.pipelines, &state.schedule, &profile, now).await;
    for outcome in &executed {
        state.record_outcome(outcome).await;
    }

    info!(count = executed.len(), "Schedule check done");
    Json(ScheduleCheckResponse {
        success: executed.iter().all(|o| o.success),
        message: format!("{} automatisation(s) exécutée(s)", executed.len()),
        timestamp: Utc::now(),
        checked_at: now,
        executed,
    })
}

/// POST /api/schedule/trigger/:name - Run an automation regardless of the schedule.
pub async fn schedule_trigger(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<AutomationQuery>,
) -> Result<Json<RunResponse>> {
    let automation: Automation = name.parse()?;
    let profile = resolve_profile(&state, &query)?;
    info!(automation = %automation, "Manual trigger");
    Ok(Json(trigger(&state, automation, &profile).await))
}

/// POST /api/schedule/update/:name - Change an automation's schedule entry.
pub async fn schedule_update(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: std::result::Result<Json<SchedulePatch>, JsonRejection>,
) -> Result<Json<ScheduleUpdateResponse>> {
    let automation: Automation = name.parse()?;
    let Json(patch) = payload?;
    let now = state.local_now();

    let mut schedule = state.schedule.write().await;
    schedule.update(automation, patch)?;
    let entry = schedule
        .status(now)
        .into_iter()
        .find(|s| s.automation == automation)
        .ok_or_else(|| SyncError::UnknownAutomation(automation.to_string()))?;

    info!(automation = %automation, enabled = entry.entry.enabled, "Schedule updated");
    Ok(Json(ScheduleUpdateResponse {
        success: true,
        message: format!("Planning de {} mis à jour", automation),
        timestamp: Utc::now(),
        schedule: entry,
    }))
}
