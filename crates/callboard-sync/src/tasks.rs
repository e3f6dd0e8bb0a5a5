//! AI action items to tasks.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use callboard_core::format::ai_actions;
use callboard_core::{CallField, SyncProfile};
use callboard_models::{parse_call_key, BoardItem};

use crate::automation::Automation;
use crate::contacts::{id_value, ContactKind};
use crate::error::Result;
use crate::pipeline::Pipelines;
use crate::report::RunReport;

/// Marker opening every generated task description.
pub const GENERATED_MARKER: &str = "Tâche générée automatiquement";

const UNKNOWN_AGENT: &str = "Agent inconnu";

#[derive(Debug, Deserialize)]
struct RelationValue {
    #[serde(default, rename = "linkedPulseIds")]
    linked_pulse_ids: Vec<LinkedPulse>,
}

#[derive(Debug, Deserialize)]
struct LinkedPulse {
    #[serde(rename = "linkedPulseId")]
    linked_pulse_id: Value,
}

/// First linked item of a board-relation value.
fn first_linked_id(raw: &str) -> Option<String> {
    let relation: RelationValue = serde_json::from_str(raw).ok()?;
    match &relation.linked_pulse_ids.first()?.linked_pulse_id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A call item ready to be turned into tasks.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TaskSource {
    pub call_id: String,
    pub item_name: String,
    pub actions: Vec<String>,
    pub agent: String,
    pub client_id: String,
    pub client_kind: ContactKind,
}

/// Description stored in the task's text column.
pub fn task_description(call_id: &str, item_name: &str, action: &str, agent: &str) -> String {
    format!(
        "{} à partir de l'appel Aircall: Appel #{} - {}\n\nAction IA: {}\n\nAgent responsable: {}",
        GENERATED_MARKER, call_id, item_name, action, agent
    )
}

impl Pipelines {
    /// Creates one task per AI action on call items linked to a client.
    pub(crate) async fn tasks(&self, profile: &SyncProfile) -> Result<RunReport> {
        let now = self.now();
        let mut report = RunReport::start(Automation::Tasks, now);
        let boards = &self.config.boards;
        let task_columns = &self.config.columns.task;
        let today = now.date_naive().format("%Y-%m-%d").to_string();

        let items = self.store.all_items(&boards.calls).await?;
        let sources: Vec<TaskSource> = items.iter().filter_map(|i| self.task_source(i)).collect();
        info!(items = items.len(), with_actions = sources.len(), "Collected call items with AI actions");

        for source in &sources {
            let agent = self.config.agents.lookup_or_default(Some(&source.agent));
            let client_board = match source.client_kind {
                ContactKind::Seller => &boards.sellers,
                ContactKind::Buyer => &boards.buyers,
            };

            for action in &source.actions {
                report.processed += 1;

                let mut values = Map::new();
                values.insert(
                    task_columns.description.clone(),
                    Value::String(task_description(
                        &source.call_id,
                        &source.item_name,
                        action,
                        &source.agent,
                    )),
                );
                values.insert(task_columns.date.clone(), json!({ "date": today }));
                values.insert(task_columns.status.clone(), json!({ "index": 0 }));
                values.insert(task_columns.priority.clone(), json!({ "index": 1 }));
                values.insert(
                    task_columns.client.clone(),
                    json!({
                        "item_ids": [id_value(&source.client_id)],
                        "board_id": id_value(client_board),
                    }),
                );
                values.insert(task_columns.owner.clone(), agent.owner_value());

                match self
                    .store
                    .create_item(&boards.tasks, action, &Value::Object(values))
                    .await
                {
                    Ok(task_id) => {
                        info!(call_id = %source.call_id, task_id = %task_id, agent = %agent.name, "Created task");
                        report.created += 1;
                    }
                    Err(e) => {
                        error!(call_id = %source.call_id, error = %e, "Failed to create task");
                        report.failed += 1;
                    }
                }

                self.pause(profile).await;
            }
        }

        Ok(report.finish(self.now()))
    }

    /// Reads what a task needs from a call item, if it has all of it.
    pub(crate) fn task_source(&self, item: &BoardItem) -> Option<TaskSource> {
        let columns = &self.config.columns;

        let call_id = item
            .column_text(columns.call.id(CallField::AircallId))
            .and_then(parse_call_key)?;
        let actions = ai_actions(item.column_text(columns.call.id(CallField::Actions))?);
        if actions.is_empty() {
            return None;
        }

        let client_id = item.column_value(&columns.client_relation).and_then(first_linked_id);
        let client_kind = item
            .column_text(&columns.contact_link)
            .and_then(ContactKind::from_link);
        let (Some(client_id), Some(client_kind)) = (client_id, client_kind) else {
            debug!(item_id = %item.id, call_id, "AI actions found but no linked client");
            return None;
        };

        let agent = item
            .column_text(columns.call.id(CallField::Agent))
            .unwrap_or(UNKNOWN_AGENT)
            .to_string();

        Some(TaskSource {
            call_id: call_id.to_string(),
            item_name: item.name.clone(),
            actions,
            agent,
            client_id,
            client_kind,
        })
    }
}
