//! Task owners from the responsible agent named in the description.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, error, info};

use callboard_core::SyncProfile;

use crate::automation::Automation;
use crate::error::Result;
use crate::pipeline::Pipelines;
use crate::report::RunReport;
use crate::tasks::GENERATED_MARKER;

/// Agent name from the `Agent responsable:` line of a task description.
pub fn responsible_agent(description: &str) -> Option<&str> {
    static AGENT_LINE: OnceLock<Regex> = OnceLock::new();
    let re = AGENT_LINE.get_or_init(|| {
        Regex::new(r"Agent responsable:[ \t]*([^\r\n]*)").expect("Invalid regex pattern")
    });
    re.captures(description)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
}

impl Pipelines {
    /// Assigns generated, unowned tasks to the agent their description names.
    pub(crate) async fn assign(&self, profile: &SyncProfile) -> Result<RunReport> {
        let mut report = RunReport::start(Automation::Assign, self.now());
        let board = &self.config.boards.tasks;
        let columns = &self.config.columns.task;

        let items = self.store.all_items(board).await?;
        info!(tasks = items.len(), "Loaded task board");

        for item in &items {
            let Some(description) = item
                .column_text(&columns.description)
                .filter(|d| d.contains(GENERATED_MARKER))
            else {
                continue;
            };
            if item.column_text(&columns.owner).is_some() {
                debug!(item_id = %item.id, "Task already assigned");
                continue;
            }
            report.processed += 1;

            let Some(agent) = responsible_agent(description).and_then(|n| self.config.agents.find(n))
            else {
                debug!(item_id = %item.id, "No known agent for task");
                report.skipped += 1;
                continue;
            };

            match self
                .store
                .change_column_value(board, &item.id, &columns.owner, &agent.owner_value())
                .await
            {
                Ok(()) => {
                    info!(item_id = %item.id, agent = %agent.name, kind = agent.kind.as_str(), "Assigned task");
                    report.updated += 1;
                }
                Err(e) => {
                    error!(item_id = %item.id, error = %e, "Failed to assign task");
                    report.failed += 1;
                }
            }

            self.pause(profile).await;
        }

        Ok(report.finish(self.now()))
    }
}
