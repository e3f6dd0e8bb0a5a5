//! Rewrites existing call items from fresh Aircall data.
//!
//! AI artifacts are often computed after a call was imported, so the first
//! import stores `Non disponible`. A refresh re-reads every call already on
//! the board and overwrites its columns in one mutation per item.

use tracing::{debug, error, info, warn};

use callboard_core::format::call_column_values;
use callboard_core::{ArtifactTexts, CallField, SyncProfile};
use callboard_models::parse_call_key;

use crate::automation::Automation;
use crate::error::Result;
use crate::pipeline::Pipelines;
use crate::report::RunReport;
use crate::sync::to_json;

/// Columns set once at import and never rewritten.
const IMPORT_ONLY: [CallField; 2] = [CallField::AircallId, CallField::ImportDate];

impl Pipelines {
    /// Re-fetches every call item's call and artifacts and writes the
    /// rebuilt column values back.
    pub(crate) async fn refresh(&self, profile: &SyncProfile) -> Result<RunReport> {
        let now = self.now();
        let mut report = RunReport::start(Automation::Refresh, now);
        report.profile = Some(profile.name.clone());

        let board = &self.config.boards.calls;
        let columns = &self.config.columns.call;
        let key_column = columns.id(CallField::AircallId);

        let items = self.store.all_items(board).await?;
        info!(items = items.len(), "Refreshing call items");

        for item in items {
            let Some(call_id) = item
                .column_text(key_column)
                .and_then(parse_call_key)
                .and_then(|id| id.parse::<u64>().ok())
            else {
                debug!(item_id = %item.id, "Not a call item");
                continue;
            };
            report.processed += 1;

            let call = match self.source.call(call_id, profile.per_call_timeout).await {
                Ok(Some(call)) => call,
                Ok(None) => {
                    warn!(call_id, item_id = %item.id, "Call no longer known to Aircall");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!(call_id, item_id = %item.id, error = %e, "Failed to fetch call");
                    report.failed += 1;
                    continue;
                }
            };

            let artifacts = self.fetch_artifacts(&call, profile).await;
            let texts = ArtifactTexts::render(&artifacts);
            let mut values = call_column_values(&call, &texts, columns, now.date_naive());
            for field in IMPORT_ONLY {
                values.remove(columns.id(field));
            }

            match self
                .store
                .change_multiple_column_values(board, &item.id, &to_json(values))
                .await
            {
                Ok(()) => {
                    debug!(call_id, item_id = %item.id, ai = artifacts.available(), "Refreshed call item");
                    report.updated += 1;
                }
                Err(e) => {
                    error!(call_id, item_id = %item.id, error = %e, "Failed to refresh call item");
                    report.failed += 1;
                }
            }

            self.pause(profile).await;
        }

        Ok(report.finish(self.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, profile, FakeSource, FakeStore};
    use callboard_models::{ArtifactKind, BoardItem, Call};
    use serde_json::json;

    const CALLS: &str = "2119815514";

    fn call_item(id: &str, key: &str) -> BoardItem {
        BoardItem::new(id, "Appel").with_text("text_mkv8ydgs", key)
    }

    #[tokio::test]
    async fn test_refresh_backfills_artifacts() {
        let source = FakeSource::new(vec![Call::new(7).with_raw_digits("+33612345678")])
            .with_artifact(7, ArtifactKind::Summary, json!({"id": 1, "content": "Rappeler demain"}));
        let store = FakeStore::new().with_items(
            CALLS,
            vec![
                call_item("1", "aircall_7"),
                BoardItem::new("2", "Saisie manuelle"),
            ],
        );
        let pipelines = fixture(source, store.clone());

        let report = pipelines.refresh(&profile()).await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.updated, 1);

        let changes = store.changes();
        assert!(changes.iter().all(|c| c.board_id == CALLS && c.item_id == "1"));

        let value = |column: &str| {
            changes
                .iter()
                .find(|c| c.column_id == column)
                .map(|c| c.value.clone())
        };
        assert_eq!(value("long_text_mkv8ctta"), Some(json!("Rappeler demain")));
        assert_eq!(value("text_mkv8hgj8"), Some(json!("06 12 34 56 78")));
        assert_eq!(value("text_mkv8ydgs"), None);
    }

    #[tokio::test]
    async fn test_refresh_skips_unknown_calls() {
        let store = FakeStore::new().with_items(CALLS, vec![call_item("1", "aircall_404")]);
        let pipelines = fixture(FakeSource::new(vec![]), store.clone());

        let report = pipelines.refresh(&profile()).await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 1);
        assert!(store.changes().is_empty());
    }
}
