//! Aircall calls to call board items.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use callboard_core::format::{call_column_values, item_name};
use callboard_core::{ArtifactTexts, CallField, SyncProfile};
use callboard_models::{call_key, ArtifactKind, Call, CallArtifacts, ColumnValues};

use crate::automation::Automation;
use crate::error::Result;
use crate::pipeline::Pipelines;
use crate::report::RunReport;

/// Encodes a column map as the JSON object Monday expects.
pub(crate) fn to_json(values: ColumnValues) -> Value {
    Value::Object(
        values
            .into_iter()
            .map(|(id, text)| (id, Value::String(text)))
            .collect(),
    )
}

impl Pipelines {
    /// Imports recent calls the call board does not have yet.
    pub(crate) async fn sync(&self, profile: &SyncProfile) -> Result<RunReport> {
        let now = self.now();
        let mut report = RunReport::start(Automation::Sync, now);
        report.profile = Some(profile.name.clone());

        self.source.ping(profile.per_call_timeout).await?;

        let since = chrono::Duration::from_std(profile.hours_back)
            .ok()
            .map(|back| now - back);
        let calls = match self
            .source
            .recent_calls(since, profile.fetch_limit, profile.per_call_timeout)
            .await
        {
            Ok(calls) => calls,
            Err(e) => {
                warn!(error = %e, "Could not fetch calls, nothing to import");
                Vec::new()
            }
        };

        let boards = &self.config.boards;
        let columns = &self.config.columns.call;
        let known = self
            .store
            .known_call_keys(&boards.calls, columns.id(CallField::AircallId))
            .await?;
        info!(
            fetched = calls.len(),
            known = known.len(),
            max_items = profile.max_items,
            "Loaded calls and existing keys"
        );

        for call in calls.iter().take(profile.max_items) {
            report.processed += 1;
            let key = call_key(call.id);
            if known.contains(&key) {
                debug!(call_id = call.id, "Call already on the board");
                report.skipped += 1;
                continue;
            }

            let artifacts = self.fetch_artifacts(call, profile).await;
            let texts = ArtifactTexts::render(&artifacts);
            let values = call_column_values(call, &texts, columns, now.date_naive());
            let name = item_name(call);

            match self
                .store
                .create_item(&boards.calls, &name, &to_json(values))
                .await
            {
                Ok(item_id) => {
                    info!(call_id = call.id, item_id = %item_id, ai = artifacts.available(), "Created call item");
                    report.created += 1;
                }
                Err(e) => {
                    error!(call_id = call.id, error = %e, "Failed to create call item");
                    report.failed += 1;
                }
            }

            self.pause(profile).await;
        }

        Ok(report.finish(self.now()))
    }

    /// The five artifacts of a call; any failure leaves the slot empty.
    pub(crate) async fn fetch_artifacts(&self, call: &Call, profile: &SyncProfile) -> CallArtifacts {
        let mut artifacts = CallArtifacts::default();
        for kind in ArtifactKind::ALL {
            match self
                .source
                .artifact(call.id, kind, profile.per_call_timeout)
                .await
            {
                Ok(Some(payload)) => {
                    if !artifacts.insert(kind, payload) {
                        warn!(call_id = call.id, kind = %kind, "Unreadable artifact payload");
                    }
                }
                Ok(None) => debug!(call_id = call.id, kind = %kind, "No artifact"),
                Err(e) => warn!(call_id = call.id, kind = %kind, error = %e, "Artifact fetch failed"),
            }
        }
        artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, FakeSource, FakeStore};
    use callboard_aircall::AircallError;
    use serde_json::json;

    #[tokio::test]
    async fn test_new_call_creates_one_item() {
        let source = FakeSource::new(vec![Call::new(7).with_raw_digits("+33612345678")]);
        let store = FakeStore::new();
        let pipelines = fixture(source, store.clone());

        let report = pipelines.sync(&crate::testing::profile()).await.unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 0);

        let created = store.created();
        assert_eq!(created.len(), 1);
        let (board, name, values) = &created[0];
        assert_eq!(board, "2119815514");
        assert_eq!(name, "Appel #7 - 06 12 34 56 78");
        assert_eq!(values["text_mkv8ydgs"], "aircall_7");
        assert_eq!(values["text_mkv8hgj8"], "06 12 34 56 78");
    }

    #[tokio::test]
    async fn test_known_call_is_not_duplicated() {
        let source = FakeSource::new(vec![Call::new(7).with_raw_digits("+33612345678")]);
        let store = FakeStore::new().with_items(
            "2119815514",
            vec![callboard_models::BoardItem::new("1", "Appel #7").with_text("text_mkv8ydgs", "aircall_7")],
        );
        let pipelines = fixture(source, store.clone());

        let report = pipelines.sync(&crate::testing::profile()).await.unwrap();
        assert_eq!(report.created, 0);
        assert_eq!(report.skipped, 1);
        assert!(store.created().is_empty());
    }

    #[tokio::test]
    async fn test_missing_transcription_reads_not_available() {
        let source = FakeSource::new(vec![Call::new(8).with_raw_digits("0612345678")])
            .with_artifact(8, ArtifactKind::Summary, json!({"id": 1, "content": "Rappeler demain"}));
        let store = FakeStore::new();
        let pipelines = fixture(source, store.clone());

        pipelines.sync(&crate::testing::profile()).await.unwrap();

        let created = store.created();
        let values = &created[0].2;
        assert_eq!(values["long_text_mkv83f14"], "Non disponible");
        assert_eq!(values["long_text_mkv8ctta"], "Rappeler demain");
        assert!(values["long_text_mkv883fq"]
            .as_str()
            .unwrap()
            .contains("✅ Résumé IA disponible"));
    }

    #[tokio::test]
    async fn test_max_items_bounds_processed_calls() {
        let calls = (1..=5).map(|id| Call::new(id).with_raw_digits("0612345678")).collect();
        let store = FakeStore::new();
        let pipelines = fixture(FakeSource::new(calls), store.clone());

        let profile = crate::testing::profile().with_max_items(2);
        let report = pipelines.sync(&profile).await.unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(store.created().len(), 2);
    }

    #[tokio::test]
    async fn test_ping_failure_aborts() {
        let source = FakeSource::new(vec![Call::new(1)]).failing_ping();
        let store = FakeStore::new();
        let pipelines = fixture(source, store.clone());

        let err = pipelines.sync(&crate::testing::profile()).await.unwrap_err();
        assert!(matches!(
            err,
            crate::SyncError::Aircall(AircallError::Status { status: 401, .. })
        ));
        assert!(store.created().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_is_counted() {
        let source = FakeSource::new(vec![Call::new(1), Call::new(2)]);
        let store = FakeStore::new().failing_creates();
        let pipelines = fixture(source, store);

        let report = pipelines.sync(&crate::testing::profile()).await.unwrap();
        assert_eq!(report.failed, 2);
        assert_eq!(report.created, 0);
    }
}
