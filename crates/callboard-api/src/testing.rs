//! Stub collaborators for handler and router tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use callboard_aircall::CallSource;
use callboard_core::{Config, SyncProfile};
use callboard_models::{ArtifactKind, BoardColumn, Call, ItemsPage};
use callboard_monday::{BoardStore, MondayError};
use callboard_sync::Pipelines;

use crate::config::ApiConfig;
use crate::state::AppState;

/// Monday 2 June 2025 at the given local hour.
pub fn monday_at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 2)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Aircall with no calls.
pub struct EmptySource;

#[async_trait]
impl CallSource for EmptySource {
    async fn ping(&self, _timeout: Duration) -> callboard_aircall::Result<()> {
        Ok(())
    }

    async fn recent_calls(
        &self,
        _since: Option<DateTime<Utc>>,
        _limit: u32,
        _timeout: Duration,
    ) -> callboard_aircall::Result<Vec<Call>> {
        Ok(Vec::new())
    }

    async fn call(&self, _call_id: u64, _timeout: Duration) -> callboard_aircall::Result<Option<Call>> {
        Ok(None)
    }

    async fn artifact(
        &self,
        _call_id: u64,
        _kind: ArtifactKind,
        _timeout: Duration,
    ) -> callboard_aircall::Result<Option<Value>> {
        Ok(None)
    }
}

/// Boards with no items. Columns are only those given.
#[derive(Default)]
pub struct StubStore {
    columns: Vec<BoardColumn>,
}

impl StubStore {
    pub fn with_column(mut self, id: &str, title: &str, column_type: &str) -> Self {
        self.columns.push(BoardColumn {
            id: id.to_string(),
            title: title.to_string(),
            column_type: column_type.to_string(),
        });
        self
    }
}

#[async_trait]
impl BoardStore for StubStore {
    async fn board_columns(&self, _board_id: &str) -> callboard_monday::Result<Vec<BoardColumn>> {
        Ok(self.columns.clone())
    }

    async fn items_page(
        &self,
        _board_id: &str,
        _cursor: Option<&str>,
        _limit: u32,
    ) -> callboard_monday::Result<ItemsPage> {
        Ok(ItemsPage {
            cursor: None,
            items: Vec::new(),
        })
    }

    async fn create_item(
        &self,
        _board_id: &str,
        _item_name: &str,
        _column_values: &Value,
    ) -> callboard_monday::Result<String> {
        Ok("1".to_string())
    }

    async fn create_column(
        &self,
        _board_id: &str,
        _title: &str,
        column_type: &str,
    ) -> callboard_monday::Result<String> {
        Ok(format!("{}_created", column_type))
    }

    async fn change_column_value(
        &self,
        _board_id: &str,
        _item_id: &str,
        _column_id: &str,
        _value: &Value,
    ) -> callboard_monday::Result<()> {
        Ok(())
    }

    async fn change_multiple_column_values(
        &self,
        _board_id: &str,
        _item_id: &str,
        _column_values: &Value,
    ) -> callboard_monday::Result<()> {
        Ok(())
    }

    async fn create_board(&self, _name: &str, _kind: &str) -> callboard_monday::Result<String> {
        Err(MondayError::GraphQl("not supported".into()))
    }

    async fn create_group(&self, _board_id: &str, _name: &str) -> callboard_monday::Result<String> {
        Err(MondayError::GraphQl("not supported".into()))
    }
}

/// State over empty boards, with a zero-pause profile and the clock at
/// Monday 10:00.
pub fn make_test_state(store: StubStore) -> AppState {
    let config = Config::new().with_profile(SyncProfile::full().with_pause(Duration::ZERO));
    let pipelines = Pipelines::new(Arc::new(EmptySource), Arc::new(store), Arc::new(config));
    AppState::new(ApiConfig::default(), pipelines).with_clock(Arc::new(|| monday_at(10)))
}
