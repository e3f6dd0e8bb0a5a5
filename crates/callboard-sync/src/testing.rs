//! In-memory collaborators for pipeline tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use callboard_aircall::{AircallError, CallSource};
use callboard_core::{Config, SyncProfile};
use callboard_models::{ArtifactKind, BoardColumn, BoardItem, Call, ItemsPage};
use callboard_monday::{BoardStore, MondayError};

use crate::pipeline::Pipelines;

/// Monday 2 June 2025, 09:30 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap()
}

/// Full preset without pauses.
pub fn profile() -> SyncProfile {
    SyncProfile::full().with_pause(Duration::ZERO)
}

pub fn fixture(source: FakeSource, store: FakeStore) -> Pipelines {
    Pipelines::new(Arc::new(source), Arc::new(store), Arc::new(Config::new()))
        .with_clock(Arc::new(fixed_now))
}

pub struct FakeSource {
    calls: Vec<Call>,
    artifacts: HashMap<(u64, ArtifactKind), Value>,
    ping_ok: bool,
}

impl FakeSource {
    pub fn new(calls: Vec<Call>) -> Self {
        Self {
            calls,
            artifacts: HashMap::new(),
            ping_ok: true,
        }
    }

    pub fn with_artifact(mut self, call_id: u64, kind: ArtifactKind, payload: Value) -> Self {
        self.artifacts.insert((call_id, kind), payload);
        self
    }

    pub fn failing_ping(mut self) -> Self {
        self.ping_ok = false;
        self
    }
}

#[async_trait]
impl CallSource for FakeSource {
    async fn ping(&self, _timeout: Duration) -> callboard_aircall::Result<()> {
        if self.ping_ok {
            Ok(())
        } else {
            Err(AircallError::Status {
                status: 401,
                body: "Unauthorized".to_string(),
            })
        }
    }

    async fn recent_calls(
        &self,
        _since: Option<DateTime<Utc>>,
        limit: u32,
        _timeout: Duration,
    ) -> callboard_aircall::Result<Vec<Call>> {
        Ok(self.calls.iter().take(limit as usize).cloned().collect())
    }

    async fn call(&self, call_id: u64, _timeout: Duration) -> callboard_aircall::Result<Option<Call>> {
        Ok(self.calls.iter().find(|c| c.id == call_id).cloned())
    }

    async fn artifact(
        &self,
        call_id: u64,
        kind: ArtifactKind,
        _timeout: Duration,
    ) -> callboard_aircall::Result<Option<Value>> {
        Ok(self.artifacts.get(&(call_id, kind)).cloned())
    }
}

/// A recorded `change_column_value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub board_id: String,
    pub item_id: String,
    pub column_id: String,
    pub value: Value,
}

#[derive(Default)]
struct Boards {
    items: HashMap<String, Vec<BoardItem>>,
    columns: HashMap<String, Vec<BoardColumn>>,
    created: Vec<(String, String, Value)>,
    changes: Vec<Change>,
    fail_creates: bool,
    next_id: u64,
}

/// Boards held in memory. Clones share state.
#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Mutex<Boards>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(self, board_id: &str, items: Vec<BoardItem>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .items
            .entry(board_id.to_string())
            .or_default()
            .extend(items);
        self
    }

    pub fn with_column(self, board_id: &str, id: &str, title: &str, column_type: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .columns
            .entry(board_id.to_string())
            .or_default()
            .push(BoardColumn {
                id: id.to_string(),
                title: title.to_string(),
                column_type: column_type.to_string(),
            });
        self
    }

    pub fn failing_creates(self) -> Self {
        self.inner.lock().unwrap().fail_creates = true;
        self
    }

    /// `(board, item name, column values)` of every created item.
    pub fn created(&self) -> Vec<(String, String, Value)> {
        self.inner.lock().unwrap().created.clone()
    }

    pub fn changes(&self) -> Vec<Change> {
        self.inner.lock().unwrap().changes.clone()
    }

    pub fn columns(&self, board_id: &str) -> Vec<BoardColumn> {
        self.inner
            .lock()
            .unwrap()
            .columns
            .get(board_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl BoardStore for FakeStore {
    async fn board_columns(&self, board_id: &str) -> callboard_monday::Result<Vec<BoardColumn>> {
        Ok(self.columns(board_id))
    }

    async fn items_page(
        &self,
        board_id: &str,
        _cursor: Option<&str>,
        _limit: u32,
    ) -> callboard_monday::Result<ItemsPage> {
        let items = self
            .inner
            .lock()
            .unwrap()
            .items
            .get(board_id)
            .cloned()
            .unwrap_or_default();
        Ok(ItemsPage {
            cursor: None,
            items,
        })
    }

    async fn create_item(
        &self,
        board_id: &str,
        item_name: &str,
        column_values: &Value,
    ) -> callboard_monday::Result<String> {
        let mut boards = self.inner.lock().unwrap();
        if boards.fail_creates {
            return Err(MondayError::GraphQl("ColumnValueException".to_string()));
        }
        boards.next_id += 1;
        let id = format!("new-{}", boards.next_id);

        let mut item = BoardItem::new(id.clone(), item_name);
        if let Some(values) = column_values.as_object() {
            for (column, value) in values {
                if let Some(text) = value.as_str() {
                    item = item.with_text(column.clone(), text);
                }
            }
        }
        boards
            .items
            .entry(board_id.to_string())
            .or_default()
            .push(item);
        boards.created.push((
            board_id.to_string(),
            item_name.to_string(),
            column_values.clone(),
        ));
        Ok(id)
    }

    async fn create_column(
        &self,
        board_id: &str,
        title: &str,
        column_type: &str,
    ) -> callboard_monday::Result<String> {
        let id = format!("{}_created", column_type);
        self.inner
            .lock()
            .unwrap()
            .columns
            .entry(board_id.to_string())
            .or_default()
            .push(BoardColumn {
                id: id.clone(),
                title: title.to_string(),
                column_type: column_type.to_string(),
            });
        Ok(id)
    }

    async fn change_column_value(
        &self,
        board_id: &str,
        item_id: &str,
        column_id: &str,
        value: &Value,
    ) -> callboard_monday::Result<()> {
        self.inner.lock().unwrap().changes.push(Change {
            board_id: board_id.to_string(),
            item_id: item_id.to_string(),
            column_id: column_id.to_string(),
            value: value.clone(),
        });
        Ok(())
    }

    async fn change_multiple_column_values(
        &self,
        board_id: &str,
        item_id: &str,
        column_values: &Value,
    ) -> callboard_monday::Result<()> {
        if let Some(values) = column_values.as_object() {
            for (column, value) in values {
                self.change_column_value(board_id, item_id, column, value)
                    .await?;
            }
        }
        Ok(())
    }

    async fn create_board(&self, name: &str, _kind: &str) -> callboard_monday::Result<String> {
        Ok(format!("board-{}", name))
    }

    async fn create_group(&self, board_id: &str, name: &str) -> callboard_monday::Result<String> {
        Ok(format!("{}-{}", board_id, name))
    }
}
