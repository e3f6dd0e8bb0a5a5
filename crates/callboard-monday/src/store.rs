//! BoardStore trait definition.
//!
//! The pipelines only ever see a [`BoardStore`]. [`crate::MondayClient`] is
//! the production implementation; tests provide in-memory ones.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use callboard_models::{parse_call_key, BoardColumn, BoardItem, ItemsPage};

use crate::error::Result;

/// Items requested per page when walking a board.
pub const PAGE_SIZE: u32 = 100;

/// Read and write access to Monday.com boards.
///
/// Column values are passed as JSON objects keyed by column id; the
/// implementation takes care of encoding them as GraphQL `JSON` scalars.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Columns of a board, in display order.
    async fn board_columns(&self, board_id: &str) -> Result<Vec<BoardColumn>>;

    /// One page of items. Pass the cursor of the previous page to continue.
    async fn items_page(
        &self,
        board_id: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<ItemsPage>;

    /// Creates an item and returns its id.
    async fn create_item(
        &self,
        board_id: &str,
        item_name: &str,
        column_values: &Value,
    ) -> Result<String>;

    /// Creates a column and returns its id.
    async fn create_column(&self, board_id: &str, title: &str, column_type: &str)
        -> Result<String>;

    /// Sets a single column of an item.
    async fn change_column_value(
        &self,
        board_id: &str,
        item_id: &str,
        column_id: &str,
        value: &Value,
    ) -> Result<()>;

    /// Sets several columns of an item at once.
    async fn change_multiple_column_values(
        &self,
        board_id: &str,
        item_id: &str,
        column_values: &Value,
    ) -> Result<()>;

    /// Creates a board and returns its id.
    async fn create_board(&self, name: &str, kind: &str) -> Result<String>;

    /// Creates a group on a board and returns its id.
    async fn create_group(&self, board_id: &str, name: &str) -> Result<String>;

    /// Every item of a board, following cursors until exhausted.
    async fn all_items(&self, board_id: &str) -> Result<Vec<BoardItem>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.items_page(board_id, cursor.as_deref(), PAGE_SIZE).await?;
            let received = page.items.len();
            items.extend(page.items);

            match page.cursor {
                Some(next) if received > 0 => cursor = Some(next),
                _ => break,
            }
        }

        debug!(board_id, count = items.len(), "Listed board items");
        Ok(items)
    }

    /// Synthetic call keys already present in `key_column`.
    async fn known_call_keys(&self, board_id: &str, key_column: &str) -> Result<HashSet<String>> {
        let items = self.all_items(board_id).await?;
        Ok(items
            .iter()
            .filter_map(|item| item.column_text(key_column))
            .filter(|text| parse_call_key(text).is_some())
            .map(str::to_string)
            .collect())
    }

    /// Id of the first column with the given title (and type, if given).
    async fn find_column(
        &self,
        board_id: &str,
        title: &str,
        column_type: Option<&str>,
    ) -> Result<Option<String>> {
        let columns = self.board_columns(board_id).await?;
        Ok(columns
            .into_iter()
            .find(|c| c.title == title && column_type.map_or(true, |t| c.column_type == t))
            .map(|c| c.id))
    }
}
