//! Monday.com board records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column id to string value, JSON-encoded into `column_values` arguments.
pub type ColumnValues = BTreeMap<String, String>;

/// One cell of a board item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnValue {
    pub id: String,
    /// Human-readable rendering.
    #[serde(default)]
    pub text: Option<String>,
    /// Raw JSON-encoded value, as a string.
    #[serde(default)]
    pub value: Option<String>,
}

/// A row of a board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

impl BoardItem {
    /// Creates an item with no column values.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            column_values: Vec::new(),
        }
    }

    /// Adds a column with the given text.
    pub fn with_text(mut self, column_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.column_values.push(ColumnValue {
            id: column_id.into(),
            text: Some(text.into()),
            value: None,
        });
        self
    }

    /// Adds a column with the given raw value.
    pub fn with_value(mut self, column_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.column_values.push(ColumnValue {
            id: column_id.into(),
            text: None,
            value: Some(value.into()),
        });
        self
    }

    /// Trimmed, non-empty text of a column.
    pub fn column_text(&self, column_id: &str) -> Option<&str> {
        self.column(column_id)
            .and_then(|c| c.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Raw value of a column, if set.
    pub fn column_value(&self, column_id: &str) -> Option<&str> {
        self.column(column_id)
            .and_then(|c| c.value.as_deref())
            .filter(|v| !v.is_empty() && *v != "null")
    }

    fn column(&self, column_id: &str) -> Option<&ColumnValue> {
        self.column_values.iter().find(|c| c.id == column_id)
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardColumn {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub column_type: String,
}

/// One page of `items_page`; `cursor` is `None` on the last page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsPage {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub items: Vec<BoardItem>,
}
