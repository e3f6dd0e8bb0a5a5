//! Monday.com GraphQL client.
//!
//! Every operation is a POST of `{query, variables}` to the single API
//! endpoint. Monday reports most failures as HTTP 200 with an `errors`
//! array; those are surfaced as [`MondayError::GraphQl`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, trace, warn};

use callboard_core::MondayConfig;
use callboard_models::{BoardColumn, ItemsPage};

use crate::error::{MondayError, Result};
use crate::store::BoardStore;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const COLUMNS_QUERY: &str = r#"
query ($boardId: ID!) {
    boards(ids: [$boardId]) {
        columns { id title type }
    }
}"#;

const ITEMS_PAGE_QUERY: &str = r#"
query ($boardId: ID!, $limit: Int!, $cursor: String) {
    boards(ids: [$boardId]) {
        items_page(limit: $limit, cursor: $cursor) {
            cursor
            items {
                id
                name
                column_values { id text value }
            }
        }
    }
}"#;

const CREATE_ITEM: &str = r#"
mutation ($boardId: ID!, $itemName: String!, $columnValues: JSON!) {
    create_item(board_id: $boardId, item_name: $itemName, column_values: $columnValues) {
        id
    }
}"#;

const CREATE_COLUMN: &str = r#"
mutation ($boardId: ID!, $title: String!, $columnType: ColumnType!) {
    create_column(board_id: $boardId, title: $title, column_type: $columnType) {
        id
    }
}"#;

const CHANGE_COLUMN_VALUE: &str = r#"
mutation ($boardId: ID!, $itemId: ID!, $columnId: String!, $value: JSON!) {
    change_column_value(board_id: $boardId, item_id: $itemId, column_id: $columnId, value: $value) {
        id
    }
}"#;

const CHANGE_MULTIPLE_COLUMN_VALUES: &str = r#"
mutation ($boardId: ID!, $itemId: ID!, $columnValues: JSON!) {
    change_multiple_column_values(board_id: $boardId, item_id: $itemId, column_values: $columnValues) {
        id
    }
}"#;

const CREATE_BOARD: &str = r#"
mutation ($name: String!, $kind: BoardKind!) {
    create_board(board_name: $name, board_kind: $kind) {
        id
    }
}"#;

const CREATE_GROUP: &str = r#"
mutation ($boardId: ID!, $name: String!) {
    create_group(board_id: $boardId, group_name: $name) {
        id
    }
}"#;

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<Value>>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BoardsData<B> {
    #[serde(default = "Vec::new")]
    boards: Vec<B>,
}

#[derive(Debug, Deserialize)]
struct ColumnsBoard {
    #[serde(default)]
    columns: Vec<BoardColumn>,
}

#[derive(Debug, Deserialize)]
struct ItemsBoard {
    items_page: ItemsPage,
}

/// `{ "<mutation>": { "id": ... } }`.
#[derive(Debug, Deserialize)]
struct Created {
    id: Value,
}

/// Decodes a response body, turning GraphQL errors into [`MondayError`].
fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
    let response: GraphQlResponse<T> =
        serde_json::from_value(body).map_err(|e| MondayError::Parse(e.to_string()))?;

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string())
            })
            .collect();
        return Err(MondayError::GraphQl(messages.join("; ")));
    }
    if let Some(message) = response.error_message {
        return Err(MondayError::GraphQl(message));
    }

    response
        .data
        .ok_or_else(|| MondayError::Parse("response has no data".to_string()))
}

/// Extracts the id of a created entity from `data.<field>.id`.
fn created_id(data: Value, field: &str) -> Result<String> {
    let created: Created = data
        .get(field)
        .cloned()
        .filter(|v| !v.is_null())
        .ok_or_else(|| MondayError::Parse(format!("missing {}", field)))
        .and_then(|v| serde_json::from_value(v).map_err(|e| MondayError::Parse(e.to_string())))?;

    match created.id {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(MondayError::Parse(format!("unexpected id {}", other))),
    }
}

/// Monday.com API client.
#[derive(Clone)]
pub struct MondayClient {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
    api_version: String,
    timeout: Duration,
}

impl MondayClient {
    /// Creates a client from the Monday section of the config.
    pub fn new(config: &MondayConfig) -> Result<Self> {
        if config.api_token.is_empty() {
            return Err(MondayError::Configuration(
                "Monday API token is required".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
            api_version: config.api_version.clone(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs one GraphQL operation.
    pub async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        trace!(variables = %variables, "Monday request");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", &self.api_token)
            .header("API-Version", &self.api_version)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Monday API returned an error status");
            return Err(MondayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MondayError::Parse(e.to_string()))?;
        decode(body)
    }

    async fn mutate(&self, query: &str, variables: Value, field: &str) -> Result<String> {
        let data: Value = self.execute(query, variables).await?;
        created_id(data, field)
    }
}

#[async_trait]
impl BoardStore for MondayClient {
    async fn board_columns(&self, board_id: &str) -> Result<Vec<BoardColumn>> {
        let data: BoardsData<ColumnsBoard> = self
            .execute(COLUMNS_QUERY, json!({ "boardId": board_id }))
            .await?;
        data.boards
            .into_iter()
            .next()
            .map(|b| b.columns)
            .ok_or_else(|| MondayError::BoardNotFound(board_id.to_string()))
    }

    async fn items_page(
        &self,
        board_id: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<ItemsPage> {
        let data: BoardsData<ItemsBoard> = self
            .execute(
                ITEMS_PAGE_QUERY,
                json!({ "boardId": board_id, "limit": limit, "cursor": cursor }),
            )
            .await?;
        let page = data
            .boards
            .into_iter()
            .next()
            .map(|b| b.items_page)
            .ok_or_else(|| MondayError::BoardNotFound(board_id.to_string()))?;
        debug!(board_id, items = page.items.len(), more = page.cursor.is_some(), "Fetched items page");
        Ok(page)
    }

    async fn create_item(
        &self,
        board_id: &str,
        item_name: &str,
        column_values: &Value,
    ) -> Result<String> {
        let id = self
            .mutate(
                CREATE_ITEM,
                json!({
                    "boardId": board_id,
                    "itemName": item_name,
                    "columnValues": column_values.to_string(),
                }),
                "create_item",
            )
            .await?;
        debug!(board_id, item_id = %id, "Created item");
        Ok(id)
    }

    async fn create_column(
        &self,
        board_id: &str,
        title: &str,
        column_type: &str,
    ) -> Result<String> {
        self.mutate(
            CREATE_COLUMN,
            json!({ "boardId": board_id, "title": title, "columnType": column_type }),
            "create_column",
        )
        .await
    }

    async fn change_column_value(
        &self,
        board_id: &str,
        item_id: &str,
        column_id: &str,
        value: &Value,
    ) -> Result<()> {
        self.mutate(
            CHANGE_COLUMN_VALUE,
            json!({
                "boardId": board_id,
                "itemId": item_id,
                "columnId": column_id,
                "value": value.to_string(),
            }),
            "change_column_value",
        )
        .await
        .map(|_| ())
    }

    async fn change_multiple_column_values(
        &self,
        board_id: &str,
        item_id: &str,
        column_values: &Value,
    ) -> Result<()> {
        self.mutate(
            CHANGE_MULTIPLE_COLUMN_VALUES,
            json!({
                "boardId": board_id,
                "itemId": item_id,
                "columnValues": column_values.to_string(),
            }),
            "change_multiple_column_values",
        )
        .await
        .map(|_| ())
    }

    async fn create_board(&self, name: &str, kind: &str) -> Result<String> {
        self.mutate(
            CREATE_BOARD,
            json!({ "name": name, "kind": kind }),
            "create_board",
        )
        .await
    }

    async fn create_group(&self, board_id: &str, name: &str) -> Result<String> {
        self.mutate(
            CREATE_GROUP,
            json!({ "boardId": board_id, "name": name }),
            "create_group",
        )
        .await
    }
}
