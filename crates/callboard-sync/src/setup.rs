//! Provisioning of a fresh call board.

use serde::Serialize;
use tracing::{info, warn};

use callboard_core::{CallField, SyncProfile};

use crate::error::Result;
use crate::pipeline::Pipelines;

/// Name given to a provisioned call board.
pub const DEFAULT_BOARD_NAME: &str = "Appels Aircall - IA";

/// Groups created on a provisioned call board.
pub const CALL_GROUPS: [&str; 4] = [
    "Appels Entrants",
    "Appels Sortants",
    "Appels avec IA",
    "Appels sans IA",
];

/// What a board setup created.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardSetup {
    pub board_id: String,
    pub columns: Vec<(CallField, String)>,
    pub groups: Vec<(String, String)>,
    /// Columns or groups that could not be created.
    pub failed: usize,
}

impl BoardSetup {
    /// Environment lines pointing the process at the new board.
    pub fn env_lines(&self) -> Vec<String> {
        std::iter::once(format!("AIRCALL_BOARD_ID={}", self.board_id))
            .chain(
                self.columns
                    .iter()
                    .map(|(field, id)| format!("{}={}", field.env_var(), id)),
            )
            .collect()
    }
}

impl Pipelines {
    /// Creates a call board with one column per call field and the default
    /// groups.
    ///
    /// Only the board creation itself is fatal; a column or group that
    /// cannot be created is logged and counted.
    pub async fn setup_board(&self, name: &str, profile: &SyncProfile) -> Result<BoardSetup> {
        let board_id = self.store.create_board(name, "public").await?;
        info!(board_id = %board_id, name, "Board created");

        let mut setup = BoardSetup {
            board_id,
            ..Default::default()
        };

        for field in CallField::ALL {
            match self
                .store
                .create_column(&setup.board_id, field.title(), field.column_type())
                .await
            {
                Ok(id) => setup.columns.push((field, id)),
                Err(e) => {
                    warn!(column = field.title(), error = %e, "Failed to create column");
                    setup.failed += 1;
                }
            }
            self.pause(profile).await;
        }

        for group in CALL_GROUPS {
            match self.store.create_group(&setup.board_id, group).await {
                Ok(id) => setup.groups.push((group.to_string(), id)),
                Err(e) => {
                    warn!(group, error = %e, "Failed to create group");
                    setup.failed += 1;
                }
            }
        }

        info!(
            board_id = %setup.board_id,
            columns = setup.columns.len(),
            groups = setup.groups.len(),
            failed = setup.failed,
            "Board setup finished"
        );
        Ok(setup)
    }
}
