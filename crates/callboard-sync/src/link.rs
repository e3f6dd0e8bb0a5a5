//! Call items to seller and buyer contacts, as a text column.

use serde_json::Value;
use tracing::{debug, error, info};

use callboard_core::{CallField, SyncProfile};
use callboard_models::parse_call_key;

use crate::automation::Automation;
use crate::contacts::{ContactIndex, ContactKind};
use crate::error::{Result, SyncError};
use crate::pipeline::Pipelines;
use crate::report::RunReport;

/// Written when no contact shares the call's number.
pub const CONTACT_NOT_FOUND: &str = "Contact non trouvé";

impl Pipelines {
    /// Writes the matching contact of every call item into the contact
    /// link column.
    pub(crate) async fn link(&self, profile: &SyncProfile) -> Result<RunReport> {
        let mut report = RunReport::start(Automation::Link, self.now());
        let boards = &self.config.boards;
        let columns = &self.config.columns;

        let link_column = self.ensure_contact_link_column().await?;
        let phone_column = self
            .store
            .find_column(&boards.calls, CallField::PhoneNumber.title(), None)
            .await?
            .unwrap_or_else(|| columns.call.id(CallField::PhoneNumber).to_string());

        let contacts = self.contact_index().await?;
        info!(contacts = contacts.len(), "Contact index ready");

        let key_column = columns.call.id(CallField::AircallId);
        for item in self.store.all_items(&boards.calls).await? {
            if item.column_text(key_column).and_then(parse_call_key).is_none() {
                debug!(item_id = %item.id, "Not a call item");
                continue;
            }
            report.processed += 1;

            let Some(phone) = item.column_text(&phone_column) else {
                debug!(item_id = %item.id, "Call item has no phone number");
                report.skipped += 1;
                continue;
            };

            let contact = contacts.lookup(phone);
            let text = contact
                .map(|c| c.link_text())
                .unwrap_or_else(|| CONTACT_NOT_FOUND.to_string());

            match self
                .store
                .change_column_value(&boards.calls, &item.id, &link_column, &Value::String(text))
                .await
            {
                Ok(()) if contact.is_some() => {
                    debug!(item_id = %item.id, "Linked call to contact");
                    report.updated += 1;
                }
                Ok(()) => {
                    debug!(item_id = %item.id, phone, "No contact for call");
                    report.skipped += 1;
                }
                Err(e) => {
                    error!(item_id = %item.id, error = %e, "Failed to write contact link");
                    report.failed += 1;
                }
            }

            self.pause(profile).await;
        }

        Ok(report.finish(self.now()))
    }

    /// Id of the contact link column, created as a text column when missing.
    async fn ensure_contact_link_column(&self) -> Result<String> {
        let board = &self.config.boards.calls;
        let title = &self.config.columns.contact_link_title;
        if let Some(id) = self.store.find_column(board, title, None).await? {
            return Ok(id);
        }
        let id = self.store.create_column(board, title, "text").await?;
        info!(column_id = %id, title = %title, "Created contact link column");
        Ok(id)
    }

    /// Sellers and buyers keyed by normalized phone.
    pub(crate) async fn contact_index(&self) -> Result<ContactIndex> {
        let boards = &self.config.boards;
        let title = &self.config.columns.contact_phone_title;
        let mut index = ContactIndex::default();

        for (kind, board) in [
            (ContactKind::Seller, &boards.sellers),
            (ContactKind::Buyer, &boards.buyers),
        ] {
            let phone_column = self
                .store
                .find_column(board, title, None)
                .await?
                .ok_or_else(|| SyncError::MissingColumn(format!("{} on board {}", title, board)))?;
            let items = self.store.all_items(board).await?;
            index.index(kind, &items, &phone_column);
        }

        Ok(index)
    }
}
