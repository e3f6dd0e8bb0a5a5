//! Call items to contacts, as a board-relation column.

use serde_json::{json, Value};
use tracing::{debug, error, info};

use callboard_core::{phones_match, CallField, SyncProfile};
use callboard_models::BoardItem;

use crate::automation::Automation;
use crate::contacts::id_value;
use crate::error::{Result, SyncError};
use crate::pipeline::Pipelines;
use crate::report::RunReport;

/// Phone of a call item: its phone column, else the item name after the
/// last ` - `.
fn call_phone<'a>(item: &'a BoardItem, phone_column: &str) -> Option<&'a str> {
    item.column_text(phone_column).or_else(|| {
        item.name
            .rsplit_once(" - ")
            .map(|(_, phone)| phone.trim())
            .filter(|p| !p.is_empty())
    })
}

/// First contact carrying a matching number in any phone-like column.
fn find_by_phone<'a>(contacts: &'a [BoardItem], phone: &str) -> Option<&'a BoardItem> {
    contacts.iter().find(|contact| {
        contact.column_values.iter().any(|c| {
            c.id.to_lowercase().contains("phone")
                && c.text.as_deref().is_some_and(|text| phones_match(text, phone))
        })
    })
}

/// `{"item_ids":[id],"linkedPulseIds":[{"linkedPulseId":id}]}`.
pub fn relation_value(item_id: &str) -> Value {
    let id = id_value(item_id);
    json!({
        "item_ids": [id.clone()],
        "linkedPulseIds": [{ "linkedPulseId": id }],
    })
}

impl Pipelines {
    /// Points the relation column of every call item at its contact.
    pub(crate) async fn relations(&self, profile: &SyncProfile) -> Result<RunReport> {
        let mut report = RunReport::start(Automation::Relations, self.now());
        let boards = &self.config.boards;
        let columns = &self.config.columns;

        let relation_column = self
            .store
            .find_column(&boards.calls, &columns.relation_title, Some("board_relation"))
            .await?
            .ok_or_else(|| SyncError::MissingColumn(columns.relation_title.clone()))?;

        let calls = self.store.all_items(&boards.calls).await?;
        let sellers = self.store.all_items(&boards.sellers).await?;
        let buyers = self.store.all_items(&boards.buyers).await?;
        info!(
            calls = calls.len(),
            sellers = sellers.len(),
            buyers = buyers.len(),
            "Loaded boards"
        );

        let phone_column = columns.call.id(CallField::PhoneNumber);
        for item in &calls {
            let Some(phone) = call_phone(item, phone_column) else {
                debug!(item_id = %item.id, "No phone number on call item");
                continue;
            };
            report.processed += 1;

            let Some(contact) = find_by_phone(&sellers, phone).or_else(|| find_by_phone(&buyers, phone))
            else {
                debug!(item_id = %item.id, phone, "No contact for call");
                report.skipped += 1;
                continue;
            };

            match self
                .store
                .change_column_value(
                    &boards.calls,
                    &item.id,
                    &relation_column,
                    &relation_value(&contact.id),
                )
                .await
            {
                Ok(()) => {
                    debug!(item_id = %item.id, contact_id = %contact.id, "Updated relation");
                    report.updated += 1;
                }
                Err(e) => {
                    error!(item_id = %item.id, error = %e, "Failed to update relation");
                    report.failed += 1;
                }
            }

            self.pause(profile).await;
        }

        Ok(report.finish(self.now()))
    }
}
