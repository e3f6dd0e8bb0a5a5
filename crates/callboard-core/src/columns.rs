//! Board column identifiers.
//!
//! Monday.com addresses columns by opaque generated ids. Callboard refers to
//! them through logical names so that boards can be recreated without code
//! changes: every id below is only a default and can be overridden from the
//! environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logical columns of the call board, one per synced call attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CallField {
    AircallId,
    Direction,
    Status,
    Duration,
    StartDate,
    EndDate,
    PhoneNumber,
    Transcription,
    Summary,
    Sentiment,
    Topics,
    Actions,
    SourceType,
    ImportDate,
    Agent,
    Notes,
    Cost,
    Recording,
    ContactName,
    Voicemail,
    MissedReason,
    Tags,
    Comments,
    Currency,
    Team,
}

impl CallField {
    pub const ALL: [CallField; 25] = [
        CallField::AircallId,
        CallField::Direction,
        CallField::Status,
        CallField::Duration,
        CallField::StartDate,
        CallField::EndDate,
        CallField::PhoneNumber,
        CallField::Transcription,
        CallField::Summary,
        CallField::Sentiment,
        CallField::Topics,
        CallField::Actions,
        CallField::SourceType,
        CallField::ImportDate,
        CallField::Agent,
        CallField::Notes,
        CallField::Cost,
        CallField::Recording,
        CallField::ContactName,
        CallField::Voicemail,
        CallField::MissedReason,
        CallField::Tags,
        CallField::Comments,
        CallField::Currency,
        CallField::Team,
    ];

    /// Column title on the board.
    pub fn title(&self) -> &'static str {
        match self {
            CallField::AircallId => "ID_Aircall",
            CallField::Direction => "Direction_Appel",
            CallField::Status => "Statut_Appel",
            CallField::Duration => "Duree_Appel",
            CallField::StartDate => "Date_Debut",
            CallField::EndDate => "Date_Fin",
            CallField::PhoneNumber => "Numero_Telephone",
            CallField::Transcription => "Transcription_IA",
            CallField::Summary => "Resume_IA",
            CallField::Sentiment => "Sentiment_IA",
            CallField::Topics => "Sujets_IA",
            CallField::Actions => "Actions_IA",
            CallField::SourceType => "Type_Source",
            CallField::ImportDate => "Date_Import",
            CallField::Agent => "Agent_Responsable",
            CallField::Notes => "Notes",
            CallField::Cost => "Cout_Appel",
            CallField::Recording => "Enregistrement",
            CallField::ContactName => "Nom_Contact",
            CallField::Voicemail => "Repondeur",
            CallField::MissedReason => "Raison_Manque",
            CallField::Tags => "Tags",
            CallField::Comments => "Commentaires",
            CallField::Currency => "Devise",
            CallField::Team => "Equipe",
        }
    }

    /// Column id on the production board.
    pub fn default_id(&self) -> &'static str {
        match self {
            CallField::AircallId => "text_mkv8ydgs",
            CallField::Direction => "color_mkv8s2zs",
            CallField::Status => "color_mkv87rr1",
            CallField::Duration => "numeric_mkv8ke08",
            CallField::StartDate => "date_mkv8ctwx",
            CallField::EndDate => "date_mkv8zk78",
            CallField::PhoneNumber => "text_mkv8hgj8",
            CallField::Transcription => "long_text_mkv83f14",
            CallField::Summary => "long_text_mkv8ctta",
            CallField::Sentiment => "color_mkv88j2c",
            CallField::Topics => "text_mkv8np3m",
            CallField::Actions => "long_text_mkv8khr",
            CallField::SourceType => "color_mkv8ecf6",
            CallField::ImportDate => "date_mkv82dj7",
            CallField::Agent => "text_mkv8g3v6",
            CallField::Notes => "long_text_mkv883fq",
            CallField::Cost => "numeric_mkv840v2",
            CallField::Recording => "link_mkv8zdta",
            CallField::ContactName => "text_mkv8510p",
            CallField::Voicemail => "color_mkv8hbc3",
            CallField::MissedReason => "text_mkv8qkkn",
            CallField::Tags => "text_mkv8jbqh",
            CallField::Comments => "long_text_mkv8ecn3",
            CallField::Currency => "text_mkv88hze",
            CallField::Team => "text_mkv89zwb",
        }
    }

    /// Monday column type used when provisioning a fresh board.
    pub fn column_type(&self) -> &'static str {
        match self {
            CallField::Direction
            | CallField::Status
            | CallField::Sentiment
            | CallField::SourceType
            | CallField::Voicemail => "status",
            CallField::Duration | CallField::Cost => "numbers",
            CallField::StartDate | CallField::EndDate | CallField::ImportDate => "date",
            CallField::Transcription
            | CallField::Summary
            | CallField::Actions
            | CallField::Notes
            | CallField::Comments => "long_text",
            CallField::Recording => "link",
            _ => "text",
        }
    }

    /// Looks a field up by its board title.
    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.title() == title)
    }

    /// Environment variable overriding this column id (`COLUMN_ID_AIRCALL`...).
    pub fn env_var(&self) -> String {
        format!("COLUMN_{}", self.title().to_uppercase())
    }
}

impl fmt::Display for CallField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Resolved column ids of the call board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallColumns {
    ids: BTreeMap<CallField, String>,
}

impl Default for CallColumns {
    fn default() -> Self {
        Self {
            ids: CallField::ALL
                .into_iter()
                .map(|f| (f, f.default_id().to_string()))
                .collect(),
        }
    }
}

impl CallColumns {
    /// Column id for a field.
    pub fn id(&self, field: CallField) -> &str {
        self.ids
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.default_id())
    }

    /// Overrides one column id.
    pub fn with_id(mut self, field: CallField, id: impl Into<String>) -> Self {
        self.ids.insert(field, id.into());
        self
    }

    /// Iterates `(field, column id)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (CallField, &str)> + '_ {
        CallField::ALL.into_iter().map(move |f| (f, self.id(f)))
    }
}

/// Columns of the task board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskColumns {
    pub description: String,
    pub date: String,
    pub status: String,
    pub priority: String,
    pub client: String,
    pub owner: String,
}

impl Default for TaskColumns {
    fn default() -> Self {
        Self {
            description: "text9".to_string(),
            date: "date".to_string(),
            status: "project_status".to_string(),
            priority: "priority_1".to_string(),
            client: "board_relation_mkv896hf".to_string(),
            owner: "project_owner".to_string(),
        }
    }
}

/// Every column id and title the pipelines rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnIds {
    pub call: CallColumns,
    pub task: TaskColumns,
    /// Text column on the call board holding `Vendeur: ...` / `Acquéreur: ...`.
    pub contact_link: String,
    /// Board-relation column on the call board pointing at the client.
    pub client_relation: String,
    /// Title of the contact link column, created by the link run if missing.
    pub contact_link_title: String,
    /// Title of the phone column on the seller and buyer boards.
    pub contact_phone_title: String,
    /// Title of the board-relation column filled by the relations run.
    pub relation_title: String,
}

impl Default for ColumnIds {
    fn default() -> Self {
        Self {
            call: CallColumns::default(),
            task: TaskColumns::default(),
            contact_link: "text_mkv8s52r".to_string(),
            client_relation: "board_relation_mkv8jmms".to_string(),
            contact_link_title: "Contact_Lié".to_string(),
            contact_phone_title: "Téléphone".to_string(),
            relation_title: "Connecter".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_call_columns_are_distinct() {
        let ids: HashSet<_> = CallField::ALL.iter().map(|f| f.default_id()).collect();
        let titles: HashSet<_> = CallField::ALL.iter().map(|f| f.title()).collect();
        assert_eq!(ids.len(), 25);
        assert_eq!(titles.len(), 25);
    }

    #[test]
    fn test_override_column_id() {
        let columns = CallColumns::default().with_id(CallField::PhoneNumber, "text_custom");
        assert_eq!(columns.id(CallField::PhoneNumber), "text_custom");
        assert_eq!(columns.id(CallField::AircallId), "text_mkv8ydgs");
    }

    #[test]
    fn test_from_title_and_env_var() {
        assert_eq!(CallField::from_title("Resume_IA"), Some(CallField::Summary));
        assert_eq!(CallField::from_title("Inconnu"), None);
        assert_eq!(CallField::AircallId.env_var(), "COLUMN_ID_AIRCALL");
    }

    #[test]
    fn test_column_types() {
        assert_eq!(CallField::Sentiment.column_type(), "status");
        assert_eq!(CallField::Duration.column_type(), "numbers");
        assert_eq!(CallField::Tags.column_type(), "text");
    }
}
