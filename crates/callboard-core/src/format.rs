//! Rendering of calls and AI artifacts into board column values.
//!
//! The board is read by French-speaking agents, so every label here is
//! French and stable: downstream runs (tasks, assign) parse some of them
//! back out of the board.

use callboard_models::{
    call_key, ActionItems, Call, CallArtifacts, CallDirection, CallStatus, ColumnValues,
    Sentiment, Summary, Topic, Transcription,
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::columns::{CallColumns, CallField};
use crate::phone;

/// Shown for any artifact that could not be fetched.
pub const NOT_AVAILABLE: &str = "Non disponible";

/// Line prefix of AI-generated action items.
pub const AI_ACTION_PREFIX: &str = "🤖 IA:";

/// Line prefix of agent-written action items.
pub const AGENT_ACTION_PREFIX: &str = "👤 Agent:";

const UNKNOWN_AGENT: &str = "Agent inconnu";
const UNKNOWN_TEAM: &str = "Équipe inconnue";
const RECORDING_LABEL: &str = "🎵 Écouter l'enregistrement";

/// Artifacts rendered as the text stored on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTexts {
    pub transcription: String,
    pub summary: String,
    pub sentiment: String,
    pub topics: String,
    pub actions: String,
}

impl ArtifactTexts {
    /// Renders every artifact, substituting placeholders for missing ones.
    pub fn render(artifacts: &CallArtifacts) -> Self {
        Self {
            transcription: transcription_text(artifacts.transcription.as_ref()),
            summary: summary_text(artifacts.summary.as_ref()),
            sentiment: sentiment_text(artifacts.sentiment.as_ref()),
            topics: topics_text(artifacts.topics.as_ref()),
            actions: actions_text(artifacts.action_items.as_ref()),
        }
    }

    fn has_transcription(&self) -> bool {
        self.transcription != NOT_AVAILABLE
    }

    fn has_summary(&self) -> bool {
        self.summary != NOT_AVAILABLE
    }
}

pub fn transcription_text(transcription: Option<&Transcription>) -> String {
    let Some(transcription) = transcription else {
        return NOT_AVAILABLE.to_string();
    };
    let utterances = transcription.utterances();
    if utterances.is_empty() {
        return "Transcription vide".to_string();
    }

    utterances
        .iter()
        .map(|u| {
            let start = u.start_time.unwrap_or(0.0).max(0.0) as u64;
            let speaker = match u.participant_type.as_deref() {
                Some("internal") => "👤 Agent",
                Some("external") => "📞 Client",
                _ => "❓ Inconnu",
            };
            format!(
                "[{:02}:{:02}] {}: {}",
                start / 60,
                start % 60,
                speaker,
                u.text.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn summary_text(summary: Option<&Summary>) -> String {
    match summary {
        None => NOT_AVAILABLE.to_string(),
        Some(s) => match s.content.as_deref() {
            Some(content) if !content.is_empty() => content.to_string(),
            _ => "Résumé vide".to_string(),
        },
    }
}

pub fn sentiment_text(sentiment: Option<&Sentiment>) -> String {
    let Some(sentiment) = sentiment else {
        return NOT_AVAILABLE.to_string();
    };
    let participants = sentiment.participants();
    if participants.is_empty() {
        return "Aucune analyse de sentiment".to_string();
    }

    participants
        .iter()
        .map(|p| {
            let value = p.value.as_deref().unwrap_or("NEUTRAL");
            let label = match value {
                "POSITIVE" => "😊 Positif",
                "NEGATIVE" => "😞 Négatif",
                "NEUTRAL" => "😐 Neutre",
                other => other,
            };
            format!("{}: {}", p.phone_number.as_deref().unwrap_or("Inconnu"), label)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn topics_text(topic: Option<&Topic>) -> String {
    match topic {
        None => NOT_AVAILABLE.to_string(),
        Some(t) if t.topics().is_empty() => "Aucun sujet identifié".to_string(),
        Some(t) => t.topics().join(", "),
    }
}

pub fn actions_text(actions: Option<&ActionItems>) -> String {
    let Some(actions) = actions else {
        return NOT_AVAILABLE.to_string();
    };
    if actions.items().is_empty() {
        return "Aucune action identifiée".to_string();
    }

    actions
        .items()
        .iter()
        .map(|item| {
            let prefix = if item.ai_generated.unwrap_or(false) {
                AI_ACTION_PREFIX
            } else {
                AGENT_ACTION_PREFIX
            };
            format!("{} {}", prefix, item.content.as_deref().unwrap_or(""))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts AI action lines from a rendered actions column.
pub fn ai_actions(actions_column: &str) -> Vec<String> {
    actions_column
        .lines()
        .filter_map(|line| line.trim().strip_prefix(AI_ACTION_PREFIX))
        .map(str::trim)
        .filter(|action| !action.is_empty())
        .map(str::to_string)
        .collect()
}

/// Status label index for the sentiment column.
pub fn sentiment_index(sentiment_text: &str) -> &'static str {
    if sentiment_text.contains("Positif") {
        "0"
    } else if sentiment_text.contains("Négatif") {
        "2"
    } else {
        "1"
    }
}

fn direction_index(direction: CallDirection) -> &'static str {
    match direction {
        CallDirection::Inbound => "0",
        _ => "1",
    }
}

fn status_index(status: CallStatus) -> &'static str {
    match status {
        CallStatus::Answered => "1",
        CallStatus::Done => "2",
        CallStatus::Initial | CallStatus::Unknown => "0",
    }
}

fn date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Item title: `Appel #<id> - <display phone>`.
pub fn item_name(call: &Call) -> String {
    format!("Appel #{} - {}", call.id, phone::format_display(call.raw_digits()))
}

/// Builds the column values written for a new call item.
///
/// Columns without a value are left out rather than written empty.
pub fn call_column_values(
    call: &Call,
    texts: &ArtifactTexts,
    columns: &CallColumns,
    import_date: NaiveDate,
) -> ColumnValues {
    let direction = call.direction();
    let duration = call.duration_secs();

    let mut notes = format!(
        "Appel {} | Durée: {} secondes",
        call.direction.as_deref().unwrap_or("inconnu"),
        duration
    );
    if texts.has_transcription() {
        notes.push_str(" | ✅ Transcription disponible");
    }
    if texts.has_summary() {
        notes.push_str(" | ✅ Résumé IA disponible");
    }

    let recording = call
        .recording
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(|url| serde_json::json!({ "url": url, "text": RECORDING_LABEL }).to_string())
        .unwrap_or_default();

    let tags = call.tag_labels();
    let comments = call.comment_texts();

    let agent = call
        .user
        .as_ref()
        .and_then(|u| u.name.clone())
        .unwrap_or_else(|| UNKNOWN_AGENT.to_string());
    let team = call
        .team
        .as_ref()
        .and_then(|t| t.name.clone())
        .unwrap_or_else(|| UNKNOWN_TEAM.to_string());

    let entries: Vec<(CallField, Option<String>)> = vec![
        (CallField::AircallId, Some(call_key(call.id))),
        (CallField::Direction, Some(direction_index(direction).to_string())),
        (CallField::Status, Some(status_index(call.status()).to_string())),
        (CallField::Duration, Some(duration.to_string())),
        (CallField::StartDate, call.started_at_utc().map(date)),
        (CallField::EndDate, call.ended_at_utc().map(date)),
        (
            CallField::PhoneNumber,
            Some(phone::format_display(call.raw_digits())),
        ),
        (CallField::Transcription, Some(texts.transcription.clone())),
        (CallField::Summary, Some(texts.summary.clone())),
        (
            CallField::Sentiment,
            Some(sentiment_index(&texts.sentiment).to_string()),
        ),
        (CallField::Topics, Some(texts.topics.clone())),
        (CallField::Actions, Some(texts.actions.clone())),
        (CallField::SourceType, Some("0".to_string())),
        (
            CallField::ImportDate,
            Some(import_date.format("%Y-%m-%d").to_string()),
        ),
        (CallField::Agent, Some(agent)),
        (CallField::Notes, Some(notes)),
        (CallField::Cost, call.cost_text()),
        (CallField::Recording, Some(recording)),
        (CallField::ContactName, call.contact_name()),
        (
            CallField::Voicemail,
            Some(if call.has_voicemail() { "0" } else { "1" }.to_string()),
        ),
        (CallField::MissedReason, call.missed_call_reason.clone()),
        (CallField::Tags, Some(tags.join(", "))),
        (CallField::Comments, Some(comments.join("\n"))),
        (CallField::Currency, call.currency.clone()),
        (CallField::Team, Some(team)),
    ];

    entries
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (columns.id(field).to_string(), v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use callboard_models::{
        ActionItem, SentimentParticipant, Team, TranscriptionContent, User, Utterance,
    };
    use serde_json::json;

    fn import_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn test_missing_artifacts_render_not_available() {
        let texts = ArtifactTexts::render(&CallArtifacts::default());
        assert_eq!(texts.transcription, "Non disponible");
        assert_eq!(texts.summary, "Non disponible");
        assert_eq!(texts.sentiment, "Non disponible");
        assert_eq!(texts.topics, "Non disponible");
        assert_eq!(texts.actions, "Non disponible");
    }

    #[test]
    fn test_empty_artifacts() {
        assert_eq!(
            transcription_text(Some(&Transcription::default())),
            "Transcription vide"
        );
        assert_eq!(summary_text(Some(&Summary::default())), "Résumé vide");
        assert_eq!(
            sentiment_text(Some(&Sentiment::default())),
            "Aucune analyse de sentiment"
        );
        assert_eq!(topics_text(Some(&Topic::default())), "Aucun sujet identifié");
        assert_eq!(
            actions_text(Some(&ActionItems::default())),
            "Aucune action identifiée"
        );
    }

    #[test]
    fn test_transcription_lines() {
        let transcription = Transcription {
            id: None,
            content: Some(TranscriptionContent {
                language: Some("fr".to_string()),
                utterances: Some(vec![
                    Utterance {
                        text: Some("Bonjour".to_string()),
                        participant_type: Some("internal".to_string()),
                        start_time: Some(3.4),
                        ..Default::default()
                    },
                    Utterance {
                        text: Some("Je rappelle pour la maison".to_string()),
                        participant_type: Some("external".to_string()),
                        start_time: Some(75.0),
                        ..Default::default()
                    },
                    Utterance {
                        text: Some("...".to_string()),
                        ..Default::default()
                    },
                ]),
            }),
        };
        assert_eq!(
            transcription_text(Some(&transcription)),
            "[00:03] 👤 Agent: Bonjour\n[01:15] 📞 Client: Je rappelle pour la maison\n[00:00] ❓ Inconnu: ..."
        );
    }

    #[test]
    fn test_sentiment_and_index() {
        let sentiment = Sentiment {
            id: None,
            participants: Some(vec![
                SentimentParticipant {
                    phone_number: Some("+33612345678".to_string()),
                    value: Some("POSITIVE".to_string()),
                },
                SentimentParticipant {
                    phone_number: None,
                    value: Some("MIXED".to_string()),
                },
            ]),
        };
        let text = sentiment_text(Some(&sentiment));
        assert_eq!(text, "+33612345678: 😊 Positif | Inconnu: MIXED");
        assert_eq!(sentiment_index(&text), "0");
        assert_eq!(sentiment_index("x: 😞 Négatif"), "2");
        assert_eq!(sentiment_index("Non disponible"), "1");
    }

    #[test]
    fn test_actions_and_extraction() {
        let actions = ActionItems {
            action_items: Some(vec![
                ActionItem {
                    content: Some("Envoyer le mandat".to_string()),
                    ai_generated: Some(true),
                },
                ActionItem {
                    content: Some("Rappeler demain".to_string()),
                    ai_generated: Some(false),
                },
            ]),
        };
        let text = actions_text(Some(&actions));
        assert_eq!(
            text,
            "🤖 IA: Envoyer le mandat\n👤 Agent: Rappeler demain"
        );
        assert_eq!(ai_actions(&text), vec!["Envoyer le mandat"]);
        assert!(ai_actions("🤖 IA:   \nrien").is_empty());
    }

    #[test]
    fn test_item_name() {
        let call = Call::new(77).with_raw_digits("+33612345678");
        assert_eq!(item_name(&call), "Appel #77 - 06 12 34 56 78");
        assert_eq!(item_name(&Call::new(78)), "Appel #78 - Non disponible");
    }

    #[test]
    fn test_call_column_values() {
        let mut call = Call::new(812)
            .with_raw_digits("+33612345678")
            .with_direction("inbound")
            .with_status("done");
        call.duration = Some(42);
        call.started_at = Some(1_700_000_000);
        call.cost = Some(json!(0.3));
        call.currency = Some("EUR".to_string());
        call.recording = Some("https://rec.example/812.mp3".to_string());
        call.user = Some(User {
            name: Some("Audrey BENOIT".to_string()),
            ..Default::default()
        });
        call.team = Some(Team::default());
        call.tags = Some(vec![json!("VIP"), json!({"name": "rappel"})]);

        let mut artifacts = CallArtifacts::default();
        artifacts.summary = Some(Summary {
            id: None,
            content: Some("Vendeur motivé".to_string()),
        });
        let texts = ArtifactTexts::render(&artifacts);
        let columns = CallColumns::default();
        let values = call_column_values(&call, &texts, &columns, import_date());

        let get = |f: CallField| values.get(columns.id(f)).map(String::as_str);
        assert_eq!(get(CallField::AircallId), Some("aircall_812"));
        assert_eq!(get(CallField::Direction), Some("0"));
        assert_eq!(get(CallField::Status), Some("2"));
        assert_eq!(get(CallField::Duration), Some("42"));
        assert_eq!(get(CallField::StartDate), Some("2023-11-14"));
        assert_eq!(get(CallField::EndDate), None);
        assert_eq!(get(CallField::PhoneNumber), Some("06 12 34 56 78"));
        assert_eq!(get(CallField::Transcription), Some("Non disponible"));
        assert_eq!(get(CallField::Summary), Some("Vendeur motivé"));
        assert_eq!(get(CallField::Sentiment), Some("1"));
        assert_eq!(get(CallField::ImportDate), Some("2025-06-02"));
        assert_eq!(get(CallField::Agent), Some("Audrey BENOIT"));
        assert_eq!(get(CallField::Team), Some("Équipe inconnue"));
        assert_eq!(
            get(CallField::Notes),
            Some("Appel inbound | Durée: 42 secondes | ✅ Résumé IA disponible")
        );
        assert_eq!(get(CallField::Cost), Some("0.3"));
        assert_eq!(get(CallField::Voicemail), Some("1"));
        assert_eq!(get(CallField::Tags), Some("VIP, rappel"));
        assert_eq!(get(CallField::Currency), Some("EUR"));
        assert_eq!(get(CallField::ContactName), None);
        assert_eq!(get(CallField::MissedReason), None);

        let recording: serde_json::Value =
            serde_json::from_str(get(CallField::Recording).unwrap()).unwrap();
        assert_eq!(recording["url"], "https://rec.example/812.mp3");
        assert_eq!(recording["text"], "🎵 Écouter l'enregistrement");
    }

    #[test]
    fn test_unknown_status_maps_to_initial() {
        let call = Call::new(1).with_status("ringing");
        let texts = ArtifactTexts::render(&CallArtifacts::default());
        let columns = CallColumns::default();
        let values = call_column_values(&call, &texts, &columns, import_date());
        assert_eq!(values.get(columns.id(CallField::Status)).unwrap(), "0");
        assert_eq!(values.get(columns.id(CallField::Direction)).unwrap(), "1");
        assert_eq!(values.get(columns.id(CallField::Agent)).unwrap(), "Agent inconnu");
        assert_eq!(values.get(columns.id(CallField::Recording)).unwrap(), "");
    }
}
