//! In-memory automation schedule.
//!
//! Each automation runs at fixed local hours on selected weekdays. The
//! table lives for the lifetime of the process; updates are not persisted.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::automation::Automation;
use crate::error::{Result, SyncError};

const WEEKDAYS: [u32; 5] = [1, 2, 3, 4, 5];

/// When one automation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub enabled: bool,
    /// Free-form label shown to operators (`hourly`, `2hourly`, ...).
    pub frequency: String,
    /// Local hours, 0 to 23.
    pub hours: Vec<u32>,
    /// ISO weekdays, 1 (Monday) to 7 (Sunday).
    pub days: Vec<u32>,
}

impl ScheduleEntry {
    pub fn new(frequency: impl Into<String>, hours: Vec<u32>) -> Self {
        Self {
            enabled: true,
            frequency: frequency.into(),
            hours,
            days: WEEKDAYS.to_vec(),
        }
    }

    /// True when enabled and `now` falls on a scheduled day and hour.
    pub fn should_run(&self, now: NaiveDateTime) -> bool {
        self.enabled
            && self.days.contains(&now.weekday().number_from_monday())
            && self.hours.contains(&now.hour())
    }

    /// `Today at H:00`, `Tomorrow at H:00` or `disabled`.
    ///
    /// Only hours are considered: the next day may not be a scheduled day.
    pub fn next_run(&self, now: NaiveDateTime) -> String {
        if !self.enabled {
            return "disabled".to_string();
        }
        let hour = now.hour();
        if let Some(next) = self.hours.iter().filter(|h| **h > hour).min() {
            return format!("Today at {}:00", next);
        }
        match self.hours.iter().min() {
            Some(first) => format!("Tomorrow at {}:00", first),
            None => "disabled".to_string(),
        }
    }

    fn apply(&mut self, patch: SchedulePatch) -> Result<()> {
        if let Some(hours) = &patch.hours {
            if let Some(bad) = hours.iter().find(|h| **h > 23) {
                return Err(SyncError::InvalidSchedule(format!("hour {} out of range", bad)));
            }
        }
        if let Some(days) = &patch.days {
            if let Some(bad) = days.iter().find(|d| !(1..=7).contains(*d)) {
                return Err(SyncError::InvalidSchedule(format!("day {} out of range", bad)));
            }
        }

        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
        if let Some(mut hours) = patch.hours {
            hours.sort_unstable();
            hours.dedup();
            self.hours = hours;
        }
        if let Some(mut days) = patch.days {
            days.sort_unstable();
            days.dedup();
            self.days = days;
        }
        Ok(())
    }
}

/// Partial update of a schedule entry. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePatch {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub hours: Option<Vec<u32>>,
    #[serde(default)]
    pub days: Option<Vec<u32>>,
}

/// Entry as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryStatus {
    pub automation: Automation,
    #[serde(flatten)]
    pub entry: ScheduleEntry,
    pub should_run: bool,
    pub next_run: String,
}

/// Schedule table, in check order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    entries: Vec<(Automation, ScheduleEntry)>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            entries: vec![
                (Automation::Sync, ScheduleEntry::new("hourly", (9..=18).collect())),
                (Automation::Tasks, ScheduleEntry::new("2hourly", vec![9, 11, 13, 15, 17])),
                (Automation::Assign, ScheduleEntry::new("4hourly", vec![9, 13, 17])),
                (Automation::Link, ScheduleEntry::new("6hourly", vec![10, 16])),
                (Automation::Relations, ScheduleEntry::new("daily", vec![12])),
            ],
        }
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, automation: Automation) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|(a, _)| *a == automation)
            .map(|(_, e)| e)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Automation, &ScheduleEntry)> + '_ {
        self.entries.iter().map(|(a, e)| (*a, e))
    }

    /// Applies a patch and returns the updated entry.
    pub fn update(&mut self, automation: Automation, patch: SchedulePatch) -> Result<&ScheduleEntry> {
        let entry = self
            .entries
            .iter_mut()
            .find(|(a, _)| *a == automation)
            .map(|(_, e)| e)
            .ok_or_else(|| SyncError::UnknownAutomation(automation.to_string()))?;
        entry.apply(patch)?;
        Ok(entry)
    }

    /// Automations due at `now`, in check order.
    pub fn due(&self, now: NaiveDateTime) -> Vec<Automation> {
        self.entries()
            .filter(|(_, e)| e.should_run(now))
            .map(|(a, _)| a)
            .collect()
    }

    pub fn status(&self, now: NaiveDateTime) -> Vec<EntryStatus> {
        self.entries()
            .map(|(automation, entry)| EntryStatus {
                automation,
                entry: entry.clone(),
                should_run: entry.should_run(now),
                next_run: entry.next_run(now),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        // June 2025: the 2nd is a Monday, the 7th a Saturday
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_should_run_checks_day_and_hour() {
        let schedule = Schedule::new();
        let sync = schedule.get(Automation::Sync).unwrap();
        assert!(sync.should_run(at(2, 9)));
        assert!(sync.should_run(at(6, 18)));
        assert!(!sync.should_run(at(2, 19)));
        assert!(!sync.should_run(at(7, 10)));
    }

    #[test]
    fn test_due_in_check_order() {
        let schedule = Schedule::new();
        assert_eq!(
            schedule.due(at(2, 9)),
            vec![Automation::Sync, Automation::Tasks, Automation::Assign]
        );
        assert_eq!(schedule.due(at(2, 12)), vec![Automation::Sync, Automation::Relations]);
        assert!(schedule.due(at(8, 12)).is_empty());
    }

    #[test]
    fn test_next_run() {
        let schedule = Schedule::new();
        let link = schedule.get(Automation::Link).unwrap();
        assert_eq!(link.next_run(at(2, 8)), "Today at 10:00");
        assert_eq!(link.next_run(at(2, 10)), "Today at 16:00");
        assert_eq!(link.next_run(at(2, 17)), "Tomorrow at 10:00");
    }

    #[test]
    fn test_update_merges_fields() {
        let mut schedule = Schedule::new();
        let entry = schedule
            .update(
                Automation::Relations,
                SchedulePatch {
                    hours: Some(vec![15, 8, 15]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(entry.hours, vec![8, 15]);
        assert_eq!(entry.frequency, "daily");
        assert!(entry.enabled);

        schedule
            .update(
                Automation::Relations,
                SchedulePatch {
                    enabled: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        let relations = schedule.get(Automation::Relations).unwrap();
        assert_eq!(relations.next_run(at(2, 9)), "disabled");
        assert!(!relations.should_run(at(2, 15)));
    }

    #[test]
    fn test_update_rejects_bad_values() {
        let mut schedule = Schedule::new();
        assert!(matches!(
            schedule.update(
                Automation::Sync,
                SchedulePatch {
                    hours: Some(vec![24]),
                    ..Default::default()
                }
            ),
            Err(SyncError::InvalidSchedule(_))
        ));
        assert!(matches!(
            schedule.update(
                Automation::Sync,
                SchedulePatch {
                    days: Some(vec![0]),
                    ..Default::default()
                }
            ),
            Err(SyncError::InvalidSchedule(_))
        ));
        assert!(matches!(
            schedule.update(Automation::Full, SchedulePatch::default()),
            Err(SyncError::UnknownAutomation(_))
        ));
    }

    #[test]
    fn test_empty_hours_never_run() {
        let entry = ScheduleEntry::new("manual", vec![]);
        assert!(!entry.should_run(at(2, 9)));
        assert_eq!(entry.next_run(at(2, 9)), "disabled");
    }

    #[test]
    fn test_patch_ignores_unknown_fields() {
        let patch: SchedulePatch =
            serde_json::from_str(r#"{"enabled": false, "endpoint": "/api/x"}"#).unwrap();
        assert_eq!(patch.enabled, Some(false));
        assert_eq!(patch.hours, None);
    }
}
