use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::engine::{DateStyle, TimeEngine};
use crate::timestamp::MatchTime;
use crate::window::{OTHER_SLOT, TimeWindow, WindowRecord};

/// A fixture as handed over by the data layer. Only `date` is required;
/// fields this crate does not know are kept in `extra` untouched. Known
/// fields of an unexpected JSON type read as absent instead of failing the
/// whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_league_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub league_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_derby: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_value_bet: bool,
    #[serde(flatten)]
    pub time: TimeAnnotation,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchRecord {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }

    /// Parsed kickoff, `None` when absent or malformed.
    pub fn kickoff(&self) -> Option<MatchTime> {
        MatchTime::parse(self.date.as_deref()?).ok()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => Some(raw),
        _ => None,
    })
}

// Only numeric ids can name a major competition.
fn lenient_league_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?
        .as_u64()
        .and_then(|id| u32::try_from(id).ok()))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(false))
}

/// Derived temporal fields written onto a [`MatchRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_today: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tomorrow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<WindowRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_prime_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

pub struct MatchTimeAnnotator<'a> {
    engine: &'a TimeEngine,
}

impl<'a> MatchTimeAnnotator<'a> {
    pub fn new(engine: &'a TimeEngine) -> Self {
        Self { engine }
    }

    /// Rewrites every derived field from `date`. Records without a date are
    /// left alone; a malformed date is logged and the record kept as is.
    pub fn annotate(&self, record: &mut MatchRecord) {
        let Some(raw) = record.date.as_deref() else {
            return;
        };
        let kickoff = match MatchTime::parse(raw) {
            Ok(kickoff) => kickoff,
            Err(err) => {
                log::error!("time annotation skipped: {err}");
                return;
            }
        };

        let engine = self.engine;
        let local = engine.normalize(&kickoff);
        let offset = engine.days_from_today(local.date_naive());
        let window = engine.classify_time(&kickoff);

        record.time = TimeAnnotation {
            formatted_time: Some(engine.format_time(kickoff, None)),
            formatted_date: Some(engine.format_date(kickoff, DateStyle::Default)),
            day_name: Some(engine.day_name(kickoff, false)),
            is_today: Some(offset == 0),
            is_tomorrow: Some(offset == 1),
            time_window: window.map(TimeWindow::to_record),
            time_slot: window.map(|w| w.category().as_str().to_string()),
            is_prime_time: Some(window.is_some_and(TimeWindow::is_prime)),
            local_time: Some(kickoff.wall_clock().format("%H:%M").to_string()),
            timezone: Some(engine.timezone_name().to_string()),
        };
    }

    pub fn annotate_all(&self, records: &mut [MatchRecord]) {
        for record in records.iter_mut() {
            self.annotate(record);
        }
    }

    /// Partitions by slot label (`"other"` when unclassified) and stamps
    /// `time_slot`, `formatted_time` and a compact `formatted_date` on each
    /// record. Records without a usable date are dropped.
    pub fn group_by_slot<'m>(
        &self,
        records: &'m mut [MatchRecord],
    ) -> BTreeMap<String, Vec<&'m MatchRecord>> {
        let mut grouped: BTreeMap<String, Vec<&'m MatchRecord>> = BTreeMap::new();
        for record in records.iter_mut() {
            let Some(kickoff) = record.kickoff() else {
                continue;
            };
            let slot = self
                .engine
                .classify_time(&kickoff)
                .map(|w| w.category().as_str())
                .unwrap_or(OTHER_SLOT);

            record.time.time_slot = Some(slot.to_string());
            record.time.formatted_time = Some(self.engine.format_time(kickoff, None));
            record.time.formatted_date = Some(self.engine.format_date(kickoff, DateStyle::Compact));

            let record: &'m MatchRecord = record;
            grouped.entry(slot.to_string()).or_default().push(record);
        }
        grouped
    }

    pub fn filter_prime_time<'m>(&self, records: &'m [MatchRecord]) -> Vec<&'m MatchRecord> {
        records
            .iter()
            .filter(|record| {
                record
                    .kickoff()
                    .and_then(|kickoff| self.engine.classify_time(&kickoff))
                    .is_some_and(TimeWindow::is_prime)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = r#"{"date":"2024-05-04T18:00:00Z","league_id":39,"home":"LIV","odds":{"home":1.9}}"#;
        let record: MatchRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.league_id, Some(39));
        assert!(!record.is_derby);
        assert_eq!(record.extra.get("home"), Some(&Value::from("LIV")));
        assert!(record.extra.contains_key("odds"));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["home"], "LIV");
        assert!(back.get("time_slot").is_none());
    }

    #[test]
    fn annotation_fields_are_read_back_into_place() {
        let raw = r#"{"date":"2024-05-04T18:00:00Z","time_slot":"evening_prime","is_prime_time":true}"#;
        let record: MatchRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.time.time_slot.as_deref(), Some("evening_prime"));
        assert_eq!(record.time.is_prime_time, Some(true));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn mistyped_known_fields_read_as_absent() {
        let raw = r#"{"date":1714847400,"league_id":"ligue-1","is_derby":null,"is_value_bet":"yes","home":"OL"}"#;
        let record: MatchRecord = serde_json::from_str(raw).unwrap();
        assert!(record.date.is_none());
        assert!(record.league_id.is_none());
        assert!(!record.is_derby);
        assert!(!record.is_value_bet);
        assert_eq!(record.extra.get("home"), Some(&Value::from("OL")));

        let negative: MatchRecord = serde_json::from_str(r#"{"league_id":-3}"#).unwrap();
        assert!(negative.league_id.is_none());
        let huge: MatchRecord = serde_json::from_str(r#"{"league_id":99999999999}"#).unwrap();
        assert!(huge.league_id.is_none());
    }

    #[test]
    fn kickoff_ignores_malformed_dates() {
        assert!(MatchRecord::new("not a date").kickoff().is_none());
        assert!(MatchRecord::default().kickoff().is_none());
        assert!(MatchRecord::new("2024-05-04 20:00").kickoff().is_some());
    }
}
