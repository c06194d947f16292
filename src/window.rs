use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::timestamp::MatchTime;

pub const OTHER_SLOT: &str = "other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotCategory {
    AfternoonEarly,
    AfternoonLate,
    EveningEarly,
    EveningLate,
    EveningPrime,
}

impl SlotCategory {
    pub const ALL: [SlotCategory; 5] = [
        SlotCategory::AfternoonEarly,
        SlotCategory::AfternoonLate,
        SlotCategory::EveningEarly,
        SlotCategory::EveningLate,
        SlotCategory::EveningPrime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SlotCategory::AfternoonEarly => "afternoon_early",
            SlotCategory::AfternoonLate => "afternoon_late",
            SlotCategory::EveningEarly => "evening_early",
            SlotCategory::EveningLate => "evening_late",
            SlotCategory::EveningPrime => "evening_prime",
        }
    }

    pub fn is_prime(self) -> bool {
        self.as_str().contains("prime")
    }
}

impl fmt::Display for SlotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotCategory {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        SlotCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| format!("unknown slot category: {raw}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    category: SlotCategory,
    duration_minutes: i64,
}

impl TimeWindow {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>, category: SlotCategory) -> Self {
        let duration_minutes = (end.clone() - start.clone()).num_minutes();
        Self {
            start,
            end,
            category,
            duration_minutes,
        }
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn category(&self) -> SlotCategory {
        self.category
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }

    pub fn is_prime(&self) -> bool {
        self.category.is_prime()
    }

    /// Inclusive on both ends. Naive timestamps never match: without an
    /// offset the comparison has no meaning.
    pub fn contains(&self, t: &MatchTime) -> bool {
        match t {
            MatchTime::Aware(dt) => self.contains_instant(dt),
            MatchTime::Naive(_) => false,
        }
    }

    pub fn contains_instant<T: TimeZone>(&self, t: &DateTime<T>) -> bool {
        let t = t.with_timezone(&Utc);
        self.start.with_timezone(&Utc) <= t && t <= self.end.with_timezone(&Utc)
    }

    pub fn contains_time_of_day(&self, t: NaiveTime) -> bool {
        self.start.time() <= t && t <= self.end.time()
    }

    pub fn to_record(&self) -> WindowRecord {
        WindowRecord {
            start: self.start.to_rfc3339(),
            end: self.end.to_rfc3339(),
            category: self.category.as_str().to_string(),
            duration_minutes: self.duration_minutes,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.category
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub start: String,
    pub end: String,
    pub category: String,
    pub duration_minutes: i64,
}
