use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::TimeError;

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTime {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl MatchTime {
    pub fn parse(raw: &str) -> Result<Self, TimeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TimeError::format(raw));
        }
        let normalized = match trimmed.strip_suffix(['Z', 'z']) {
            Some(head) => format!("{head}+00:00"),
            None => trimmed.to_string(),
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
            return Ok(MatchTime::Aware(dt));
        }
        for fmt in AWARE_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
                return Ok(MatchTime::Aware(dt));
            }
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
                return Ok(MatchTime::Naive(dt));
            }
        }
        if let Ok(day) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
            && let Some(midnight) = day.and_hms_opt(0, 0, 0)
        {
            return Ok(MatchTime::Naive(midnight));
        }
        Err(TimeError::format(raw))
    }

    pub fn wall_clock(&self) -> NaiveDateTime {
        match self {
            MatchTime::Aware(dt) => dt.naive_local(),
            MatchTime::Naive(naive) => *naive,
        }
    }

    pub fn is_aware(&self) -> bool {
        matches!(self, MatchTime::Aware(_))
    }
}

pub trait IntoMatchTime {
    fn into_match_time(self) -> Result<MatchTime, TimeError>;
}

impl IntoMatchTime for MatchTime {
    fn into_match_time(self) -> Result<MatchTime, TimeError> {
        Ok(self)
    }
}

impl IntoMatchTime for &MatchTime {
    fn into_match_time(self) -> Result<MatchTime, TimeError> {
        Ok(*self)
    }
}

impl IntoMatchTime for &str {
    fn into_match_time(self) -> Result<MatchTime, TimeError> {
        MatchTime::parse(self)
    }
}

impl IntoMatchTime for &String {
    fn into_match_time(self) -> Result<MatchTime, TimeError> {
        MatchTime::parse(self)
    }
}

impl IntoMatchTime for String {
    fn into_match_time(self) -> Result<MatchTime, TimeError> {
        MatchTime::parse(&self)
    }
}

impl IntoMatchTime for NaiveDateTime {
    fn into_match_time(self) -> Result<MatchTime, TimeError> {
        Ok(MatchTime::Naive(self))
    }
}

impl<T: TimeZone> IntoMatchTime for DateTime<T> {
    fn into_match_time(self) -> Result<MatchTime, TimeError> {
        Ok(MatchTime::Aware(self.fixed_offset()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn z_suffix_is_utc() {
        let parsed = MatchTime::parse("2024-05-04T19:00:00Z").unwrap();
        let MatchTime::Aware(dt) = parsed else {
            panic!("expected aware timestamp");
        };
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.hour(), 19);
    }

    #[test]
    fn accepts_common_iso_shapes() {
        for raw in [
            "2024-05-04T19:00:00+02:00",
            "2024-05-04 19:00:00+02:00",
            "2024-05-04T19:00:00.000Z",
            "2024-05-04T19:00+02:00",
        ] {
            assert!(MatchTime::parse(raw).unwrap().is_aware(), "{raw}");
        }
        for raw in ["2024-05-04T19:00:00", "2024-05-04 19:00", "2024-05-04"] {
            assert!(!MatchTime::parse(raw).unwrap().is_aware(), "{raw}");
        }
    }

    #[test]
    fn date_only_is_midnight() {
        let parsed = MatchTime::parse("2024-05-04").unwrap();
        assert_eq!(parsed.wall_clock().hour(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            MatchTime::parse("tomorrow-ish"),
            Err(TimeError::format("tomorrow-ish"))
        );
        assert!(MatchTime::parse("").is_err());
        assert!(MatchTime::parse("2024-13-40T10:00:00Z").is_err());
    }
}
