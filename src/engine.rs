use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::config::{DisplayFormat, EngineConfig};
use crate::error::TimeError;
use crate::locale::Locale;
use crate::schedule::WeeklyScheduleTable;
pub use crate::timestamp::{IntoMatchTime, MatchTime};
use crate::window::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    Full,
    Short,
    DayOnly,
    Compact,
    #[default]
    Default,
}

impl From<&str> for DateStyle {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full" => DateStyle::Full,
            "short" => DateStyle::Short,
            "day_only" => DateStyle::DayOnly,
            "compact" => DateStyle::Compact,
            _ => DateStyle::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub preferred_timezone: String,
    pub display_format: DisplayFormat,
    pub favorite_time_slots: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub preferred_timezone: Option<String>,
    #[serde(default)]
    pub display_format: Option<DisplayFormat>,
    #[serde(default)]
    pub favorite_time_slots: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingDay {
    pub date: String,
    pub day: u32,
    pub month: u32,
    pub month_name: String,
    pub day_name: String,
    pub display_name: String,
    pub is_weekend: bool,
    pub formatted_date: String,
}

/// Every "now" reading goes through the injected [`Clock`] at call time.
/// The snapshot returned by [`TimeEngine::current_time`] only moves on
/// [`TimeEngine::update_current_time`] and on a timezone switch; nothing
/// else reads it.
pub struct TimeEngine {
    timezone: Tz,
    clock: Box<dyn Clock>,
    snapshot: DateTime<Tz>,
    schedule: WeeklyScheduleTable,
    preferences: UserPreferences,
    locale: Locale,
}

impl TimeEngine {
    pub fn new(config: EngineConfig) -> Result<Self, TimeError> {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: EngineConfig, clock: impl Clock + 'static) -> Result<Self, TimeError> {
        let timezone = parse_timezone(&config.timezone)?;
        let clock: Box<dyn Clock> = Box::new(clock);
        let snapshot = clock.now().with_timezone(&timezone);
        let schedule = WeeklyScheduleTable::standard(timezone, snapshot.date_naive());
        log::info!(
            "time engine ready: timezone={} windows={}",
            timezone.name(),
            schedule.len()
        );
        Ok(Self {
            timezone,
            clock,
            snapshot,
            schedule,
            preferences: UserPreferences {
                preferred_timezone: timezone.name().to_string(),
                display_format: config.display_format,
                favorite_time_slots: BTreeSet::new(),
            },
            locale: config.locale,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn timezone_name(&self) -> &'static str {
        self.timezone.name()
    }

    pub fn schedule(&self) -> &WeeklyScheduleTable {
        &self.schedule
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn user_preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.timezone)
    }

    pub fn current_time(&self) -> DateTime<Tz> {
        self.snapshot.clone()
    }

    pub fn update_current_time(&mut self) -> DateTime<Tz> {
        self.snapshot = self.now();
        self.snapshot.clone()
    }

    pub fn set_timezone(&mut self, name: &str) -> Result<(), TimeError> {
        let timezone = match parse_timezone(name) {
            Ok(tz) => tz,
            Err(err) => {
                log::error!("timezone change rejected: {err}");
                return Err(err);
            }
        };
        self.timezone = timezone;
        self.preferences.preferred_timezone = timezone.name().to_string();
        self.update_current_time();
        log::info!("timezone changed to {}", timezone.name());
        Ok(())
    }

    /// Applies a JSON preferences object. Unrecognised keys are ignored; a
    /// wrongly typed recognised key or an unknown timezone rejects the whole
    /// update.
    pub fn set_user_preferences(&mut self, payload: &Value) -> Result<(), TimeError> {
        if !payload.is_object() {
            return Err(TimeError::Preferences(
                "preferences must be a JSON object".to_string(),
            ));
        }
        let update = serde_json::from_value::<PreferencesUpdate>(payload.clone()).map_err(|err| {
            log::error!("preferences update rejected: {err}");
            TimeError::Preferences(err.to_string())
        })?;
        self.update_preferences(update)
    }

    pub fn update_preferences(&mut self, update: PreferencesUpdate) -> Result<(), TimeError> {
        if let Some(name) = update.preferred_timezone.as_deref() {
            self.set_timezone(name)?;
        }
        if let Some(format) = update.display_format {
            self.preferences.display_format = format;
        }
        if let Some(slots) = update.favorite_time_slots {
            self.preferences.favorite_time_slots = slots;
        }
        Ok(())
    }

    pub fn normalize(&self, time: &MatchTime) -> DateTime<Tz> {
        match time {
            MatchTime::Aware(dt) => dt.with_timezone(&self.timezone),
            MatchTime::Naive(naive) => localize(self.timezone, *naive),
        }
    }

    pub fn resolve<I: IntoMatchTime>(&self, input: I) -> Result<DateTime<Tz>, TimeError> {
        input.into_match_time().map(|t| self.normalize(&t))
    }

    pub fn classify<I: IntoMatchTime>(&self, input: I) -> Option<&TimeWindow> {
        match input.into_match_time() {
            Ok(time) => self.classify_time(&time),
            Err(err) => {
                log::error!("cannot classify kickoff: {err}");
                None
            }
        }
    }

    pub fn classify_time(&self, time: &MatchTime) -> Option<&TimeWindow> {
        let local = self.normalize(time);
        self.schedule.lookup(local.weekday(), local.time())
    }

    pub fn format_time<I: IntoMatchTime>(&self, input: I, format: Option<DisplayFormat>) -> String {
        let local = match self.resolve(input) {
            Ok(local) => local,
            Err(err) => return fallback_text(err),
        };
        match format.unwrap_or(self.preferences.display_format) {
            DisplayFormat::H12 => local.format("%I:%M %p").to_string(),
            DisplayFormat::H24 => local.format("%H:%M").to_string(),
        }
    }

    pub fn format_date<I: IntoMatchTime>(&self, input: I, style: DateStyle) -> String {
        let local = match self.resolve(input) {
            Ok(local) => local,
            Err(err) => return fallback_text(err),
        };
        let date = local.date_naive();
        let offset = self.days_from_today(date);
        let labels = self.locale.labels();
        let weekday = self.locale.weekday_name(date.weekday(), false);
        let month = self.locale.month_name(&date, false);

        let relative = |with_day_after: bool| match offset {
            0 => Some(labels.today),
            1 => Some(labels.tomorrow),
            2 if with_day_after => Some(labels.day_after_tomorrow),
            _ => None,
        };

        match style {
            DateStyle::Full => {
                let day_text = relative(true).unwrap_or(weekday);
                format!("{day_text} {} {month}", date.day())
            }
            DateStyle::Short => {
                let day_text = relative(false).unwrap_or(weekday);
                format!("{day_text} {}/{}", date.day(), date.month())
            }
            DateStyle::DayOnly => relative(true).unwrap_or(weekday).to_string(),
            DateStyle::Compact => match relative(true) {
                Some(label) => label.to_string(),
                None => format!(
                    "{} {}/{}",
                    self.locale.weekday_name(date.weekday(), true),
                    date.day(),
                    date.month()
                ),
            },
            DateStyle::Default => format!("{} {month}", date.day()),
        }
    }

    pub fn day_name<I: IntoMatchTime>(&self, input: I, short: bool) -> String {
        self.resolve(input)
            .map(|local| self.locale.weekday_name(local.weekday(), short).to_string())
            .unwrap_or_default()
    }

    pub fn month_name<I: IntoMatchTime>(&self, input: I, short: bool) -> String {
        self.resolve(input)
            .map(|local| self.locale.month_name(&local.date_naive(), short).to_string())
            .unwrap_or_default()
    }

    pub fn format_countdown<I: IntoMatchTime>(&self, input: I) -> String {
        let labels = self.locale.labels();
        let target = match self.resolve(input) {
            Ok(target) => target.with_timezone(&Utc),
            Err(_) => return labels.unavailable.to_string(),
        };
        let remaining = target - self.clock.now();
        if remaining < Duration::zero() {
            return labels.finished.to_string();
        }
        let secs = remaining.num_seconds();
        let days = secs / 86_400;
        let hours = (secs % 86_400) / 3_600;
        let minutes = (secs % 3_600) / 60;
        if days > 0 {
            format!("{days}{} {hours}h", labels.days_suffix)
        } else if hours > 0 {
            format!("{hours}h {minutes}min")
        } else {
            format!("{minutes}min")
        }
    }

    pub fn days_from_today(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.now().date_naive()).num_days()
    }

    pub fn is_today<I: IntoMatchTime>(&self, input: I) -> bool {
        self.resolve(input)
            .is_ok_and(|local| self.days_from_today(local.date_naive()) == 0)
    }

    pub fn is_tomorrow<I: IntoMatchTime>(&self, input: I) -> bool {
        self.resolve(input)
            .is_ok_and(|local| self.days_from_today(local.date_naive()) == 1)
    }

    pub fn upcoming_days(&self, count: usize) -> Vec<UpcomingDay> {
        let labels = self.locale.labels();
        let today = self.now().date_naive();
        today
            .iter_days()
            .take(count)
            .enumerate()
            .map(|(idx, date)| {
                let day_name = self.locale.weekday_name(date.weekday(), true);
                let month_name = self.locale.month_name(&date, true);
                let display_name = match idx {
                    0 => labels.today,
                    1 => labels.tomorrow,
                    _ => day_name,
                };
                UpcomingDay {
                    date: date.format("%Y-%m-%d").to_string(),
                    day: date.day(),
                    month: date.month(),
                    month_name: month_name.to_string(),
                    day_name: day_name.to_string(),
                    display_name: display_name.to_string(),
                    is_weekend: date.weekday().num_days_from_monday() >= 5,
                    formatted_date: format!("{} {month_name}", date.day()),
                }
            })
            .collect()
    }
}

fn parse_timezone(name: &str) -> Result<Tz, TimeError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TimeError::configuration(name))
}

fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt;
    }
    // Inside a DST gap: step past it.
    tz.from_local_datetime(&(naive + Duration::hours(1)))
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

fn fallback_text(err: TimeError) -> String {
    match err {
        TimeError::Format { input } => input,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, Timelike};
    use chrono_tz::Europe::Paris;

    #[test]
    fn naive_times_are_localized_not_converted() {
        let naive = NaiveDate::from_ymd_opt(2024, 5, 4)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        let local = localize(Paris, naive);
        assert_eq!(local.hour(), 19);
        assert_eq!(local.offset().fix().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn dst_gap_steps_forward() {
        let in_gap = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let local = localize(Paris, in_gap);
        assert_eq!(local.hour(), 3);
        assert_eq!(local.minute(), 30);
    }

    #[test]
    fn style_names_fall_back_to_default() {
        assert_eq!(DateStyle::from("compact"), DateStyle::Compact);
        assert_eq!(DateStyle::from("DAY_ONLY"), DateStyle::DayOnly);
        assert_eq!(DateStyle::from("weird"), DateStyle::Default);
    }

    #[test]
    fn unknown_timezone_is_a_configuration_error() {
        assert_eq!(
            parse_timezone("Mars/Olympus"),
            Err(TimeError::configuration("Mars/Olympus"))
        );
        assert!(parse_timezone(" America/New_York ").is_ok());
    }
}
