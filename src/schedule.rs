use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;

use crate::window::{SlotCategory, TimeWindow};

type SlotDef = (u32, u32, u32, u32, SlotCategory);

const MIDWEEK: &[SlotDef] = &[
    (18, 45, 20, 45, SlotCategory::EveningEarly),
    (20, 45, 22, 45, SlotCategory::EveningLate),
];

const FRIDAY: &[SlotDef] = &[
    (19, 0, 21, 0, SlotCategory::EveningPrime),
    (21, 0, 23, 0, SlotCategory::EveningLate),
];

const SATURDAY: &[SlotDef] = &[
    (13, 30, 15, 30, SlotCategory::AfternoonEarly),
    (15, 30, 17, 30, SlotCategory::AfternoonLate),
    (18, 0, 20, 0, SlotCategory::EveningEarly),
    (20, 0, 22, 0, SlotCategory::EveningPrime),
];

const SUNDAY: &[SlotDef] = &[
    (13, 0, 15, 0, SlotCategory::AfternoonEarly),
    (15, 0, 17, 0, SlotCategory::AfternoonLate),
    (17, 0, 19, 0, SlotCategory::EveningEarly),
    (20, 45, 22, 45, SlotCategory::EveningLate),
];

// Monday first.
const STANDARD_CALENDAR: [&[SlotDef]; 7] = [
    MIDWEEK, MIDWEEK, MIDWEEK, MIDWEEK, FRIDAY, SATURDAY, SUNDAY,
];

#[derive(Debug, Clone)]
pub struct WeeklyScheduleTable {
    days: [Vec<TimeWindow>; 7],
    by_category: BTreeMap<SlotCategory, Vec<(Weekday, TimeWindow)>>,
}

impl WeeklyScheduleTable {
    pub fn standard(tz: Tz, anchor: NaiveDate) -> Self {
        let days: [Vec<TimeWindow>; 7] = std::array::from_fn(|idx| {
            let mut windows: Vec<TimeWindow> = STANDARD_CALENDAR[idx]
                .iter()
                .map(|def| build_window(tz, anchor, def))
                .collect();
            windows.sort_by_key(|w| w.start().time());
            windows
        });

        let mut by_category: BTreeMap<SlotCategory, Vec<(Weekday, TimeWindow)>> = BTreeMap::new();
        for (idx, windows) in days.iter().enumerate() {
            let weekday = weekday_from_index(idx);
            for window in windows {
                by_category
                    .entry(window.category())
                    .or_default()
                    .push((weekday, window.clone()));
            }
        }

        Self { days, by_category }
    }

    pub fn windows_for(&self, weekday: Weekday) -> &[TimeWindow] {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn windows_in_category(&self, category: SlotCategory) -> &[(Weekday, TimeWindow)] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn prime_time_windows(&self) -> Vec<(Weekday, &TimeWindow)> {
        self.by_category
            .iter()
            .filter(|(category, _)| category.is_prime())
            .flat_map(|(_, entries)| entries.iter().map(|(day, w)| (*day, w)))
            .collect()
    }

    pub fn categories(&self) -> Vec<SlotCategory> {
        self.by_category.keys().copied().collect()
    }

    /// First window of `weekday` whose `[start, end]` holds `time`.
    pub fn lookup(&self, weekday: Weekday, time: NaiveTime) -> Option<&TimeWindow> {
        self.windows_for(weekday)
            .iter()
            .find(|w| w.contains_time_of_day(time))
    }

    pub fn len(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_window(tz: Tz, anchor: NaiveDate, def: &SlotDef) -> TimeWindow {
    let &(sh, sm, eh, em, category) = def;
    let start = anchor_at(tz, anchor, sh, sm);
    let end = anchor_at(tz, anchor, eh, em);
    TimeWindow::new(start, end, category)
}

fn anchor_at(tz: Tz, anchor: NaiveDate, hour: u32, minute: u32) -> chrono::DateTime<Tz> {
    let naive = anchor.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default());
    // Calendar hours never fall in a DST gap; the UTC fallback only guards odd zones.
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

fn weekday_from_index(idx: usize) -> Weekday {
    match idx {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
