use std::str::FromStr;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

const DAYS_EN: [(&str, &str); 7] = [
    ("Monday", "Mon"),
    ("Tuesday", "Tue"),
    ("Wednesday", "Wed"),
    ("Thursday", "Thu"),
    ("Friday", "Fri"),
    ("Saturday", "Sat"),
    ("Sunday", "Sun"),
];

const DAYS_FR: [(&str, &str); 7] = [
    ("Lundi", "Lun"),
    ("Mardi", "Mar"),
    ("Mercredi", "Mer"),
    ("Jeudi", "Jeu"),
    ("Vendredi", "Ven"),
    ("Samedi", "Sam"),
    ("Dimanche", "Dim"),
];

const MONTHS_EN: [(&str, &str); 12] = [
    ("January", "Jan"),
    ("February", "Feb"),
    ("March", "Mar"),
    ("April", "Apr"),
    ("May", "May"),
    ("June", "Jun"),
    ("July", "Jul"),
    ("August", "Aug"),
    ("September", "Sep"),
    ("October", "Oct"),
    ("November", "Nov"),
    ("December", "Dec"),
];

const MONTHS_FR: [(&str, &str); 12] = [
    ("Janvier", "Jan"),
    ("Février", "Fév"),
    ("Mars", "Mar"),
    ("Avril", "Avr"),
    ("Mai", "Mai"),
    ("Juin", "Juin"),
    ("Juillet", "Juil"),
    ("Août", "Août"),
    ("Septembre", "Sept"),
    ("Octobre", "Oct"),
    ("Novembre", "Nov"),
    ("Décembre", "Déc"),
];

#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub today: &'static str,
    pub tomorrow: &'static str,
    pub day_after_tomorrow: &'static str,
    pub finished: &'static str,
    pub unavailable: &'static str,
    pub days_suffix: &'static str,
}

const LABELS_EN: Labels = Labels {
    today: "Today",
    tomorrow: "Tomorrow",
    day_after_tomorrow: "Day after tomorrow",
    finished: "Finished",
    unavailable: "N/A",
    days_suffix: "d",
};

const LABELS_FR: Labels = Labels {
    today: "Aujourd'hui",
    tomorrow: "Demain",
    day_after_tomorrow: "Après-demain",
    finished: "Terminé",
    unavailable: "N/A",
    days_suffix: "j",
};

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::En => &LABELS_EN,
            Locale::Fr => &LABELS_FR,
        }
    }

    pub fn weekday_name(self, day: Weekday, short: bool) -> &'static str {
        let table = match self {
            Locale::En => &DAYS_EN,
            Locale::Fr => &DAYS_FR,
        };
        pick(table[day.num_days_from_monday() as usize], short)
    }

    pub fn month_name(self, date: &impl Datelike, short: bool) -> &'static str {
        let table = match self {
            Locale::En => &MONTHS_EN,
            Locale::Fr => &MONTHS_FR,
        };
        pick(table[date.month0() as usize], short)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "fr" | "french" | "francais" => Ok(Locale::Fr),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

fn pick(entry: (&'static str, &'static str), short: bool) -> &'static str {
    if short { entry.1 } else { entry.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn names_follow_locale_and_abbreviation() {
        assert_eq!(Locale::En.weekday_name(Weekday::Sat, false), "Saturday");
        assert_eq!(Locale::En.weekday_name(Weekday::Sat, true), "Sat");
        assert_eq!(Locale::Fr.weekday_name(Weekday::Sun, true), "Dim");
        let date = NaiveDate::from_ymd_opt(2024, 8, 3).unwrap();
        assert_eq!(Locale::En.month_name(&date, false), "August");
        assert_eq!(Locale::Fr.month_name(&date, true), "Août");
    }

    #[test]
    fn parses_locale_codes() {
        assert_eq!("FR".parse::<Locale>(), Ok(Locale::Fr));
        assert_eq!("english".parse::<Locale>(), Ok(Locale::En));
        assert!("de".parse::<Locale>().is_err());
    }
}
