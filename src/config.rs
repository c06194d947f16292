use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";

/// API-Football ids: Premier League, La Liga, Ligue 1, Bundesliga, Serie A,
/// Champions League.
pub const DEFAULT_MAJOR_LEAGUE_IDS: &[u32] = &[39, 140, 61, 78, 135, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayFormat {
    #[serde(rename = "12h")]
    H12,
    #[default]
    #[serde(rename = "24h")]
    H24,
}

impl DisplayFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayFormat::H12 => "12h",
            DisplayFormat::H24 => "24h",
        }
    }
}

impl FromStr for DisplayFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "12h" | "12" => Ok(DisplayFormat::H12),
            "24h" | "24" => Ok(DisplayFormat::H24),
            other => Err(format!("unsupported display format: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub timezone: String,
    pub display_format: DisplayFormat,
    pub locale: Locale,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            display_format: DisplayFormat::default(),
            locale: Locale::default(),
        }
    }
}

impl EngineConfig {
    /// Reads `ARCAN_TIMEZONE`, `ARCAN_DISPLAY_FORMAT` and `ARCAN_LOCALE`.
    /// Missing or unparseable values keep the defaults; the timezone itself
    /// is validated when the engine is built.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(tz) = non_empty(lookup("ARCAN_TIMEZONE")) {
            cfg.timezone = tz;
        }
        if let Some(format) = non_empty(lookup("ARCAN_DISPLAY_FORMAT")) {
            match format.parse() {
                Ok(parsed) => cfg.display_format = parsed,
                Err(err) => log::warn!("ignoring ARCAN_DISPLAY_FORMAT: {err}"),
            }
        }
        if let Some(locale) = non_empty(lookup("ARCAN_LOCALE")) {
            match locale.parse() {
                Ok(parsed) => cfg.locale = parsed,
                Err(err) => log::warn!("ignoring ARCAN_LOCALE: {err}"),
            }
        }
        cfg
    }
}

/// Major competition ids from `ARCAN_MAJOR_LEAGUE_IDS`. An empty value
/// disables the major-competition criterion.
pub fn major_league_ids_from_env() -> Vec<u32> {
    major_league_ids_from_lookup(|key| env::var(key).ok())
}

pub fn major_league_ids_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Vec<u32> {
    parse_ids_or_default(lookup("ARCAN_MAJOR_LEAGUE_IDS"), DEFAULT_MAJOR_LEAGUE_IDS)
}

fn parse_ids_or_default(raw: Option<String>, default_ids: &[u32]) -> Vec<u32> {
    match raw {
        Some(raw) => parse_ids(&raw),
        None => default_ids.to_vec(),
    }
}

pub fn parse_ids(raw: &str) -> Vec<u32> {
    raw.split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_lists_with_mixed_separators() {
        assert_eq!(parse_ids("39, 140;61 78"), vec![39, 140, 61, 78]);
        assert!(parse_ids("").is_empty());
        assert_eq!(parse_ids("x,2"), vec![2]);
    }

    #[test]
    fn display_format_round_trips_through_serde() {
        let json = serde_json::to_string(&DisplayFormat::H12).unwrap();
        assert_eq!(json, "\"12h\"");
        let parsed: DisplayFormat = serde_json::from_str("\"24h\"").unwrap();
        assert_eq!(parsed, DisplayFormat::H24);
        assert_eq!("12H".parse::<DisplayFormat>(), Ok(DisplayFormat::H12));
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(EngineConfig::from_lookup(lookup(&[])), EngineConfig::default());
        assert_eq!(
            major_league_ids_from_lookup(lookup(&[])),
            DEFAULT_MAJOR_LEAGUE_IDS.to_vec()
        );
    }

    #[test]
    fn environment_overrides_apply() {
        let cfg = EngineConfig::from_lookup(lookup(&[
            ("ARCAN_TIMEZONE", " America/New_York "),
            ("ARCAN_DISPLAY_FORMAT", "12h"),
            ("ARCAN_LOCALE", "fr"),
        ]));
        assert_eq!(cfg.timezone, "America/New_York");
        assert_eq!(cfg.display_format, DisplayFormat::H12);
        assert_eq!(cfg.locale, Locale::Fr);
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        let cfg = EngineConfig::from_lookup(lookup(&[
            ("ARCAN_TIMEZONE", "   "),
            ("ARCAN_DISPLAY_FORMAT", "13h"),
            ("ARCAN_LOCALE", "klingon"),
        ]));
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn empty_major_league_list_disables_the_criterion() {
        assert!(major_league_ids_from_lookup(lookup(&[("ARCAN_MAJOR_LEAGUE_IDS", "")])).is_empty());
        assert_eq!(
            major_league_ids_from_lookup(lookup(&[("ARCAN_MAJOR_LEAGUE_IDS", "47, 87")])),
            vec![47, 87]
        );
    }
}
