use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::annotate::MatchRecord;
use crate::http_client::fixture_client;

const FOTMOB_MATCHES_URL: &str = "https://www.fotmob.com/api/data/matches";

/// Fixtures that have not kicked off yet, for `date` (`YYYYMMDD`) or today.
pub fn fetch_fotmob_fixtures(date: Option<&str>) -> Result<Vec<MatchRecord>> {
    let client = fixture_client()?;
    let url = match date.and_then(non_empty) {
        Some(date) => format!("{FOTMOB_MATCHES_URL}?date={date}"),
        None => FOTMOB_MATCHES_URL.to_string(),
    };
    let body = client
        .get(&url)
        .send()
        .context("request failed")?
        .error_for_status()
        .context("fixtures request rejected")?
        .text()
        .context("failed reading body")?;
    parse_fotmob_fixtures_json(&body)
}

/// Reads a JSON array of match records.
pub fn load_fixtures_file(path: &Path) -> Result<Vec<MatchRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read fixtures from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid fixtures json in {}", path.display()))
}

pub fn parse_fotmob_fixtures_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: FotmobResponse = serde_json::from_str(trimmed).context("invalid fotmob json")?;
    Ok(build_records(data))
}

#[derive(Debug, Deserialize)]
struct FotmobResponse {
    #[serde(default)]
    leagues: Vec<FotmobLeague>,
}

#[derive(Debug, Deserialize)]
struct FotmobLeague {
    id: u32,
    #[serde(rename = "primaryId")]
    primary_id: Option<u32>,
    name: String,
    #[serde(default)]
    matches: Vec<FotmobMatch>,
}

#[derive(Debug, Deserialize)]
struct FotmobMatch {
    id: u64,
    #[serde(rename = "tournamentStage")]
    tournament_stage: Option<String>,
    home: FotmobTeam,
    away: FotmobTeam,
    status: FotmobStatus,
}

#[derive(Debug, Deserialize)]
struct FotmobTeam {
    name: String,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FotmobStatus {
    #[serde(rename = "utcTime")]
    utc_time: String,
    #[serde(default)]
    cancelled: bool,
    #[serde(default)]
    finished: bool,
}

fn build_records(data: FotmobResponse) -> Vec<MatchRecord> {
    let mut records = Vec::new();

    for league in data.leagues {
        let league_id = league.primary_id.unwrap_or(league.id);
        for fixture in league.matches {
            if fixture.status.finished || fixture.status.cancelled {
                continue;
            }
            let Some(date) = non_empty(&fixture.status.utc_time) else {
                continue;
            };

            let mut extra = Map::new();
            extra.insert("id".to_string(), Value::from(fixture.id.to_string()));
            extra.insert("league_name".to_string(), Value::from(league.name.clone()));
            extra.insert(
                "home".to_string(),
                Value::from(fixture.home.short_name.unwrap_or(fixture.home.name)),
            );
            extra.insert(
                "away".to_string(),
                Value::from(fixture.away.short_name.unwrap_or(fixture.away.name)),
            );
            if let Some(stage) = fixture.tournament_stage {
                extra.insert("round".to_string(), Value::from(stage));
            }

            records.push(MatchRecord {
                date: Some(date.to_string()),
                league_id: Some(league_id),
                extra,
                ..MatchRecord::default()
            });
        }
    }

    records
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
