use std::path::PathBuf;

use anyhow::{Context, Result};

use arcan_time::aggregate::SlotAggregator;
use arcan_time::annotate::MatchTimeAnnotator;
use arcan_time::config::{EngineConfig, major_league_ids_from_env};
use arcan_time::engine::TimeEngine;
use arcan_time::fixtures;
use arcan_time::logging::init_logging;

const DEFAULT_TOP_N: usize = 3;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let engine = TimeEngine::new(EngineConfig::from_env()).context("invalid engine config")?;
    let mut records = match arg_value("--file") {
        Some(path) => fixtures::load_fixtures_file(&PathBuf::from(path))?,
        None => fixtures::fetch_fotmob_fixtures(arg_value("--date").as_deref())?,
    };
    let top_n = arg_value("--top")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(DEFAULT_TOP_N)
        .max(1);

    MatchTimeAnnotator::new(&engine).annotate_all(&mut records);
    let aggregator = SlotAggregator::with_major_leagues(&engine, major_league_ids_from_env());

    println!("Timezone: {}", engine.timezone_name());
    println!("Fixtures: {}", records.len());

    println!("Slots:");
    for (slot, count) in aggregator.distribution(&records) {
        println!(" - {slot}: {count}");
    }

    println!("Best per day (top {top_n}):");
    for (day, best) in aggregator.best_per_day(&records, top_n) {
        println!("{day}");
        for record in best {
            let home = record.extra.get("home").and_then(|v| v.as_str()).unwrap_or("?");
            let away = record.extra.get("away").and_then(|v| v.as_str()).unwrap_or("?");
            let time = record.time.formatted_time.as_deref().unwrap_or("--:--");
            let slot = record.time.time_slot.as_deref().unwrap_or("other");
            let countdown = record
                .date
                .as_deref()
                .map(|date| engine.format_countdown(date))
                .unwrap_or_default();
            println!("   {time}  {home} vs {away}  [{slot}]  {countdown}");
        }
    }

    Ok(())
}

fn arg_value(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
