use chrono::{TimeZone, Utc};
use serde_json::json;

use arcan_time::aggregate::SlotAggregator;
use arcan_time::annotate::MatchRecord;
use arcan_time::clock::FixedClock;
use arcan_time::config::{DisplayFormat, EngineConfig};
use arcan_time::engine::TimeEngine;

// Wednesday 1 May 2024, 12:00 in Paris.
fn engine() -> TimeEngine {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    TimeEngine::with_clock(EngineConfig::default(), clock).expect("default config is valid")
}

fn fixture(name: &str, date: &str, league_id: u32) -> MatchRecord {
    let mut record = MatchRecord::new(date);
    record.league_id = Some(league_id);
    record.extra.insert("name".to_string(), json!(name));
    record
}

fn names(records: &[&MatchRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.extra["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

// Saturday 4 May 2024 in Paris: 20:30 is prime, 18:30 is not.
const SAT_PRIME: &str = "2024-05-04T18:30:00Z";
const SAT_EARLY: &str = "2024-05-04T16:30:00Z";

#[test]
fn major_competition_outranks_prime_time() {
    let engine = engine();
    let records = vec![
        fixture("minor-prime", SAT_PRIME, 999),
        fixture("major-early", SAT_EARLY, 39),
    ];
    let best = SlotAggregator::new(&engine).best_per_day(&records, 3);
    assert_eq!(names(&best["2024-05-04"]), vec!["major-early", "minor-prime"]);
}

#[test]
fn tie_breaks_apply_in_order() {
    let engine = engine();
    let mut derby = fixture("derby", SAT_EARLY, 999);
    derby.is_derby = true;
    let mut value_bet = fixture("value-bet", SAT_EARLY, 999);
    value_bet.is_value_bet = true;
    let plain = fixture("plain", SAT_EARLY, 999);
    let prime = fixture("prime", SAT_PRIME, 999);

    let records = vec![value_bet, plain, derby, prime];
    let best = SlotAggregator::new(&engine).best_per_day(&records, 10);
    assert_eq!(
        names(&best["2024-05-04"]),
        vec!["prime", "derby", "plain", "value-bet"]
    );
}

#[test]
fn equal_keys_keep_input_order() {
    let engine = engine();
    let records = vec![
        fixture("a", SAT_EARLY, 39),
        fixture("b", SAT_EARLY, 140),
        fixture("c", SAT_EARLY, 61),
        fixture("d", SAT_EARLY, 78),
    ];
    let best = SlotAggregator::new(&engine).best_per_day(&records, 3);
    assert_eq!(names(&best["2024-05-04"]), vec!["a", "b", "c"]);
}

#[test]
fn days_are_split_in_the_active_zone() {
    let engine = engine();
    let records = vec![
        fixture("sat", SAT_PRIME, 39),
        // 23:30 UTC Saturday is already Sunday in Paris.
        fixture("late", "2024-05-04T23:30:00Z", 39),
        fixture("broken", "someday", 39),
        MatchRecord::default(),
    ];
    let best = SlotAggregator::new(&engine).best_per_day(&records, 1);
    let days: Vec<&str> = best.keys().map(String::as_str).collect();
    assert_eq!(days, vec!["2024-05-04", "2024-05-05"]);
    assert_eq!(names(&best["2024-05-05"]), vec!["late"]);
}

#[test]
fn custom_major_leagues() {
    let engine = engine();
    let records = vec![
        fixture("api-football-pl", SAT_EARLY, 39),
        fixture("fotmob-pl", SAT_EARLY, 47),
    ];
    let aggregator = SlotAggregator::with_major_leagues(&engine, vec![47]);
    assert_eq!(aggregator.major_league_ids(), &[47]);
    let best = aggregator.best_per_day(&records, 1);
    assert_eq!(names(&best["2024-05-04"]), vec!["fotmob-pl"]);
}

#[test]
fn distribution_counts_classified_matches_only() {
    let engine = engine();
    let records = vec![
        MatchRecord::new(SAT_PRIME),
        MatchRecord::new("2024-05-03T17:15:00Z"),
        MatchRecord::new(SAT_EARLY),
        MatchRecord::new("2024-05-02T03:00:00Z"),
        MatchRecord::new("bad"),
    ];
    let counts = SlotAggregator::new(&engine).distribution(&records);
    assert_eq!(counts.len(), 2);
    assert_eq!(counts["evening_prime"], 2);
    assert_eq!(counts["evening_early"], 1);
    assert!(!counts.contains_key("other"));
}

#[test]
fn distribution_of_nothing_is_empty() {
    let engine = engine();
    let aggregator = SlotAggregator::new(&engine);
    assert!(aggregator.distribution(&[]).is_empty());
    let junk = vec![MatchRecord::new("x"), MatchRecord::new(""), MatchRecord::default()];
    assert!(aggregator.distribution(&junk).is_empty());
    assert!(aggregator.best_per_day(&junk, 3).is_empty());
}

#[test]
fn favourite_slots_come_from_preferences() {
    let mut engine = engine();
    let records = vec![
        MatchRecord::new(SAT_PRIME),
        MatchRecord::new(SAT_EARLY),
        MatchRecord::new("2024-05-02T03:00:00Z"),
    ];
    assert!(SlotAggregator::new(&engine).filter_favorite_slots(&records).is_empty());

    engine
        .set_user_preferences(&json!({
            "favorite_time_slots": ["evening_prime", "other"],
            "theme": "dark"
        }))
        .expect("unknown keys are ignored");
    let picked = SlotAggregator::new(&engine).filter_favorite_slots(&records);
    assert_eq!(picked.len(), 2);
    assert_eq!(picked[0].date.as_deref(), Some(SAT_PRIME));
    assert_eq!(picked[1].date.as_deref(), Some("2024-05-02T03:00:00Z"));
}

#[test]
fn rejected_preferences_change_nothing() {
    let mut engine = engine();
    let err = engine.set_user_preferences(&json!({
        "preferred_timezone": "Moon/Base",
        "display_format": "12h"
    }));
    assert!(err.is_err());
    assert_eq!(engine.user_preferences().display_format, DisplayFormat::H24);
    assert_eq!(engine.timezone_name(), "Europe/Paris");

    assert!(engine.set_user_preferences(&json!({ "display_format": "13h" })).is_err());
    assert!(engine.set_user_preferences(&json!(["12h"])).is_err());

    engine
        .set_user_preferences(&json!({ "preferred_timezone": "Asia/Tokyo" }))
        .expect("valid timezone");
    assert_eq!(engine.timezone_name(), "Asia/Tokyo");
    assert_eq!(engine.user_preferences().preferred_timezone, "Asia/Tokyo");
}
