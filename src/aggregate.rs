use std::collections::BTreeMap;

use crate::annotate::MatchRecord;
use crate::config::DEFAULT_MAJOR_LEAGUE_IDS;
use crate::engine::TimeEngine;
use crate::window::{OTHER_SLOT, TimeWindow};

/// Ranking key, compared descending: major competition, prime slot, derby,
/// then *not* a value bet.
type RankKey = (bool, bool, bool, bool);

pub struct SlotAggregator<'a> {
    engine: &'a TimeEngine,
    major_league_ids: Vec<u32>,
}

impl<'a> SlotAggregator<'a> {
    pub fn new(engine: &'a TimeEngine) -> Self {
        Self::with_major_leagues(engine, DEFAULT_MAJOR_LEAGUE_IDS.to_vec())
    }

    pub fn with_major_leagues(engine: &'a TimeEngine, major_league_ids: Vec<u32>) -> Self {
        Self {
            engine,
            major_league_ids,
        }
    }

    pub fn major_league_ids(&self) -> &[u32] {
        &self.major_league_ids
    }

    /// Top `top_n` matches of each calendar day (`YYYY-MM-DD` in the active
    /// timezone). The sort is stable, so equal keys keep input order.
    pub fn best_per_day<'m>(
        &self,
        records: &'m [MatchRecord],
        top_n: usize,
    ) -> BTreeMap<String, Vec<&'m MatchRecord>> {
        let mut by_day: BTreeMap<String, Vec<(RankKey, &'m MatchRecord)>> = BTreeMap::new();
        for record in records {
            let Some(kickoff) = record.kickoff() else {
                continue;
            };
            let local = self.engine.normalize(&kickoff);
            let day = local.date_naive().format("%Y-%m-%d").to_string();
            let prime = self
                .engine
                .classify_time(&kickoff)
                .is_some_and(TimeWindow::is_prime);
            by_day
                .entry(day)
                .or_default()
                .push((self.rank_key(record, prime), record));
        }

        by_day
            .into_iter()
            .map(|(day, mut ranked)| {
                ranked.sort_by(|a, b| b.0.cmp(&a.0));
                let best = ranked
                    .into_iter()
                    .take(top_n)
                    .map(|(_, record)| record)
                    .collect();
                (day, best)
            })
            .collect()
    }

    pub fn distribution(&self, records: &[MatchRecord]) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in records {
            let Some(window) = record
                .kickoff()
                .and_then(|kickoff| self.engine.classify_time(&kickoff))
            else {
                continue;
            };
            *counts
                .entry(window.category().as_str().to_string())
                .or_insert(0) += 1;
        }
        counts
    }

    pub fn filter_favorite_slots<'m>(&self, records: &'m [MatchRecord]) -> Vec<&'m MatchRecord> {
        let favorites = &self.engine.user_preferences().favorite_time_slots;
        if favorites.is_empty() {
            return Vec::new();
        }
        records
            .iter()
            .filter(|record| {
                let Some(kickoff) = record.kickoff() else {
                    return false;
                };
                let slot = self
                    .engine
                    .classify_time(&kickoff)
                    .map(|w| w.category().as_str())
                    .unwrap_or(OTHER_SLOT);
                favorites.contains(slot)
            })
            .collect()
    }

    fn rank_key(&self, record: &MatchRecord, prime: bool) -> RankKey {
        let major = record
            .league_id
            .is_some_and(|id| self.major_league_ids.contains(&id));
        (major, prime, record.is_derby, !record.is_value_bet)
    }
}
