//! Read-side progress derivations over a state snapshot.
//!
//! Everything here is a pure function of `&State`; nothing mutates or
//! persists.

use crate::scheduler;
use crate::types::{Difficulty, State};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Correct/incorrect tally with a one-decimal percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyStats {
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    pub percentage: f64,
}

/// Per-item breakdown for one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStats {
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    pub percentage: f64,
    pub difficulty: Difficulty,
}

/// One day of practice activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub correct: u32,
    pub total: u32,
    pub percentage: f64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percentage(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(correct as f64 / total as f64 * 100.0)
    }
}

/// Accuracy per category. Categories with no attempts are omitted.
pub fn category_stats(state: &State) -> BTreeMap<String, TallyStats> {
    state
        .categories
        .iter()
        .filter(|(_, agg)| agg.correct + agg.incorrect > 0)
        .map(|(name, agg)| {
            let total = agg.correct + agg.incorrect;
            (
                name.clone(),
                TallyStats {
                    correct: agg.correct,
                    incorrect: agg.incorrect,
                    total,
                    percentage: percentage(agg.correct, total),
                },
            )
        })
        .collect()
}

/// Accuracy summed over all items from one source file.
pub fn file_stats(state: &State, source_file: &str) -> TallyStats {
    let (correct, incorrect) = state
        .items
        .values()
        .filter(|item| item.source_file == source_file)
        .fold((0, 0), |(c, i), item| (c + item.correct, i + item.incorrect));

    let total = correct + incorrect;
    TallyStats {
        correct,
        incorrect,
        total,
        percentage: percentage(correct, total),
    }
}

/// The weakest categories, ascending by accuracy.
///
/// Categories with fewer than 3 attempts are excluded to avoid noisy
/// single-sample signals.
pub fn weak_categories(state: &State, limit: usize) -> Vec<(String, f64)> {
    let mut weak: Vec<(String, f64)> = category_stats(state)
        .into_iter()
        .filter(|(_, stats)| stats.total >= 3)
        .map(|(name, stats)| (name, stats.percentage))
        .collect();

    weak.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    weak.truncate(limit);
    weak
}

/// Day-bucketed accuracy over the answer log, ascending by date.
///
/// Entries older than `days` before `now` are skipped. Buckets follow the
/// local calendar; days without activity produce no row.
pub fn progress_series(state: &State, days: u32, now: DateTime<Utc>) -> Vec<DailyProgress> {
    let cutoff = now - chrono::Duration::days(days as i64);

    let mut daily: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for entry in &state.answer_log {
        if entry.timestamp < cutoff {
            continue;
        }
        let day = entry.timestamp.with_timezone(&Local).date_naive();
        let bucket = daily.entry(day).or_insert((0, 0));
        bucket.1 += 1;
        if entry.correct {
            bucket.0 += 1;
        }
    }

    daily
        .into_iter()
        .map(|(date, (correct, total))| DailyProgress {
            date,
            correct,
            total,
            percentage: percentage(correct, total),
        })
        .collect()
}

/// Per-question stats for every item from one source file.
///
/// Keys are the question portion of the item key (text after the `::`
/// separator).
pub fn item_stats_for_file(state: &State, source_file: &str) -> BTreeMap<String, ItemStats> {
    state
        .items
        .iter()
        .filter(|(_, item)| item.source_file == source_file)
        .map(|(key, item)| {
            let question = key
                .split_once("::")
                .map(|(_, q)| q.to_string())
                .unwrap_or_else(|| key.clone());
            let (band, _) = scheduler::difficulty(Some(item));
            (
                question,
                ItemStats {
                    correct: item.correct,
                    incorrect: item.incorrect,
                    total: item.total(),
                    percentage: percentage(item.correct, item.total()),
                    difficulty: band,
                },
            )
        })
        .collect()
}
