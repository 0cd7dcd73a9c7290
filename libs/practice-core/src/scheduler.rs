//! Item scheduling: SM-2 ease/interval updates and weighted selection.
//!
//! Based on SuperMemo 2 with a pass/fail rating. A correct answer grows the
//! review interval by the ease factor; an incorrect answer resets the interval
//! to one day so the item comes back into near-term rotation.

use crate::error::TrackerError;
use crate::types::{Difficulty, ItemRecord};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Scheduler with configurable SM-2 and weighting parameters.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pub minimum_ease: f64,
    pub ease_bonus: f64,
    pub ease_penalty: f64,
    pub base_weight: f64,
    pub error_weight: f64,
    pub overdue_bonus: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            minimum_ease: 1.3,
            ease_bonus: 0.1,
            ease_penalty: 0.2,
            base_weight: 0.3,
            error_weight: 0.7,
            overdue_bonus: 0.5,
            min_weight: 0.1,
            max_weight: 3.0,
        }
    }
}

impl Scheduler {
    /// Apply one answer to an item's learning state.
    ///
    /// Counts only increase; `ease_factor` never drops below `minimum_ease`;
    /// `interval` never drops below 1.
    pub fn apply_answer(&self, record: &mut ItemRecord, correct: bool, now: DateTime<Utc>) {
        record.last_seen = Some(now);

        if correct {
            record.correct += 1;
            record.ease_factor = (record.ease_factor + self.ease_bonus).max(self.minimum_ease);
            record.interval = ((record.interval as f64 * record.ease_factor).floor() as u32).max(1);
        } else {
            record.incorrect += 1;
            record.ease_factor = (record.ease_factor - self.ease_penalty).max(self.minimum_ease);
            // A single miss cancels all prior spacing gains.
            record.interval = 1;
        }
    }

    /// Selection weight for an item: how urgently it should be practiced.
    ///
    /// Never-answered items get a neutral 1.0. Otherwise the weight combines
    /// the historical error rate with how overdue the item is relative to its
    /// review interval, clamped to `[min_weight, max_weight]`. This is a
    /// priority signal, not a gate: every item stays selectable.
    pub fn review_weight(&self, record: Option<&ItemRecord>, now: DateTime<Utc>) -> f64 {
        let record = match record {
            Some(r) if r.total() > 0 => r,
            _ => return 1.0,
        };

        let error_rate = record.incorrect as f64 / record.total() as f64;

        let time_factor = match record.last_seen {
            Some(last_seen) => {
                let days_since = (now - last_seen).num_days();
                if days_since >= record.interval as i64 {
                    1.0 + (days_since as f64 / record.interval as f64) * self.overdue_bonus
                } else {
                    1.0
                }
            }
            None => 1.0,
        };

        let weight = (self.base_weight + error_rate * self.error_weight) * time_factor;
        weight.clamp(self.min_weight, self.max_weight)
    }
}

/// Pick one candidate with probability proportional to its weight.
///
/// Normalizes the weights, draws a single uniform value in `[0, 1)`, and walks
/// the cumulative distribution, accepting the first candidate whose cumulative
/// probability meets the draw. Floating-point shortfall falls back to the last
/// candidate, so a non-empty list always yields an item.
pub fn select_weighted<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut R,
) -> Result<&'a T, TrackerError> {
    if items.is_empty() {
        return Err(TrackerError::EmptyCandidates);
    }
    debug_assert_eq!(items.len(), weights.len());

    let total: f64 = weights.iter().sum();
    let r: f64 = rng.gen();

    let mut cumulative = 0.0;
    for (item, weight) in items.iter().zip(weights) {
        cumulative += weight / total;
        if r <= cumulative {
            return Ok(item);
        }
    }

    // Rounding left the cumulative sum short of the draw.
    Ok(items.last().expect("non-empty candidate list"))
}

/// Difficulty band and correct-percentage for an item.
///
/// Unanswered items report `(New, -1.0)`. Band thresholds are inclusive at
/// the lower bound: easy ≥ 80%, medium ≥ 50%, hard below that.
pub fn difficulty(record: Option<&ItemRecord>) -> (Difficulty, f64) {
    let record = match record {
        Some(r) if r.total() > 0 => r,
        _ => return (Difficulty::New, -1.0),
    };

    let pct = record.correct as f64 / record.total() as f64 * 100.0;
    let band = if pct >= 80.0 {
        Difficulty::Easy
    } else if pct >= 50.0 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    };
    (band, pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record() -> ItemRecord {
        ItemRecord::new("Networking", "notes.md")
    }

    #[test]
    fn correct_answer_grows_interval_by_ease() {
        let scheduler = Scheduler::default();
        let mut r = record();
        scheduler.apply_answer(&mut r, true, Utc::now());
        assert_eq!(r.correct, 1);
        assert_eq!(r.ease_factor, 2.6);
        // floor(1 * 2.6) = 2
        assert_eq!(r.interval, 2);
    }

    #[test]
    fn incorrect_answer_resets_interval() {
        let scheduler = Scheduler::default();
        let mut r = record();
        for _ in 0..5 {
            scheduler.apply_answer(&mut r, true, Utc::now());
        }
        assert!(r.interval > 1);
        scheduler.apply_answer(&mut r, false, Utc::now());
        assert_eq!(r.interval, 1);
        assert_eq!(r.incorrect, 1);
    }

    #[test]
    fn ease_factor_never_below_minimum() {
        let scheduler = Scheduler::default();
        let mut r = record();
        for _ in 0..20 {
            scheduler.apply_answer(&mut r, false, Utc::now());
        }
        assert_eq!(r.ease_factor, scheduler.minimum_ease);
        assert_eq!(r.interval, 1);
    }

    #[test]
    fn invariants_hold_across_mixed_sequences() {
        let scheduler = Scheduler::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut r = record();
        for _ in 0..500 {
            scheduler.apply_answer(&mut r, rng.gen_bool(0.5), Utc::now());
            assert!(r.ease_factor >= scheduler.minimum_ease);
            assert!(r.interval >= 1);
        }
        assert_eq!(r.total(), 500);
    }

    #[test]
    fn unanswered_item_weighs_neutral() {
        let scheduler = Scheduler::default();
        assert_eq!(scheduler.review_weight(None, Utc::now()), 1.0);
        assert_eq!(scheduler.review_weight(Some(&record()), Utc::now()), 1.0);
    }

    #[test]
    fn recently_seen_mastered_item_weighs_minimum_band() {
        let scheduler = Scheduler::default();
        let now = Utc::now();
        let mut r = record();
        for _ in 0..10 {
            scheduler.apply_answer(&mut r, true, now);
        }
        // error_rate 0, not overdue: weight = base_weight
        let weight = scheduler.review_weight(Some(&r), now);
        assert!((weight - scheduler.base_weight).abs() < 1e-9);
    }

    #[test]
    fn overdue_error_prone_item_clamps_to_max() {
        let scheduler = Scheduler::default();
        let now = Utc::now();
        let mut r = record();
        for _ in 0..10 {
            scheduler.apply_answer(&mut r, false, now);
        }
        r.last_seen = Some(now - Duration::days(30));
        let weight = scheduler.review_weight(Some(&r), now);
        assert_eq!(weight, scheduler.max_weight);
    }

    #[test]
    fn overdue_items_weigh_more_than_fresh_ones() {
        let scheduler = Scheduler::default();
        let now = Utc::now();
        let mut fresh = record();
        scheduler.apply_answer(&mut fresh, false, now);
        let mut stale = fresh.clone();
        stale.last_seen = Some(now - Duration::days(10));

        let fresh_weight = scheduler.review_weight(Some(&fresh), now);
        let stale_weight = scheduler.review_weight(Some(&stale), now);
        assert!(stale_weight > fresh_weight);
    }

    #[test]
    fn singleton_selection_returns_that_item() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let picked = select_weighted(&["only"], &[0.1], &mut rng).unwrap();
            assert_eq!(*picked, "only");
        }
    }

    #[test]
    fn empty_selection_is_an_error_across_seeds() {
        for seed in 0..1000 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = select_weighted::<&str, _>(&[], &[], &mut rng);
            assert!(matches!(result, Err(TrackerError::EmptyCandidates)));
        }
    }

    #[test]
    fn selection_favors_heavier_items() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = ["light", "heavy"];
        let weights = [0.1, 3.0];
        let mut heavy_hits = 0;
        for _ in 0..2000 {
            if *select_weighted(&items, &weights, &mut rng).unwrap() == "heavy" {
                heavy_hits += 1;
            }
        }
        // Expected ~3.0/3.1 of draws; allow wide slack.
        assert!(heavy_hits > 1700, "heavy picked only {heavy_hits} times");
    }

    #[test]
    fn difficulty_bands_are_inclusive_at_lower_bound() {
        let mut r = record();
        r.correct = 8;
        r.incorrect = 2;
        assert_eq!(difficulty(Some(&r)), (Difficulty::Easy, 80.0));

        r.correct = 5;
        r.incorrect = 5;
        assert_eq!(difficulty(Some(&r)), (Difficulty::Medium, 50.0));

        r.correct = 1;
        r.incorrect = 3;
        assert_eq!(difficulty(Some(&r)).0, Difficulty::Hard);
    }

    #[test]
    fn unanswered_item_is_new() {
        assert_eq!(difficulty(None), (Difficulty::New, -1.0));
        assert_eq!(difficulty(Some(&record())), (Difficulty::New, -1.0));
    }
}
