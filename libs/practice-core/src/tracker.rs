//! Tracker facade: mutex-guarded load → modify → save cycles over the store.
//!
//! The persisted document is the single logical resource. Every operation,
//! read or write, holds the store lock for its whole cycle so concurrent
//! callers never interleave a load from one cycle with a save from another.

use crate::achievements::{self, AchievementDef};
use crate::error::{Result, TrackerError};
use crate::progress::{self, DailyProgress, ItemStats, TallyStats};
use crate::scheduler::{self, Scheduler};
use crate::store::StateStore;
use crate::types::{
    item_key, AchievementRecord, AnswerLogEntry, CategoryAggregate, Difficulty, GlobalStats,
    ItemRecord, PracticeItem, SessionRecord,
};
use chrono::{DateTime, Local, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// An unlocked achievement joined with its catalog metadata.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked_at: DateTime<Utc>,
    pub seen: bool,
}

/// Adaptive practice tracker over a persisted state document.
pub struct PracticeTracker {
    store: Mutex<StateStore>,
    scheduler: Scheduler,
}

impl PracticeTracker {
    /// Tracker backed by the state document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: Mutex::new(StateStore::new(path)),
            scheduler: Scheduler::default(),
        }
    }

    fn store(&self) -> MutexGuard<'_, StateStore> {
        self.store.lock().expect("store lock")
    }

    /// Record one graded answer: SM-2 item update, category aggregate, and
    /// answer-log append, persisted in a single save.
    pub fn record_answer(
        &self,
        source_file: &str,
        question: &str,
        category: &str,
        correct: bool,
    ) -> Result<()> {
        let now = Utc::now();
        let store = self.store();
        let mut state = store.load();

        let key = item_key(source_file, question);
        let record = state
            .items
            .entry(key)
            .or_insert_with(|| ItemRecord::new(category, source_file));
        self.scheduler.apply_answer(record, correct, now);

        let aggregate = state
            .categories
            .entry(category.to_string())
            .or_insert_with(CategoryAggregate::default);
        if correct {
            aggregate.correct += 1;
        } else {
            aggregate.incorrect += 1;
        }

        state.answer_log.push(AnswerLogEntry {
            timestamp: now,
            correct,
            source_file: source_file.to_string(),
            category: category.to_string(),
        });

        store.save(&mut state)?;
        Ok(())
    }

    /// Record one completed session.
    pub fn record_session(&self, source_file: &str, score: u32, total: u32) -> Result<()> {
        let store = self.store();
        let mut state = store.load();
        state.sessions.push(SessionRecord {
            timestamp: Utc::now(),
            source_file: source_file.to_string(),
            score,
            total,
        });
        store.save(&mut state)?;
        Ok(())
    }

    /// Pick the next item from `candidates` by spaced-repetition weight,
    /// using the supplied RNG.
    pub fn select_next_with<'a, R: Rng + ?Sized>(
        &self,
        candidates: &'a [PracticeItem],
        source_file: &str,
        rng: &mut R,
    ) -> Result<&'a PracticeItem> {
        if candidates.is_empty() {
            return Err(TrackerError::EmptyCandidates);
        }

        let now = Utc::now();
        let state = self.store().load();
        let weights: Vec<f64> = candidates
            .iter()
            .map(|item| {
                let record = state.items.get(&item_key(source_file, &item.question));
                self.scheduler.review_weight(record, now)
            })
            .collect();

        scheduler::select_weighted(candidates, &weights, rng)
    }

    /// [`Self::select_next_with`] using the thread-local RNG.
    pub fn select_next<'a>(
        &self,
        candidates: &'a [PracticeItem],
        source_file: &str,
    ) -> Result<&'a PracticeItem> {
        self.select_next_with(candidates, source_file, &mut rand::thread_rng())
    }

    /// Difficulty band and correct-percentage for one item.
    pub fn difficulty(&self, source_file: &str, question: &str) -> (Difficulty, f64) {
        let state = self.store().load();
        scheduler::difficulty(state.items.get(&item_key(source_file, question)))
    }

    /// Accuracy per category.
    pub fn category_stats(&self) -> BTreeMap<String, TallyStats> {
        progress::category_stats(&self.store().load())
    }

    /// Accuracy summed over all items from one source file.
    pub fn file_stats(&self, source_file: &str) -> TallyStats {
        progress::file_stats(&self.store().load(), source_file)
    }

    /// The weakest categories (≥ 3 attempts), ascending by accuracy.
    pub fn weak_categories(&self, limit: usize) -> Vec<(String, f64)> {
        progress::weak_categories(&self.store().load(), limit)
    }

    /// Day-bucketed accuracy for the last `days` days.
    pub fn progress_series(&self, days: u32) -> Vec<DailyProgress> {
        progress::progress_series(&self.store().load(), days, Utc::now())
    }

    /// Per-question stats for one source file.
    pub fn item_stats_for_file(&self, source_file: &str) -> BTreeMap<String, ItemStats> {
        progress::item_stats_for_file(&self.store().load(), source_file)
    }

    /// Advance the global counters for one answer and unlock any newly
    /// satisfied achievements. Returns the new identifiers in catalog order.
    pub fn check_achievements(&self, correct: bool) -> Result<Vec<String>> {
        let store = self.store();
        let mut state = store.load();

        let (stats, newly) =
            achievements::evaluate(&state.stats, &state.achievements, correct, Local::now());
        state.stats = stats;

        let unlocked_at = Utc::now();
        for id in &newly {
            debug!(achievement = *id, "achievement unlocked");
            state.achievements.insert(
                id.to_string(),
                AchievementRecord {
                    unlocked_at,
                    seen: false,
                },
            );
        }

        store.save(&mut state)?;
        Ok(newly.into_iter().map(str::to_string).collect())
    }

    /// All unlocked achievements joined with catalog metadata.
    ///
    /// Identifiers persisted by an older catalog that no longer exist are
    /// skipped.
    pub fn achievements(&self) -> BTreeMap<String, UnlockedAchievement> {
        let state = self.store().load();
        state
            .achievements
            .iter()
            .filter_map(|(id, record)| {
                achievements::definition(id).map(|def| {
                    (
                        id.clone(),
                        UnlockedAchievement {
                            icon: def.icon,
                            name: def.name,
                            description: def.description,
                            unlocked_at: record.unlocked_at,
                            seen: record.seen,
                        },
                    )
                })
            })
            .collect()
    }

    /// The full achievement catalog, in declared order.
    pub fn catalog(&self) -> &'static [AchievementDef] {
        achievements::CATALOG
    }

    /// Current global counters.
    pub fn global_stats(&self) -> GlobalStats {
        self.store().load().stats
    }

    /// Mark one unlocked achievement as seen.
    pub fn mark_achievement_seen(&self, id: &str) -> Result<()> {
        let store = self.store();
        let mut state = store.load();
        if let Some(record) = state.achievements.get_mut(id) {
            record.seen = true;
            store.save(&mut state)?;
        }
        Ok(())
    }

    /// Reset the session-scoped counters (start of a new session).
    pub fn reset_session_stats(&self) -> Result<()> {
        let store = self.store();
        let mut state = store.load();
        state.stats.session_correct = 0;
        state.stats.session_incorrect = 0;
        store.save(&mut state)?;
        Ok(())
    }
}
