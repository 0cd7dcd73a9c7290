//! Adaptive practice scheduling core.
//!
//! Provides:
//! - SM-2 style per-item scheduling (ease factor, review interval)
//! - Weighted-random item selection favoring weak and overdue items
//! - Progress aggregation (per category, per file, day-bucketed series)
//! - Achievement engine over global counters (streaks, totals, day-streak)
//! - A JSON-document state store with atomic replace semantics

pub mod achievements;
pub mod error;
pub mod progress;
pub mod scheduler;
pub mod store;
pub mod tracker;
pub mod types;

pub use achievements::{AchievementDef, CATALOG};
pub use error::{Result, StoreError, TrackerError};
pub use progress::{DailyProgress, ItemStats, TallyStats};
pub use scheduler::Scheduler;
pub use store::{StateStore, MAX_ANSWER_LOG, MAX_SESSIONS};
pub use tracker::{PracticeTracker, UnlockedAchievement};
pub use types::{
    item_key, AchievementRecord, AnswerLogEntry, CategoryAggregate, Difficulty, GlobalStats,
    ItemRecord, PracticeItem, SessionRecord, State,
};
