//! Core types for the adaptive practice scheduler.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum question length (in characters) kept in an item key.
pub const ITEM_KEY_QUESTION_CHARS: usize = 50;

/// Derive the stable key for an item from its source file and question text.
///
/// The question is truncated to [`ITEM_KEY_QUESTION_CHARS`] characters so keys
/// stay bounded regardless of question length.
pub fn item_key(source_file: &str, question: &str) -> String {
    let truncated: String = question.chars().take(ITEM_KEY_QUESTION_CHARS).collect();
    format!("{source_file}::{truncated}")
}

/// A candidate item supplied by the content source.
///
/// The scheduler only needs `question` (for key derivation) plus
/// `category`/`source_file`; `answer` is carried through untouched for the
/// caller's grading oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeItem {
    pub category: String,
    pub question: String,
    pub answer: String,
    pub source_file: String,
}

/// Per-item learning state and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub correct: u32,
    pub incorrect: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    pub ease_factor: f64,
    /// Review interval in days, never below 1.
    pub interval: u32,
    /// Category captured at first write, never overwritten.
    pub category: String,
    /// Source file captured at first write, never overwritten.
    pub source_file: String,
}

impl ItemRecord {
    /// Fresh record with SM-2 defaults.
    pub fn new(category: impl Into<String>, source_file: impl Into<String>) -> Self {
        Self {
            correct: 0,
            incorrect: 0,
            last_seen: None,
            ease_factor: 2.5,
            interval: 1,
            category: category.into(),
            source_file: source_file.into(),
        }
    }

    /// Total recorded attempts.
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }
}

/// Per-category correct/incorrect tally, derived purely from answer events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub correct: u32,
    pub incorrect: u32,
}

/// One recorded answer, append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerLogEntry {
    pub timestamp: DateTime<Utc>,
    pub correct: bool,
    pub source_file: String,
    pub category: String,
}

/// One completed practice session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Utc>,
    pub source_file: String,
    pub score: u32,
    pub total: u32,
}

/// Global counters feeding the achievement engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_correct: u32,
    pub total_incorrect: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub session_correct: u32,
    pub session_incorrect: u32,
    pub day_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_practice_date: Option<NaiveDate>,
}

/// Persisted unlock state for one achievement.
///
/// Once present the record is immutable except for the `seen` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub unlocked_at: DateTime<Utc>,
    pub seen: bool,
}

/// The whole persisted state document.
///
/// Every collection defaults when absent so documents written by older
/// versions (or hand-edited ones missing keys) still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub items: BTreeMap<String, ItemRecord>,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryAggregate>,
    #[serde(default)]
    pub answer_log: Vec<AnswerLogEntry>,
    #[serde(default)]
    pub achievements: BTreeMap<String, AchievementRecord>,
    #[serde(default)]
    pub stats: GlobalStats,
}

/// Difficulty band for a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    New,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn item_key_truncates_long_questions() {
        let question = "q".repeat(200);
        let key = item_key("notes.md", &question);
        assert_eq!(key.len(), "notes.md::".len() + ITEM_KEY_QUESTION_CHARS);
    }

    #[test]
    fn item_key_is_stable_for_short_questions() {
        assert_eq!(
            item_key("notes.md", "What is DNS?"),
            "notes.md::What is DNS?"
        );
    }

    #[test]
    fn item_key_truncation_is_character_based() {
        // Multi-byte characters must not be split.
        let question = "é".repeat(60);
        let key = item_key("f", &question);
        assert_eq!(key.chars().count(), "f::".len() + ITEM_KEY_QUESTION_CHARS);
    }

    #[test]
    fn new_record_has_sm2_defaults() {
        let record = ItemRecord::new("Networking", "notes.md");
        assert_eq!(record.ease_factor, 2.5);
        assert_eq!(record.interval, 1);
        assert_eq!(record.total(), 0);
        assert!(record.last_seen.is_none());
    }

    #[test]
    fn partial_document_deserializes_with_defaults() {
        let state: State = serde_json::from_str(r#"{"items": {}}"#).unwrap();
        assert!(state.answer_log.is_empty());
        assert!(state.sessions.is_empty());
        assert_eq!(state.stats, GlobalStats::default());
    }
}
