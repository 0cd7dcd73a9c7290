//! Achievement engine: global counter updates and unlock predicates.
//!
//! The catalog is a fixed table of identifier → metadata → predicate, iterated
//! in declared order. Evaluation is a pure function of the prior counters, the
//! answer's correctness, and the local clock; the tracker applies the result
//! to the persisted state.

use crate::types::{AchievementRecord, GlobalStats};
use chrono::{DateTime, Duration, Local, Timelike};
use std::collections::BTreeMap;

/// One catalog entry.
pub struct AchievementDef {
    pub id: &'static str,
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    predicate: fn(&GlobalStats, u32) -> bool,
}

impl AchievementDef {
    /// Whether the predicate holds for the given counters and local hour.
    pub fn is_satisfied(&self, stats: &GlobalStats, hour: u32) -> bool {
        (self.predicate)(stats, hour)
    }
}

/// The fixed unlock catalog, in unlock-report order.
pub const CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: "first_blood",
        icon: "🏆",
        name: "First Blood",
        description: "Answer your first question correctly",
        predicate: |s, _| s.total_correct >= 1,
    },
    AchievementDef {
        id: "on_fire",
        icon: "🔥",
        name: "On Fire",
        description: "10 correct answers in a row",
        predicate: |s, _| s.current_streak >= 10,
    },
    AchievementDef {
        id: "perfectionist",
        icon: "🎯",
        name: "Perfectionist",
        description: "20 correct answers in a row",
        predicate: |s, _| s.current_streak >= 20,
    },
    AchievementDef {
        id: "unstoppable",
        icon: "⚡",
        name: "Unstoppable",
        description: "25 correct answers in a row",
        predicate: |s, _| s.current_streak >= 25,
    },
    AchievementDef {
        id: "big_brain",
        icon: "🧠",
        name: "Big Brain",
        description: "100 correct answers in one session",
        predicate: |s, _| s.session_correct >= 100,
    },
    AchievementDef {
        id: "masochist",
        icon: "💀",
        name: "Masochist",
        description: "50 wrong answers in one session",
        predicate: |s, _| s.session_incorrect >= 50,
    },
    AchievementDef {
        id: "centurion",
        icon: "💯",
        name: "Centurion",
        description: "100 correct answers in total",
        predicate: |s, _| s.total_correct >= 100,
    },
    AchievementDef {
        id: "scholar",
        icon: "📚",
        name: "Scholar",
        description: "500 correct answers in total",
        predicate: |s, _| s.total_correct >= 500,
    },
    AchievementDef {
        id: "master",
        icon: "🎓",
        name: "Master",
        description: "1000 correct answers in total",
        predicate: |s, _| s.total_correct >= 1000,
    },
    AchievementDef {
        id: "night_owl",
        icon: "🦉",
        name: "Night Owl",
        description: "Practice after midnight",
        predicate: |_, hour| hour < 5,
    },
    AchievementDef {
        id: "early_bird",
        icon: "☀️",
        name: "Early Bird",
        description: "Practice before 7:00",
        predicate: |_, hour| (5..7).contains(&hour),
    },
    AchievementDef {
        id: "streak_week",
        icon: "📅",
        name: "Streaker",
        description: "Practice 7 days in a row",
        predicate: |s, _| s.day_streak >= 7,
    },
    AchievementDef {
        id: "comeback",
        icon: "💪",
        name: "Comeback Kid",
        description: "After 5 mistakes, 5 correct in a row",
        predicate: |s, _| s.current_streak >= 5 && s.session_incorrect >= 5,
    },
];

/// Look up catalog metadata by identifier.
pub fn definition(id: &str) -> Option<&'static AchievementDef> {
    CATALOG.iter().find(|def| def.id == id)
}

/// Evaluate one recorded answer against the achievement state machine.
///
/// Returns the updated counters and the identifiers newly satisfied (present
/// in neither `unlocked` nor the prior state), in catalog order. Predicates
/// are checked against the *updated* counters.
pub fn evaluate(
    stats: &GlobalStats,
    unlocked: &BTreeMap<String, AchievementRecord>,
    correct: bool,
    now: DateTime<Local>,
) -> (GlobalStats, Vec<&'static str>) {
    let next = advance_stats(stats, correct, now);

    let hour = now.hour();
    let newly = CATALOG
        .iter()
        .filter(|def| !unlocked.contains_key(def.id) && def.is_satisfied(&next, hour))
        .map(|def| def.id)
        .collect();

    (next, newly)
}

/// Apply one answer to the global counters.
fn advance_stats(stats: &GlobalStats, correct: bool, now: DateTime<Local>) -> GlobalStats {
    let mut next = stats.clone();

    if correct {
        next.total_correct += 1;
        next.session_correct += 1;
        next.current_streak += 1;
        next.best_streak = next.best_streak.max(next.current_streak);
    } else {
        next.total_incorrect += 1;
        next.session_incorrect += 1;
        next.current_streak = 0;
    }

    let today = now.date_naive();
    if next.last_practice_date != Some(today) {
        let yesterday = today - Duration::days(1);
        if next.last_practice_date == Some(yesterday) {
            next.day_streak += 1;
        } else {
            // Gap or first-ever practice.
            next.day_streak = 1;
        }
        next.last_practice_date = Some(today);
    }

    next
}
