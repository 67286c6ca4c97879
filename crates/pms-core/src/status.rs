use serde::{Deserialize, Serialize};

use crate::resolver::{FieldResolver, STATUS, STATUS_LENIENT};

const ACCEPTED: &[&str] = &["completed", "done", "finished", "complete", "100%", "yes", "y"];
const ACCEPTED_LENIENT_EXTRA: &[&str] = &["true", "1"];

/// Which words count as a finished task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusVocabulary {
    #[default]
    Strict,
    /// Also accepts `true` / `1` and reads status from more header spellings.
    Lenient,
}

impl StatusVocabulary {
    pub fn is_completed(self, status: &str) -> bool {
        let normalized = status.trim().to_lowercase();
        ACCEPTED.contains(&normalized.as_str())
            || (self == Self::Lenient && ACCEPTED_LENIENT_EXTRA.contains(&normalized.as_str()))
    }

    pub fn resolver(self) -> FieldResolver {
        match self {
            Self::Strict => STATUS,
            Self::Lenient => STATUS_LENIENT,
        }
    }
}

pub fn is_completed_status(status: &str) -> bool {
    StatusVocabulary::Strict.is_completed(status)
}

/// Zero-task stages are never complete.
pub fn is_complete(total: usize, completed: usize) -> bool {
    total > 0 && total == completed
}

/// Completion percentage rounded to one decimal place.
pub fn progress_percent(total: usize, completed: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = completed as f64 / total as f64 * 100.0;
    (ratio * 10.0).round() / 10.0
}

/// Colour family for a status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Done,
    Active,
    Waiting,
    Neutral,
}

impl StatusTone {
    pub fn of(status: &str) -> Self {
        let lower = status.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|word| lower.contains(word));

        if has_any(&["completed", "done", "finished"]) {
            Self::Done
        } else if has_any(&["progress", "ongoing", "working"]) {
            Self::Active
        } else if has_any(&["pending", "waiting", "not set"]) {
            Self::Waiting
        } else {
            Self::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_words_are_case_and_space_insensitive() {
        for status in ["Completed", " done ", "100%", "Y", "FINISHED", "yes"] {
            assert!(is_completed_status(status), "{status:?} should count");
        }
        for status in ["In Progress", "", "-", "true", "1", "no"] {
            assert!(!is_completed_status(status), "{status:?} should not count");
        }
    }

    #[test]
    fn lenient_vocabulary_adds_boolean_words() {
        assert!(StatusVocabulary::Lenient.is_completed("TRUE"));
        assert!(StatusVocabulary::Lenient.is_completed(" 1"));
        assert!(StatusVocabulary::Lenient.is_completed("done"));
    }

    #[test]
    fn completeness_needs_tasks() {
        assert!(!is_complete(0, 0));
        assert!(!is_complete(0, 3));
        assert!(!is_complete(4, 2));
        assert!(is_complete(3, 3));
    }

    #[test]
    fn progress_is_rounded_to_one_decimal() {
        assert_eq!(progress_percent(4, 2), 50.0);
        assert_eq!(progress_percent(3, 1), 33.3);
        assert_eq!(progress_percent(3, 2), 66.7);
        assert_eq!(progress_percent(0, 0), 0.0);
    }

    #[test]
    fn tones_follow_keywords() {
        assert_eq!(StatusTone::of("Completed"), StatusTone::Done);
        assert_eq!(StatusTone::of("In Progress"), StatusTone::Active);
        assert_eq!(StatusTone::of("Pending"), StatusTone::Waiting);
        assert_eq!(StatusTone::of("Hold"), StatusTone::Neutral);
    }
}
