//! Per-mode conversion of learner responses into a `Quality`.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::matching::AnswerCheck;
use crate::types::Quality;

/// How a correct match-mode pair feeds the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "quality", rename_all = "snake_case")]
pub enum MatchScoring {
    /// Matching is a recognition task and leaves scheduling untouched.
    #[default]
    Neutral,
    /// Review each matched card with this quality.
    Review(Quality),
}

/// Flashcards: the learner's self-rating is authoritative.
pub fn flashcard_quality(rating: Quality) -> Quality {
    rating
}

/// Multiple choice: the correct option is 5, any other option is 1.
pub fn multiple_choice_quality(selected: usize, correct_index: usize, option_count: usize) -> Result<Quality> {
    if selected >= option_count {
        return Err(CoreError::OptionOutOfRange {
            index: selected,
            count: option_count,
        });
    }
    Ok(Quality::from_correct(selected == correct_index))
}

/// Write: correct is 5, incorrect is 1.
pub fn write_quality(check: &AnswerCheck) -> Quality {
    Quality::from_correct(check.is_correct)
}

/// Match: only a configured scoring produces a quality.
pub fn match_quality(scoring: MatchScoring) -> Option<Quality> {
    match scoring {
        MatchScoring::Neutral => None,
        MatchScoring::Review(quality) => Some(quality),
    }
}
