//! Write: type the back of the card.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::matching::{AnswerChecker, AnswerPolicy};
use crate::quality::write_quality;
use crate::types::{Card, CardId, Quality};

use super::Resolution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritePrompt {
    pub card_id: CardId,
    pub front: String,
}

impl WritePrompt {
    pub fn for_card(card: &Card) -> Self {
        Self {
            card_id: card.id,
            front: card.front.clone(),
        }
    }
}

/// Result of checking a typed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub is_correct: bool,
    pub quality: Quality,
    pub correct_answer: String,
    pub similarity: f64,
}

#[derive(Clone)]
pub struct WriteMode {
    checker: Arc<dyn AnswerChecker>,
}

impl fmt::Debug for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteMode").finish_non_exhaustive()
    }
}

impl Default for WriteMode {
    fn default() -> Self {
        Self::new(AnswerPolicy::default())
    }
}

impl WriteMode {
    pub fn new(checker: impl AnswerChecker + 'static) -> Self {
        Self {
            checker: Arc::new(checker),
        }
    }

    pub fn check(&self, card: &Card, answer: &str) -> WriteOutcome {
        let check = self.checker.check(answer, &card.back);
        WriteOutcome {
            is_correct: check.is_correct,
            quality: write_quality(&check),
            correct_answer: card.back.clone(),
            similarity: check.similarity,
        }
    }

    pub fn resolve(&self, card: &Card, answer: &str) -> Resolution {
        let outcome = self.check(card, answer);
        Resolution {
            card_id: card.id,
            quality: Some(outcome.quality),
            is_correct: outcome.is_correct,
            correct_answer: Some(outcome.correct_answer),
            completes_item: true,
        }
    }
}
