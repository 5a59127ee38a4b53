//! Flashcards: flip the card, then self-rate.

use serde::{Deserialize, Serialize};

use crate::quality::flashcard_quality;
use crate::types::{Card, CardId, Quality};

use super::Resolution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardPrompt {
    pub card_id: CardId,
    pub front: String,
    /// Shown once the card is flipped.
    pub back: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlashcardsMode;

impl FlashcardsMode {
    pub fn prompt(&self, card: &Card) -> FlashcardPrompt {
        FlashcardPrompt {
            card_id: card.id,
            front: card.front.clone(),
            back: card.back.clone(),
        }
    }

    pub fn resolve(&self, card: &Card, rating: Quality) -> Resolution {
        let quality = flashcard_quality(rating);
        Resolution {
            card_id: card.id,
            quality: Some(quality),
            is_correct: quality.is_pass(),
            correct_answer: None,
            completes_item: true,
        }
    }
}
