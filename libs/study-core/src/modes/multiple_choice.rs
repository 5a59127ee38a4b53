//! Multiple choice: pick the back among sampled distractors.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::quality::multiple_choice_quality;
use crate::types::{Card, CardId};

use super::Resolution;

/// A question with its shuffled options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
    pub card_id: CardId,
    pub front: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct MultipleChoiceMode {
    /// Options per question, the correct one included.
    pub option_count: usize,
}

impl Default for MultipleChoiceMode {
    fn default() -> Self {
        Self { option_count: 4 }
    }
}

impl MultipleChoiceMode {
    /// Build a question for `card`, drawing distractors from the other
    /// distinct backs in `deck`. Small decks yield fewer options.
    pub fn question<R: Rng + ?Sized>(&self, card: &Card, deck: &[Card], rng: &mut R) -> MultipleChoiceQuestion {
        let mut pool: Vec<&str> = deck
            .iter()
            .filter(|c| c.id != card.id && c.back != card.back)
            .map(|c| c.back.as_str())
            .collect();
        pool.sort_unstable();
        pool.dedup();

        let wanted = self.option_count.saturating_sub(1);
        let mut options: Vec<String> = pool
            .choose_multiple(rng, wanted)
            .map(|back| (*back).to_owned())
            .collect();
        options.shuffle(rng);

        let correct_index = rng.random_range(0..=options.len());
        options.insert(correct_index, card.back.clone());

        MultipleChoiceQuestion {
            card_id: card.id,
            front: card.front.clone(),
            options,
            correct_index,
        }
    }

    pub fn resolve(&self, question: &MultipleChoiceQuestion, selected: usize) -> Result<Resolution> {
        let quality = multiple_choice_quality(selected, question.correct_index, question.options.len())?;
        Ok(Resolution {
            card_id: question.card_id,
            quality: Some(quality),
            is_correct: quality.is_pass(),
            correct_answer: question.options.get(question.correct_index).cloned(),
            completes_item: true,
        })
    }
}
