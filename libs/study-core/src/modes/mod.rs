//! Mode sub-engines.
//!
//! Each mode presents an item, collects a response and resolves it into a
//! [`Resolution`]. [`ModeEngine`] dispatches over the four variants.

pub mod flashcards;
pub mod match_board;
pub mod multiple_choice;
pub mod write;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{Card, CardId, Quality, StudyMode};

pub use flashcards::{FlashcardPrompt, FlashcardsMode};
pub use match_board::{MatchBoard, MatchMode, MatchOutcome, MatchPair, MatchSnapshot, PendingMismatch};
pub use multiple_choice::{MultipleChoiceMode, MultipleChoiceQuestion};
pub use write::{WriteMode, WriteOutcome, WritePrompt};

/// What the learner is shown for the current item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    Flashcard(FlashcardPrompt),
    MultipleChoice(MultipleChoiceQuestion),
    Write(WritePrompt),
    Match(MatchSnapshot),
}

/// A learner's answer to the current prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    SelfRating { quality: Quality },
    Choice { index: usize },
    Written { answer: String },
    Pair { term: usize, definition: usize },
}

/// Result of resolving one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub card_id: CardId,
    /// `None` when the response does not feed the scheduler.
    pub quality: Option<Quality>,
    pub is_correct: bool,
    pub correct_answer: Option<String>,
    /// False for a match-mode mismatch, which neither counts nor advances.
    pub completes_item: bool,
}

/// The item currently in front of the learner, with what is needed to
/// resolve it.
#[derive(Debug, Clone)]
pub enum Presented {
    Flashcard(Card),
    MultipleChoice(MultipleChoiceQuestion),
    Write(Card),
    Match(MatchBoard),
}

impl Presented {
    pub fn prompt(&self, now: DateTime<Utc>) -> Prompt {
        match self {
            Self::Flashcard(card) => Prompt::Flashcard(FlashcardsMode.prompt(card)),
            Self::MultipleChoice(question) => Prompt::MultipleChoice(question.clone()),
            Self::Write(card) => Prompt::Write(WritePrompt::for_card(card)),
            Self::Match(board) => Prompt::Match(board.snapshot(now)),
        }
    }
}

/// Tagged dispatch over the four mode sub-engines.
#[derive(Debug, Clone)]
pub enum ModeEngine {
    Flashcards(FlashcardsMode),
    MultipleChoice(MultipleChoiceMode),
    Write(WriteMode),
    Match(MatchMode),
}

impl ModeEngine {
    pub fn mode(&self) -> StudyMode {
        match self {
            Self::Flashcards(_) => StudyMode::Flashcards,
            Self::MultipleChoice(_) => StudyMode::MultipleChoice,
            Self::Write(_) => StudyMode::Write,
            Self::Match(_) => StudyMode::Match,
        }
    }

    /// Present the card at `position`. Match presents the whole queue as a
    /// single board, so `position` is ignored there.
    pub fn present<R: Rng + ?Sized>(
        &self,
        queue: &[Card],
        position: usize,
        deck: &[Card],
        rng: &mut R,
    ) -> Option<Presented> {
        if let Self::Match(mode) = self {
            return (!queue.is_empty()).then(|| Presented::Match(mode.board(queue, rng)));
        }

        let card = queue.get(position)?;
        let presented = match self {
            Self::Flashcards(_) => Presented::Flashcard(card.clone()),
            Self::MultipleChoice(mode) => Presented::MultipleChoice(mode.question(card, deck, rng)),
            Self::Write(_) => Presented::Write(card.clone()),
            Self::Match(_) => unreachable!("handled above"),
        };
        Some(presented)
    }

    pub fn resolve(&self, presented: &mut Presented, response: Response, now: DateTime<Utc>) -> Result<Resolution> {
        match (self, presented, response) {
            (Self::Flashcards(mode), Presented::Flashcard(card), Response::SelfRating { quality }) => {
                Ok(mode.resolve(card, quality))
            }
            (Self::MultipleChoice(mode), Presented::MultipleChoice(question), Response::Choice { index }) => {
                mode.resolve(question, index)
            }
            (Self::Write(mode), Presented::Write(card), Response::Written { answer }) => {
                Ok(mode.resolve(card, &answer))
            }
            (Self::Match(mode), Presented::Match(board), Response::Pair { term, definition }) => {
                mode.resolve(board, term, definition, now)
            }
            _ => Err(CoreError::ResponseMismatch { mode: self.mode() }),
        }
    }
}
