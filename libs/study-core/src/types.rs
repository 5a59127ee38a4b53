//! Core types for the review engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

pub type CardId = Uuid;
pub type DeckId = Uuid;
pub type UserId = Uuid;
pub type SessionId = Uuid;

/// Normalized recall quality.
///
/// Only the four values the product emits are representable, so anything
/// holding a `Quality` has already been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quality {
    /// Total failure.
    Again,
    /// Failed, but the answer was recognised.
    Hard,
    /// Recalled.
    Good,
    /// Recalled without effort.
    Perfect,
}

impl Quality {
    /// Numeric value on the 0-5 scale.
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 0,
            Self::Hard => 1,
            Self::Good => 3,
            Self::Perfect => 5,
        }
    }

    /// Create from a value on the 0-5 scale. Only 0, 1, 3 and 5 are accepted.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Again),
            1 => Some(Self::Hard),
            3 => Some(Self::Good),
            5 => Some(Self::Perfect),
            _ => None,
        }
    }

    /// Validate a raw integer coming from a client.
    pub fn parse(value: i64) -> Result<Self, CoreError> {
        u8::try_from(value)
            .ok()
            .and_then(Self::from_value)
            .ok_or(CoreError::InvalidQuality(value))
    }

    /// A pass is quality 3 or better.
    pub fn is_pass(self) -> bool {
        self.to_value() >= 3
    }

    /// Map a two-way outcome onto the scale: correct -> 5, wrong -> 1.
    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Self::Perfect
        } else {
            Self::Hard
        }
    }
}

impl TryFrom<u8> for Quality {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(CoreError::InvalidQuality(value as i64))
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.to_value()
    }
}

/// Per-card scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub stability: f64,
    pub difficulty: f64,
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval: u32,
    pub review_count: u32,
    pub last_review: Option<DateTime<Utc>>,
    /// `None` until the first review.
    pub due_date: Option<DateTime<Utc>>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            stability: 0.0,
            difficulty: 5.0,
            ease_factor: 2.5,
            interval: 0,
            review_count: 0,
            last_review: None,
            due_date: None,
        }
    }
}

impl MemoryState {
    /// Never-reviewed cards are always due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date.map_or(true, |due| due <= now)
    }

    pub fn is_new(&self) -> bool {
        self.review_count == 0
    }
}

/// A card with its memory-model state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub deck_id: DeckId,
    pub front: String,
    pub back: String,
    pub state: MemoryState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Create a never-reviewed card.
    pub fn new(deck_id: DeckId, front: impl Into<String>, back: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front: front.into(),
            back: back.into(),
            state: MemoryState::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Study interaction modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    Flashcards,
    MultipleChoice,
    Write,
    Match,
}

impl StudyMode {
    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::MultipleChoice => "multiple_choice",
            Self::Write => "write",
            Self::Match => "match",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "flashcards" => Some(Self::Flashcards),
            "multiple_choice" => Some(Self::MultipleChoice),
            "write" => Some(Self::Write),
            "match" => Some(Self::Match),
            _ => None,
        }
    }
}

impl std::fmt::Display for StudyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching policy for typed answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    Exact,
    CaseInsensitive,
    Fuzzy,
}

impl Default for MatchingMode {
    fn default() -> Self {
        Self::CaseInsensitive
    }
}

impl MatchingMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(Self::Exact),
            "case_insensitive" => Some(Self::CaseInsensitive),
            "fuzzy" => Some(Self::Fuzzy),
            _ => None,
        }
    }
}

/// One bounded run of study activity over a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: SessionId,
    pub user_id: UserId,
    pub deck_id: DeckId,
    pub mode: StudyMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub cards_studied: u32,
    pub cards_correct: u32,
    pub cards_incorrect: u32,
}

impl StudySession {
    pub fn new(user_id: UserId, deck_id: DeckId, mode: StudyMode, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            deck_id,
            mode,
            started_at: now,
            finished_at: None,
            cards_studied: 0,
            cards_correct: 0,
            cards_incorrect: 0,
        }
    }

    /// Count one resolved item.
    pub fn record(&mut self, correct: bool) {
        self.cards_studied += 1;
        if correct {
            self.cards_correct += 1;
        } else {
            self.cards_incorrect += 1;
        }
    }

    /// Close the session. Returns false if it was already closed.
    pub fn finish(&mut self, now: DateTime<Utc>) -> bool {
        if self.finished_at.is_some() {
            return false;
        }
        self.finished_at = Some(now);
        true
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}
