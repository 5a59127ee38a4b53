//! Review scheduling and study-session engine shared by the backend.
//!
//! Provides:
//! - The SM-2 scheduler over a per-card memory model
//! - Due-set selection and deck counts
//! - Per-mode quality normalization and answer matching
//! - Mode sub-engines (flashcards, multiple choice, write, match)
//! - The study-session state machine
//!
//! Everything here is pure: no I/O, and randomness is injected by the caller.

pub mod algorithm;
pub mod error;
pub mod matching;
pub mod modes;
pub mod quality;
pub mod selector;
pub mod session;
pub mod types;

pub use algorithm::{get_algorithm, sm2::Sm2, SchedulingResult, SpacedRepetitionAlgorithm};
pub use error::{CoreError, Result};
pub use matching::{levenshtein_distance, normalized_similarity, AnswerCheck, AnswerChecker, AnswerPolicy};
pub use modes::{ModeEngine, Presented, Prompt, Resolution, Response};
pub use quality::MatchScoring;
pub use selector::{deck_counts, select_due, DeckCounts};
pub use session::{Evaluation, ItemOutcome, SessionConfig, SessionProgress, SessionState, SessionStatus, StudySessionEngine};
pub use types::{Card, CardId, DeckId, MatchingMode, MemoryState, Quality, SessionId, StudyMode, StudySession, UserId};
