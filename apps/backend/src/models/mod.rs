//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub use study_core::{
    Card, CardId, DeckCounts, DeckId, MemoryState, Prompt, Quality, Resolution, Response, SessionId, SessionProgress,
    StudyMode, StudySession, UserId,
};

use crate::error::{ApiError, Result};

// === Database Entity Types ===

/// A user resolved from a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Deck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Card stored in PostgreSQL, memory state flattened into columns
#[derive(Debug, Clone, FromRow)]
pub struct DbCard {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    pub stability: f64,
    pub difficulty: f64,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub review_count: i32,
    pub last_review: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbCard {
    pub fn into_card(self) -> Card {
        Card {
            id: self.id,
            deck_id: self.deck_id,
            front: self.front,
            back: self.back,
            state: MemoryState {
                stability: self.stability,
                difficulty: self.difficulty,
                ease_factor: self.ease_factor,
                interval: u32::try_from(self.interval_days).unwrap_or(0),
                review_count: u32::try_from(self.review_count).unwrap_or(0),
                last_review: self.last_review,
                due_date: self.due_date,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Study session stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbStudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub deck_id: Uuid,
    pub mode: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub cards_studied: i32,
    pub cards_correct: i32,
    pub cards_incorrect: i32,
}

impl DbStudySession {
    pub fn into_session(self) -> Result<StudySession> {
        let mode = StudyMode::from_str(&self.mode)
            .ok_or_else(|| ApiError::Internal(format!("Unknown study mode in database: {}", self.mode)))?;
        Ok(StudySession {
            id: self.id,
            user_id: self.user_id,
            deck_id: self.deck_id,
            mode,
            started_at: self.started_at,
            finished_at: self.finished_at,
            cards_studied: u32::try_from(self.cards_studied).unwrap_or(0),
            cards_correct: u32::try_from(self.cards_correct).unwrap_or(0),
            cards_incorrect: u32::try_from(self.cards_incorrect).unwrap_or(0),
        })
    }
}

// === API Request/Response Types ===

/// Optional `?limit=N` query
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Body for POST /cards/:card_id/review
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Validated against {0, 1, 3, 5} by the handler.
    pub quality: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlashcardsResponse {
    pub cards: Vec<Card>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MultipleChoiceResponse {
    pub card: Card,
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WriteCheckRequest {
    pub card_id: CardId,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WriteCheckResponse {
    pub is_correct: bool,
    pub quality: Quality,
    pub correct_answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub terms: Vec<String>,
    pub definitions: Vec<String>,
    /// (term, definition) ground truth.
    pub pairs: Vec<(String, String)>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub deck_id: DeckId,
    pub mode: StudyMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionLifecycle {
    Active,
    Finished,
    /// Cancelled, or lost with a restart, before it was finished.
    Abandoned,
}

/// A session record with the live engine view
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: StudySession,
    pub status: SessionLifecycle,
    /// Only while the engine is live.
    pub progress: Option<SessionProgress>,
    pub prompt: Option<Prompt>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub response: Response,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub resolution: Resolution,
    pub updated_card: Option<Card>,
    pub finished: bool,
    pub session: SessionResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<StudySession>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckStatsResponse {
    pub deck_id: DeckId,
    #[serde(flatten)]
    pub counts: DeckCounts,
}
