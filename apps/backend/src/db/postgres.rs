//! PostgreSQL database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::Store;
use crate::error::{ApiError, Result};
use crate::models::*;

const CARD_COLUMNS: &str = r#"
    id, deck_id, front, back, stability, difficulty, ease_factor,
    interval_days, review_count, last_review, due_date, created_at, updated_at
"#;

const SESSION_COLUMNS: &str = r#"
    id, user_id, deck_id, mode, started_at, finished_at,
    cards_studied, cards_correct, cards_incorrect
"#;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }
}

fn count(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[async_trait]
impl Store for Database {
    // === User Repository ===

    async fn create_user(&self, token: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, token)
            VALUES ($1, $2)
            RETURNING id, token
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // === Deck Repository ===

    async fn create_deck(&self, user_id: UserId, name: &str) -> Result<Deck> {
        let deck = sqlx::query_as::<_, Deck>(
            r#"
            INSERT INTO decks (id, user_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(deck)
    }

    async fn get_deck(&self, deck_id: DeckId) -> Result<Option<Deck>> {
        let deck = sqlx::query_as::<_, Deck>(
            r#"
            SELECT id, user_id, name, created_at
            FROM decks
            WHERE id = $1
            "#,
        )
        .bind(deck_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deck)
    }

    // === Card Repository ===

    async fn create_card(&self, deck_id: DeckId, front: &str, back: &str) -> Result<Card> {
        let card = Card::new(deck_id, front, back);
        let state = &card.state;
        sqlx::query(
            r#"
            INSERT INTO cards (id, deck_id, front, back, stability, difficulty, ease_factor,
                               interval_days, review_count, last_review, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(card.id)
        .bind(card.deck_id)
        .bind(&card.front)
        .bind(&card.back)
        .bind(state.stability)
        .bind(state.difficulty)
        .bind(state.ease_factor)
        .bind(count(state.interval))
        .bind(count(state.review_count))
        .bind(state.last_review)
        .bind(state.due_date)
        .bind(card.created_at)
        .bind(card.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(card)
    }

    async fn get_card(&self, card_id: CardId) -> Result<Option<Card>> {
        let card = sqlx::query_as::<_, DbCard>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"
        ))
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card.map(DbCard::into_card))
    }

    async fn deck_cards(&self, deck_id: DeckId) -> Result<Vec<Card>> {
        let cards = sqlx::query_as::<_, DbCard>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE deck_id = $1 ORDER BY created_at, id"
        ))
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards.into_iter().map(DbCard::into_card).collect())
    }

    async fn save_card_state(&self, card: &Card) -> Result<()> {
        let state = &card.state;
        let result = sqlx::query(
            r#"
            UPDATE cards
            SET stability = $2,
                difficulty = $3,
                ease_factor = $4,
                interval_days = $5,
                review_count = $6,
                last_review = $7,
                due_date = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(card.id)
        .bind(state.stability)
        .bind(state.difficulty)
        .bind(state.ease_factor)
        .bind(count(state.interval))
        .bind(count(state.review_count))
        .bind(state.last_review)
        .bind(state.due_date)
        .bind(card.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Card {} not found", card.id)));
        }
        Ok(())
    }

    // === Study Session Repository ===

    async fn insert_session(&self, session: &StudySession) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO study_sessions (id, user_id, deck_id, mode, started_at, finished_at,
                                        cards_studied, cards_correct, cards_incorrect)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.deck_id)
        .bind(session.mode.as_str())
        .bind(session.started_at)
        .bind(session.finished_at)
        .bind(count(session.cards_studied))
        .bind(count(session.cards_correct))
        .bind(count(session.cards_incorrect))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_session(&self, session: &StudySession) -> Result<()> {
        // finished_at is written once
        let result = sqlx::query(
            r#"
            UPDATE study_sessions
            SET finished_at = COALESCE(finished_at, $2),
                cards_studied = $3,
                cards_correct = $4,
                cards_incorrect = $5
            WHERE id = $1
            "#,
        )
        .bind(session.id)
        .bind(session.finished_at)
        .bind(count(session.cards_studied))
        .bind(count(session.cards_correct))
        .bind(count(session.cards_incorrect))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Session {} not found", session.id)));
        }
        Ok(())
    }

    async fn get_session(&self, session_id: SessionId) -> Result<Option<StudySession>> {
        let row = sqlx::query_as::<_, DbStudySession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM study_sessions WHERE id = $1"
        ))
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DbStudySession::into_session).transpose()
    }

    async fn list_sessions(&self, user_id: UserId, limit: usize) -> Result<Vec<StudySession>> {
        let rows = sqlx::query_as::<_, DbStudySession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM study_sessions WHERE user_id = $1 ORDER BY started_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DbStudySession::into_session).collect()
    }
}
