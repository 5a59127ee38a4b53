//! Persistence

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Card, CardId, Deck, DeckId, SessionId, StudySession, User, UserId};

pub use memory::MemoryStore;
pub use postgres::Database;

/// Storage for users, decks, cards and study sessions.
///
/// Card writes only touch the memory-state columns; card content is owned
/// by whoever manages decks.
#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn create_user(&self, token: &str) -> Result<User>;
    async fn user_by_token(&self, token: &str) -> Result<Option<User>>;

    // Decks
    async fn create_deck(&self, user_id: UserId, name: &str) -> Result<Deck>;
    async fn get_deck(&self, deck_id: DeckId) -> Result<Option<Deck>>;

    // Cards
    async fn create_card(&self, deck_id: DeckId, front: &str, back: &str) -> Result<Card>;
    async fn get_card(&self, card_id: CardId) -> Result<Option<Card>>;
    async fn deck_cards(&self, deck_id: DeckId) -> Result<Vec<Card>>;
    async fn save_card_state(&self, card: &Card) -> Result<()>;

    // Study sessions
    async fn insert_session(&self, session: &StudySession) -> Result<()>;
    async fn update_session(&self, session: &StudySession) -> Result<()>;
    async fn get_session(&self, session_id: SessionId) -> Result<Option<StudySession>>;
    /// Newest first.
    async fn list_sessions(&self, user_id: UserId, limit: usize) -> Result<Vec<StudySession>>;
}

/// Open PostgreSQL when a URL is configured, the in-memory store otherwise.
pub async fn open(database_url: Option<&str>) -> Result<Arc<dyn Store>> {
    match database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(url).await?;

            tracing::info!("Running migrations...");
            db.run_migrations().await?;

            Ok(Arc::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
