//! In-memory store, used by tests and database-less runs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::{ApiError, Result};
use crate::models::*;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    decks: HashMap<DeckId, Deck>,
    cards: HashMap<CardId, Card>,
    sessions: HashMap<SessionId, StudySession>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a card as-is, memory state included.
    pub async fn insert_card(&self, card: Card) {
        self.tables.write().await.cards.insert(card.id, card);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, token: &str) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.token == token) {
            return Err(ApiError::Conflict("Token already in use".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            token: token.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_token(&self, token: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.token == token).cloned())
    }

    async fn create_deck(&self, user_id: UserId, name: &str) -> Result<Deck> {
        let deck = Deck {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tables.write().await.decks.insert(deck.id, deck.clone());
        Ok(deck)
    }

    async fn get_deck(&self, deck_id: DeckId) -> Result<Option<Deck>> {
        Ok(self.tables.read().await.decks.get(&deck_id).cloned())
    }

    async fn create_card(&self, deck_id: DeckId, front: &str, back: &str) -> Result<Card> {
        let mut tables = self.tables.write().await;
        if !tables.decks.contains_key(&deck_id) {
            return Err(ApiError::NotFound(format!("Deck {} not found", deck_id)));
        }
        let card = Card::new(deck_id, front, back);
        tables.cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn get_card(&self, card_id: CardId) -> Result<Option<Card>> {
        Ok(self.tables.read().await.cards.get(&card_id).cloned())
    }

    async fn deck_cards(&self, deck_id: DeckId) -> Result<Vec<Card>> {
        let tables = self.tables.read().await;
        let mut cards: Vec<Card> = tables
            .cards
            .values()
            .filter(|c| c.deck_id == deck_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(cards)
    }

    async fn save_card_state(&self, card: &Card) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .cards
            .get_mut(&card.id)
            .ok_or_else(|| ApiError::NotFound(format!("Card {} not found", card.id)))?;
        stored.state = card.state.clone();
        stored.updated_at = card.updated_at;
        Ok(())
    }

    async fn insert_session(&self, session: &StudySession) -> Result<()> {
        self.tables
            .write()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn update_session(&self, session: &StudySession) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .sessions
            .get_mut(&session.id)
            .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", session.id)))?;
        let finished_at = stored.finished_at.or(session.finished_at);
        *stored = session.clone();
        stored.finished_at = finished_at;
        Ok(())
    }

    async fn get_session(&self, session_id: SessionId) -> Result<Option<StudySession>> {
        Ok(self.tables.read().await.sessions.get(&session_id).cloned())
    }

    async fn list_sessions(&self, user_id: UserId, limit: usize) -> Result<Vec<StudySession>> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<StudySession> = tables
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at).then_with(|| b.id.cmp(&a.id)));
        sessions.truncate(limit);
        Ok(sessions)
    }
}
