//! A store whose card writes can be made to fail.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use minddeck_backend::db::{MemoryStore, Store};
use minddeck_backend::error::{ApiError, Result};
use minddeck_backend::models::{Card, CardId, Deck, DeckId, SessionId, StudySession, User, UserId};

/// Delegates to a [`MemoryStore`]; the next `failures` card saves error out.
pub struct FlakyStore {
    inner: Arc<MemoryStore>,
    failures: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(0),
        }
    }

    pub fn fail_next_saves(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for FlakyStore {
    async fn create_user(&self, token: &str) -> Result<User> {
        self.inner.create_user(token).await
    }

    async fn user_by_token(&self, token: &str) -> Result<Option<User>> {
        self.inner.user_by_token(token).await
    }

    async fn create_deck(&self, user_id: UserId, name: &str) -> Result<Deck> {
        self.inner.create_deck(user_id, name).await
    }

    async fn get_deck(&self, deck_id: DeckId) -> Result<Option<Deck>> {
        self.inner.get_deck(deck_id).await
    }

    async fn create_card(&self, deck_id: DeckId, front: &str, back: &str) -> Result<Card> {
        self.inner.create_card(deck_id, front, back).await
    }

    async fn get_card(&self, card_id: CardId) -> Result<Option<Card>> {
        self.inner.get_card(card_id).await
    }

    async fn deck_cards(&self, deck_id: DeckId) -> Result<Vec<Card>> {
        self.inner.deck_cards(deck_id).await
    }

    async fn save_card_state(&self, card: &Card) -> Result<()> {
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ApiError::Internal("card write failed".to_string()));
        }
        self.inner.save_card_state(card).await
    }

    async fn insert_session(&self, session: &StudySession) -> Result<()> {
        self.inner.insert_session(session).await
    }

    async fn update_session(&self, session: &StudySession) -> Result<()> {
        self.inner.update_session(session).await
    }

    async fn get_session(&self, session_id: SessionId) -> Result<Option<StudySession>> {
        self.inner.get_session(session_id).await
    }

    async fn list_sessions(&self, user_id: UserId, limit: usize) -> Result<Vec<StudySession>> {
        self.inner.list_sessions(user_id, limit).await
    }
}
