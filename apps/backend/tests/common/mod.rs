//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up the app over an in-memory store
//! - Helper functions for seeding users, decks and cards
//! - Authentication helpers

#![allow(dead_code)]

pub mod fixtures;
pub mod flaky;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use minddeck_backend::config::StudyConfig;
use minddeck_backend::db::{MemoryStore, Store};
use minddeck_backend::models::{Card, Deck, StudySession};
use minddeck_backend::{build_router, AppState};

use flaky::FlakyStore;

/// Test context containing the store and router.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// Create a new test context with default study settings.
    pub async fn new() -> Self {
        Self::with_config(StudyConfig::default()).await
    }

    pub async fn with_config(study: StudyConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), study);
        let app = build_router(state.clone());

        Self { store, state, app }
    }

    /// Serve through a [`FlakyStore`] wrapping the seeding store.
    pub async fn with_flaky_store() -> (Self, Arc<FlakyStore>) {
        let store = Arc::new(MemoryStore::new());
        let flaky = Arc::new(FlakyStore::new(store.clone()));
        let state = AppState::new(flaky.clone(), StudyConfig::default());
        let app = build_router(state.clone());

        (Self { store, state, app }, flaky)
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self) -> (Uuid, String) {
        let token = Uuid::new_v4().to_string();
        let user = self
            .store
            .create_user(&token)
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Create a deck with one card per (front, back) pair.
    pub async fn create_deck(&self, user_id: Uuid, pairs: &[(&str, &str)]) -> (Deck, Vec<Card>) {
        let deck = self
            .store
            .create_deck(user_id, "Test deck")
            .await
            .expect("Failed to create deck");

        let mut cards = Vec::with_capacity(pairs.len());
        for (front, back) in pairs {
            let card = self
                .store
                .create_card(deck.id, front, back)
                .await
                .expect("Failed to create card");
            cards.push(card);
        }
        (deck, cards)
    }

    /// Insert a prepared card, memory state included.
    pub async fn insert_card(&self, card: Card) {
        self.store.insert_card(card).await;
    }

    pub async fn get_card(&self, card_id: Uuid) -> Card {
        self.store
            .get_card(card_id)
            .await
            .expect("Failed to load card")
            .expect("Card should exist")
    }

    pub async fn get_session(&self, session_id: Uuid) -> StudySession {
        self.store
            .get_session(session_id)
            .await
            .expect("Failed to load session")
            .expect("Session should exist")
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }
}
