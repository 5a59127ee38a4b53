//! PostgreSQL store tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running them with `--ignored`.

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use chrono::Utc;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use minddeck_backend::config::StudyConfig;
use minddeck_backend::db::{Database, Store};
use minddeck_backend::error::ApiError;
use minddeck_backend::models::{Card, SessionLifecycle, SessionResponse, StudyMode, StudySession};
use minddeck_backend::{build_router, AppState};

async fn connect() -> Arc<Database> {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    db.run_migrations().await.expect("Failed to run migrations");
    Arc::new(db)
}

/// Test a review round-trips the memory state through PostgreSQL.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_persists() {
    let db = connect().await;
    let user = db.create_user(&Uuid::new_v4().to_string()).await.unwrap();
    let deck = db.create_deck(user.id, "Postgres deck").await.unwrap();
    let card = db.create_card(deck.id, "hola", "hello").await.unwrap();

    let server = TestServer::new(build_router(AppState::new(db.clone(), StudyConfig::default()))).unwrap();
    let response = server
        .post(&format!("/cards/{}/review", card.id))
        .add_header(AUTHORIZATION, format!("Bearer {}", user.token))
        .json(&serde_json::json!({ "quality": 3 }))
        .await;

    response.assert_status_ok();
    let reviewed: Card = response.json();
    let stored = db.get_card(card.id).await.unwrap().unwrap();
    assert_eq!(stored.state.review_count, 1);
    assert_eq!(stored.state.interval, reviewed.state.interval);
    assert_eq!(stored.state.ease_factor, reviewed.state.ease_factor);
}

/// Test a session record is written when started and finished.
#[tokio::test]
#[ignore = "requires database"]
async fn test_session_persists() {
    let db = connect().await;
    let user = db.create_user(&Uuid::new_v4().to_string()).await.unwrap();
    let deck = db.create_deck(user.id, "Postgres deck").await.unwrap();
    db.create_card(deck.id, "perro", "dog").await.unwrap();

    let server = TestServer::new(build_router(AppState::new(db.clone(), StudyConfig::default()))).unwrap();
    let response = server
        .post("/study/session")
        .add_header(AUTHORIZATION, format!("Bearer {}", user.token))
        .json(&serde_json::json!({ "deck_id": deck.id, "mode": StudyMode::Write }))
        .await;
    let session: SessionResponse = response.json();
    assert_eq!(session.status, SessionLifecycle::Active);

    server
        .post(&format!("/study/session/{}/answer", session.session.id))
        .add_header(AUTHORIZATION, format!("Bearer {}", user.token))
        .json(&serde_json::json!({ "response": { "kind": "written", "answer": "dog" } }))
        .await
        .assert_status_ok();

    let stored = db.get_session(session.session.id).await.unwrap().unwrap();
    assert_eq!(stored.cards_studied, 1);
    assert_eq!(stored.cards_correct, 1);
    assert!(stored.finished_at.is_some());

    let sessions = db.list_sessions(user.id, 10).await.unwrap();
    assert_eq!(sessions.len(), 1);
}

/// Test updating a session that was never inserted reports not found.
#[tokio::test]
#[ignore = "requires database"]
async fn test_update_unknown_session() {
    let db = connect().await;
    let session = StudySession::new(Uuid::new_v4(), Uuid::new_v4(), StudyMode::Flashcards, Utc::now());

    let result = db.update_session(&session).await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}
