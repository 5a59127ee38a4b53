//! Test fixtures and factory functions for creating test data.

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use minddeck_backend::models::{Card, StudyMode};

/// A small Spanish vocabulary deck.
pub const SPANISH: &[(&str, &str)] = &[
    ("hola", "hello"),
    ("adiós", "goodbye"),
    ("gracias", "thank you"),
    ("perro", "dog"),
    ("gato", "cat"),
    ("casa", "house"),
];

/// `count` distinct (front, back) pairs.
pub fn numbered_pairs(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| (format!("term {i}"), format!("definition {i}")))
        .collect()
}

/// A card already reviewed once, due `due_in_days` from now (negative for overdue).
pub fn reviewed_card(deck_id: Uuid, front: &str, back: &str, due_in_days: i64) -> Card {
    let now = Utc::now();
    let mut card = Card::new(deck_id, front, back);
    card.state.review_count = 1;
    card.state.interval = 1;
    card.state.stability = 1.0;
    card.state.last_review = Some(now - Duration::days(1));
    card.state.due_date = Some(now + Duration::days(due_in_days));
    card
}

/// Create a review request body.
pub fn review_request(quality: i64) -> serde_json::Value {
    json!({ "quality": quality })
}

/// Create a write check request body.
pub fn write_check_request(card_id: Uuid, answer: &str) -> serde_json::Value {
    json!({ "card_id": card_id, "answer": answer })
}

/// Create a session request body.
pub fn create_session_request(deck_id: Uuid, mode: StudyMode) -> serde_json::Value {
    json!({ "deck_id": deck_id, "mode": mode })
}

pub fn self_rating(quality: i64) -> serde_json::Value {
    json!({ "response": { "kind": "self_rating", "quality": quality } })
}

pub fn choice(index: usize) -> serde_json::Value {
    json!({ "response": { "kind": "choice", "index": index } })
}

pub fn written(answer: &str) -> serde_json::Value {
    json!({ "response": { "kind": "written", "answer": answer } })
}

pub fn pair(term: usize, definition: usize) -> serde_json::Value {
    json!({ "response": { "kind": "pair", "term": term, "definition": definition } })
}
