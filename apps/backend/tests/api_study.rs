//! Study API tests.

mod common;

use std::collections::HashSet;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use minddeck_backend::config::StudyConfig;
use minddeck_backend::models::{FlashcardsResponse, MatchResponse, MultipleChoiceResponse, WriteCheckResponse};
use study_core::{MatchingMode, Quality};

use common::fixtures;
use common::TestContext;

/// Test flashcards returns the due cards.
#[tokio::test]
async fn test_flashcards_returns_due_cards() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (deck, _) = ctx.create_deck(user_id, &[("hola", "hello")]).await;
    ctx.insert_card(fixtures::reviewed_card(deck.id, "casa", "house", 7)).await;

    let response = server
        .get(&format!("/study/flashcards/{}", deck.id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: FlashcardsResponse = response.json();
    assert_eq!(body.cards.len(), 1);
    assert_eq!(body.cards[0].front, "hola");
}

/// Test flashcards falls back to the whole deck when nothing is due.
#[tokio::test]
async fn test_flashcards_falls_back_to_deck() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (deck, _) = ctx.create_deck(user_id, &[]).await;
    for (front, back) in fixtures::SPANISH {
        ctx.insert_card(fixtures::reviewed_card(deck.id, front, back, 10)).await;
    }

    let response = server
        .get(&format!("/study/flashcards/{}?limit=4", deck.id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: FlashcardsResponse = response.json();
    assert_eq!(body.cards.len(), 4);
}

/// Test flashcards limit must be within 1..=100.
#[tokio::test]
async fn test_flashcards_limit_bounds() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (deck, _) = ctx.create_deck(user_id, fixtures::SPANISH).await;

    for limit in [0, 101] {
        let response = server
            .get(&format!("/study/flashcards/{}?limit={}", deck.id, limit))
            .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

/// Test multiple choice offers four distinct options including the answer.
#[tokio::test]
async fn test_multiple_choice_options() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (deck, cards) = ctx.create_deck(user_id, fixtures::SPANISH).await;

    let response = server
        .get(&format!("/study/multiple-choice/{}/{}", deck.id, cards[3].id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: MultipleChoiceResponse = response.json();
    assert_eq!(body.card.id, cards[3].id);
    assert_eq!(body.options.len(), 4);
    assert_eq!(body.options[body.correct_index], "dog");
    let distinct: HashSet<&String> = body.options.iter().collect();
    assert_eq!(distinct.len(), 4);
}

/// Test multiple choice on a two-card deck degrades to two options.
#[tokio::test]
async fn test_multiple_choice_small_deck() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (deck, cards) = ctx.create_deck(user_id, &[("sí", "yes"), ("no", "no")]).await;

    let response = server
        .get(&format!("/study/multiple-choice/{}/{}", deck.id, cards[0].id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: MultipleChoiceResponse = response.json();
    assert_eq!(body.options.len(), 2);
    assert_eq!(body.options[body.correct_index], "yes");
}

/// Test multiple choice for a card outside the deck returns not found.
#[tokio::test]
async fn test_multiple_choice_card_not_in_deck() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (deck, _) = ctx.create_deck(user_id, fixtures::SPANISH).await;
    let (_, other_cards) = ctx.create_deck(user_id, &[("uno", "one")]).await;

    let response = server
        .get(&format!("/study/multiple-choice/{}/{}", deck.id, other_cards[0].id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

/// Test a correct written answer scores 5 and commits the review.
#[tokio::test]
async fn test_write_check_correct() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (_, cards) = ctx.create_deck(user_id, fixtures::SPANISH).await;

    let response = server
        .post("/study/write/check")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::write_check_request(cards[2].id, "  Thank   You "))
        .await;

    response.assert_status_ok();
    let body: WriteCheckResponse = response.json();
    assert!(body.is_correct);
    assert_eq!(body.quality, Quality::Perfect);
    assert_eq!(body.correct_answer, "thank you");

    let stored = ctx.get_card(cards[2].id).await;
    assert_eq!(stored.state.review_count, 1);
}

/// Test a wrong written answer scores 1 and reveals the answer.
#[tokio::test]
async fn test_write_check_incorrect() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (_, cards) = ctx.create_deck(user_id, fixtures::SPANISH).await;

    let response = server
        .post("/study/write/check")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::write_check_request(cards[3].id, "cat"))
        .await;

    response.assert_status_ok();
    let body: WriteCheckResponse = response.json();
    assert!(!body.is_correct);
    assert_eq!(body.quality, Quality::Hard);
    assert_eq!(body.correct_answer, "dog");

    let stored = ctx.get_card(cards[3].id).await;
    assert_eq!(stored.state.review_count, 1);
    assert_eq!(stored.state.interval, 1);
}

/// Test fuzzy matching accepts a near miss when configured.
#[tokio::test]
async fn test_write_check_fuzzy() {
    let ctx = TestContext::with_config(StudyConfig {
        answer_matching: MatchingMode::Fuzzy,
        ..StudyConfig::default()
    })
    .await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (_, cards) = ctx.create_deck(user_id, &[("alojamiento", "accommodation")]).await;

    let response = server
        .post("/study/write/check")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::write_check_request(cards[0].id, "accomodation"))
        .await;

    response.assert_status_ok();
    let body: WriteCheckResponse = response.json();
    assert!(body.is_correct);
}

/// Test write check on another user's card is forbidden.
#[tokio::test]
async fn test_write_check_forbidden() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, _) = ctx.create_test_user().await;
    let (_, token) = ctx.create_test_user().await;
    let (_, cards) = ctx.create_deck(owner_id, fixtures::SPANISH).await;

    let response = server
        .post("/study/write/check")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::write_check_request(cards[0].id, "hello"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(ctx.get_card(cards[0].id).await.state.review_count, 0);
}

/// Test match returns a shuffled batch of the default size.
#[tokio::test]
async fn test_match_batch() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let pairs = fixtures::numbered_pairs(14);
    let refs: Vec<(&str, &str)> = pairs.iter().map(|(t, d)| (t.as_str(), d.as_str())).collect();
    let (deck, _) = ctx.create_deck(user_id, &refs).await;

    let response = server
        .get(&format!("/study/match/{}", deck.id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: MatchResponse = response.json();
    assert_eq!(body.pairs.len(), 10);

    let mut terms = body.terms.clone();
    let mut definitions = body.definitions.clone();
    let mut expected_terms: Vec<String> = body.pairs.iter().map(|(t, _)| t.clone()).collect();
    let mut expected_definitions: Vec<String> = body.pairs.iter().map(|(_, d)| d.clone()).collect();
    terms.sort();
    definitions.sort();
    expected_terms.sort();
    expected_definitions.sort();
    assert_eq!(terms, expected_terms);
    assert_eq!(definitions, expected_definitions);

    for (term, definition) in &body.pairs {
        let i = term.trim_start_matches("term ");
        assert_eq!(definition, &format!("definition {i}"));
    }
}

/// Test match limit must be within 1..=20.
#[tokio::test]
async fn test_match_limit_bounds() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let (deck, _) = ctx.create_deck(user_id, fixtures::SPANISH).await;

    let response = server
        .get(&format!("/study/match/{}?limit=3", deck.id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    response.assert_status_ok();
    let body: MatchResponse = response.json();
    assert_eq!(body.terms.len(), 3);

    let response = server
        .get(&format!("/study/match/{}?limit=21", deck.id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test study endpoints require authentication.
#[tokio::test]
async fn test_study_requires_auth() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get(&format!("/study/match/{}", Uuid::new_v4())).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
