//! Study endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use rand::seq::IndexedRandom;
use study_core::modes::{MatchMode, MultipleChoiceMode, WriteMode};
use study_core::select_due;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::bounded_limit;
use crate::services::{access, review};
use crate::AppState;

const MAX_FLASHCARDS: usize = 100;
const MAX_MATCH_PAIRS: usize = 20;

/// GET /study/flashcards/:deck_id
///
/// Falls back to the whole deck when nothing is due.
pub async fn flashcards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<DeckId>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<FlashcardsResponse>> {
    let limit = bounded_limit(query.limit, state.study.default_limit, MAX_FLASHCARDS)?;
    access::owned_deck(state.store.as_ref(), auth.user_id, deck_id).await?;
    let cards = state.store.deck_cards(deck_id).await?;

    let mut due = select_due(&cards, Utc::now(), limit)?;
    if due.is_empty() {
        due = cards.into_iter().take(limit).collect();
    }

    Ok(Json(FlashcardsResponse { cards: due }))
}

/// GET /study/multiple-choice/:deck_id/:card_id
pub async fn multiple_choice(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((deck_id, card_id)): Path<(DeckId, CardId)>,
) -> Result<Json<MultipleChoiceResponse>> {
    access::owned_deck(state.store.as_ref(), auth.user_id, deck_id).await?;
    let cards = state.store.deck_cards(deck_id).await?;

    let card = cards
        .iter()
        .find(|c| c.id == card_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("Card not found in deck".to_string()))?;

    let mode = MultipleChoiceMode {
        option_count: state.study.choice_option_count,
    };
    let question = mode.question(&card, &cards, &mut rand::rng());

    Ok(Json(MultipleChoiceResponse {
        card,
        options: question.options,
        correct_index: question.correct_index,
    }))
}

/// POST /study/write/check
///
/// The review is committed as part of the check.
pub async fn write_check(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<WriteCheckRequest>,
) -> Result<Json<WriteCheckResponse>> {
    let card = access::owned_card(state.store.as_ref(), auth.user_id, payload.card_id).await?;

    let outcome = WriteMode::new(state.study.answer_policy()).check(&card, &payload.answer);

    review::commit_review(
        state.store.as_ref(),
        &state.card_locks,
        state.algorithm.as_ref(),
        card.id,
        outcome.quality,
        Utc::now(),
    )
    .await?;

    tracing::debug!(card_id = %card.id, is_correct = outcome.is_correct, similarity = outcome.similarity, "write answer checked");

    Ok(Json(WriteCheckResponse {
        is_correct: outcome.is_correct,
        quality: outcome.quality,
        correct_answer: outcome.correct_answer,
    }))
}

/// GET /study/match/:deck_id
pub async fn match_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<DeckId>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<MatchResponse>> {
    let limit = bounded_limit(query.limit, state.study.match_batch_size, MAX_MATCH_PAIRS)?;
    access::owned_deck(state.store.as_ref(), auth.user_id, deck_id).await?;
    let cards = state.store.deck_cards(deck_id).await?;

    let board = {
        let mut rng = rand::rng();
        let batch: Vec<Card> = cards.choose_multiple(&mut rng, limit).cloned().collect();
        MatchMode::default().board(&batch, &mut rng)
    };

    Ok(Json(MatchResponse {
        terms: board.terms().into_iter().map(str::to_owned).collect(),
        definitions: board.definitions().into_iter().map(str::to_owned).collect(),
        pairs: board
            .pairs()
            .iter()
            .map(|p| (p.term.clone(), p.definition.clone()))
            .collect(),
    }))
}
