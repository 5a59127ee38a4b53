//! Card endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use study_core::select_due;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::bounded_limit;
use crate::services::{access, review};
use crate::AppState;

const MAX_DUE_CARDS: usize = 100;

/// GET /cards/deck/:deck_id/due
pub async fn due(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<DeckId>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Card>>> {
    let limit = bounded_limit(query.limit, state.study.default_limit, MAX_DUE_CARDS)?;
    access::owned_deck(state.store.as_ref(), auth.user_id, deck_id).await?;
    let cards = state.store.deck_cards(deck_id).await?;

    let due = select_due(&cards, Utc::now(), limit)?;
    Ok(Json(due))
}

/// POST /cards/:card_id/review
pub async fn review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(card_id): Path<CardId>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<Card>> {
    let quality = Quality::parse(payload.quality)?;
    access::owned_card(state.store.as_ref(), auth.user_id, card_id).await?;

    let card = review::commit_review(
        state.store.as_ref(),
        &state.card_locks,
        state.algorithm.as_ref(),
        card_id,
        quality,
        Utc::now(),
    )
    .await?;

    Ok(Json(card))
}
