//! Deck endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use study_core::deck_counts;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::access;
use crate::AppState;

/// GET /decks/:deck_id/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<DeckId>,
) -> Result<Json<DeckStatsResponse>> {
    access::owned_deck(state.store.as_ref(), auth.user_id, deck_id).await?;
    let cards = state.store.deck_cards(deck_id).await?;

    Ok(Json(DeckStatsResponse {
        deck_id,
        counts: deck_counts(&cards, Utc::now()),
    }))
}
