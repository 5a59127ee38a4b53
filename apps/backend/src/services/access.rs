//! Ownership checks for deck- and card-scoped requests.

use crate::db::Store;
use crate::error::{ApiError, Result};
use crate::models::{Card, CardId, Deck, DeckId, UserId};

/// Load a deck, failing with 404 when missing and 403 when owned by someone else.
pub async fn owned_deck(store: &dyn Store, user_id: UserId, deck_id: DeckId) -> Result<Deck> {
    let deck = store
        .get_deck(deck_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    if deck.user_id != user_id {
        tracing::debug!(%deck_id, %user_id, "deck access denied");
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }
    Ok(deck)
}

/// Load a card whose deck belongs to `user_id`.
pub async fn owned_card(store: &dyn Store, user_id: UserId, card_id: CardId) -> Result<Card> {
    let card = store
        .get_card(card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    owned_deck(store, user_id, card.deck_id).await?;
    Ok(card)
}
