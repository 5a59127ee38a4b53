//! Committing reviews.
//!
//! Every write of a card's memory state goes through [`commit_review`], which
//! serializes writers per card and schedules over the latest committed state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use study_core::SpacedRepetitionAlgorithm;
use tokio::sync::OwnedMutexGuard;

use crate::db::Store;
use crate::error::{ApiError, Result};
use crate::models::{Card, CardId, Quality};

/// Stale entries are pruned once the table grows past this.
const PRUNE_THRESHOLD: usize = 1024;

/// Per-card async locks.
#[derive(Default)]
pub struct CardLocks {
    locks: Mutex<HashMap<CardId, Arc<tokio::sync::Mutex<()>>>>,
}

impl CardLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, card_id: CardId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            if locks.len() > PRUNE_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks.entry(card_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// Apply `quality` to the latest committed state of the card and persist it.
pub async fn commit_review(
    store: &dyn Store,
    locks: &CardLocks,
    algorithm: &dyn SpacedRepetitionAlgorithm,
    card_id: CardId,
    quality: Quality,
    now: DateTime<Utc>,
) -> Result<Card> {
    let _guard = locks.lock(card_id).await;

    let mut card = store
        .get_card(card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    let before = card.state.interval;
    let result = algorithm.schedule(&card.state, quality, now);
    card.state = result.new_state;
    card.updated_at = now;
    store.save_card_state(&card).await?;

    tracing::info!(
        %card_id,
        quality = quality.to_value(),
        interval_before = before,
        interval_after = card.state.interval,
        due = %result.next_due,
        "review committed"
    );

    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use study_core::Sm2;

    async fn seeded() -> (MemoryStore, Card) {
        let store = MemoryStore::new();
        let user = store.create_user("t").await.unwrap();
        let deck = store.create_deck(user.id, "deck").await.unwrap();
        let card = store.create_card(deck.id, "front", "back").await.unwrap();
        (store, card)
    }

    #[tokio::test]
    async fn test_commit_persists_new_state() {
        let (store, card) = seeded().await;
        let now = Utc::now();

        let updated = commit_review(&store, &CardLocks::new(), &Sm2::default(), card.id, Quality::Perfect, now)
            .await
            .unwrap();

        assert_eq!(updated.state.review_count, 1);
        assert_eq!(updated.state.due_date, Some(now + chrono::Duration::days(1)));
        let stored = store.get_card(card.id).await.unwrap().unwrap();
        assert_eq!(stored.state, updated.state);
    }

    #[tokio::test]
    async fn test_concurrent_reviews_build_on_each_other() {
        let (store, card) = seeded().await;
        let store = Arc::new(store);
        let locks = Arc::new(CardLocks::new());
        let now = Utc::now();
        let card_id = card.id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let locks = locks.clone();
                tokio::spawn(async move {
                    commit_review(store.as_ref(), &locks, &Sm2::default(), card_id, Quality::Good, now)
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = store.get_card(card.id).await.unwrap().unwrap();
        assert_eq!(stored.state.review_count, 8);
    }

    #[tokio::test]
    async fn test_unknown_card_is_not_found() {
        let store = MemoryStore::new();
        let result = commit_review(
            &store,
            &CardLocks::new(),
            &Sm2::default(),
            uuid::Uuid::new_v4(),
            Quality::Good,
            Utc::now(),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
