//! Due-set selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::Card;

/// Card counts for a deck at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeckCounts {
    pub total: usize,
    /// Never reviewed.
    pub new: usize,
    /// Due now, new cards included.
    pub due: usize,
}

/// Select the cards due at `now`, at most `limit` of them.
///
/// New cards come first, then overdue cards by oldest due date; ties are
/// broken by card id so repeated calls return the same sequence.
pub fn select_due(cards: &[Card], now: DateTime<Utc>, limit: usize) -> Result<Vec<Card>> {
    if limit == 0 {
        return Err(CoreError::InvalidLimit);
    }

    let mut due: Vec<&Card> = cards.iter().filter(|c| c.state.is_due(now)).collect();
    // `None` sorts before `Some`, which puts never-reviewed cards first.
    due.sort_by(|a, b| {
        a.state
            .due_date
            .cmp(&b.state.due_date)
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(due.into_iter().take(limit).cloned().collect())
}

/// Count total, new and due cards.
pub fn deck_counts(cards: &[Card], now: DateTime<Utc>) -> DeckCounts {
    cards.iter().fold(
        DeckCounts {
            total: cards.len(),
            ..Default::default()
        },
        |mut counts, card| {
            if card.state.is_new() {
                counts.new += 1;
            }
            if card.state.is_due(now) {
                counts.due += 1;
            }
            counts
        },
    )
}
