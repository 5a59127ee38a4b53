//! Spaced repetition scheduling.

pub mod sm2;

use std::sync::Arc;

use crate::types::{MemoryState, Quality};
use chrono::{DateTime, Utc};

/// Result of scheduling a card after review.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    pub new_state: MemoryState,
    pub next_due: DateTime<Utc>,
}

/// Trait for spaced repetition algorithms.
///
/// Implementations are pure: the same `(state, quality, now)` always yields
/// the same result.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next state after a review.
    fn schedule(&self, state: &MemoryState, quality: Quality, now: DateTime<Utc>) -> SchedulingResult;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Arc<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Arc::new(sm2::Sm2::default())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_algorithm() {
        assert_eq!(get_algorithm("sm2").map(|a| a.name()), Some("sm2"));
        assert!(get_algorithm("leitner").is_none());
    }
}
