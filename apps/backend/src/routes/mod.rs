pub mod auth;
pub mod cards;
pub mod decks;
pub mod sessions;
pub mod study;

use crate::error::{ApiError, Result};

/// Resolve an optional `limit` query parameter against a default and an
/// inclusive upper bound.
pub(crate) fn bounded_limit(limit: Option<usize>, default: usize, max: usize) -> Result<usize> {
    match limit {
        None => Ok(default.min(max)),
        Some(n) if (1..=max).contains(&n) => Ok(n),
        Some(n) => Err(ApiError::BadRequest(format!("limit must be between 1 and {max}, got {n}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_limit() {
        assert_eq!(bounded_limit(None, 20, 100).unwrap(), 20);
        assert_eq!(bounded_limit(None, 20, 10).unwrap(), 10);
        assert_eq!(bounded_limit(Some(100), 20, 100).unwrap(), 100);
        assert!(bounded_limit(Some(0), 20, 100).is_err());
        assert!(bounded_limit(Some(101), 20, 100).is_err());
    }
}
