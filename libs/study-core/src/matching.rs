//! Answer checking for write mode.

use crate::types::MatchingMode;
use serde::{Deserialize, Serialize};

/// Outcome of comparing a typed answer with a card's back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerCheck {
    pub is_correct: bool,
    /// Similarity between 0.0 and 1.0.
    pub similarity: f64,
    pub matching_mode: MatchingMode,
}

/// Decides whether a typed answer matches the expected one.
pub trait AnswerChecker: Send + Sync {
    fn check(&self, typed: &str, expected: &str) -> AnswerCheck;
}

/// Built-in checker: whitespace-normalized comparison under a matching mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerPolicy {
    pub mode: MatchingMode,
    /// Minimum similarity for `Fuzzy`.
    pub fuzzy_threshold: f64,
}

impl Default for AnswerPolicy {
    fn default() -> Self {
        Self {
            mode: MatchingMode::CaseInsensitive,
            fuzzy_threshold: 0.8,
        }
    }
}

impl AnswerChecker for AnswerPolicy {
    fn check(&self, typed: &str, expected: &str) -> AnswerCheck {
        let typed = normalize_whitespace(typed);
        let expected = normalize_whitespace(expected);

        let (is_correct, similarity) = match self.mode {
            MatchingMode::Exact => exact(typed == expected),
            MatchingMode::CaseInsensitive => exact(typed.to_lowercase() == expected.to_lowercase()),
            MatchingMode::Fuzzy => {
                let similarity =
                    normalized_similarity(&typed.to_lowercase(), &expected.to_lowercase());
                (similarity >= self.fuzzy_threshold, similarity)
            }
        };

        AnswerCheck {
            is_correct,
            similarity,
            matching_mode: self.mode,
        }
    }
}

fn exact(equal: bool) -> (bool, f64) {
    (equal, if equal { 1.0 } else { 0.0 })
}

/// Trim and collapse runs of whitespace.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Levenshtein distance in chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // two rows are enough
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(substitution);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity in 0.0..=1.0 derived from the Levenshtein distance.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}
