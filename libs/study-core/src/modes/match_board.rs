//! Match: pair every term with its definition.
//!
//! All terms and definitions of a batch are visible at once. A correct pair
//! is removed from further selection; a wrong pair stays highlighted as
//! pending for a short delay and is then cleared without penalty.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::quality::{match_quality, MatchScoring};
use crate::types::{Card, CardId, Quality};

use super::Resolution;

/// Ground-truth pair for one card of the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub card_id: CardId,
    pub term: String,
    pub definition: String,
}

/// A wrong pair waiting to be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMismatch {
    pub term: usize,
    pub definition: usize,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched { card_id: CardId },
    Mismatch { expires_at: DateTime<Utc> },
}

/// What the learner sees of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub terms: Vec<String>,
    pub definitions: Vec<String>,
    pub matched_terms: Vec<usize>,
    pub matched_definitions: Vec<usize>,
    pub pending: Option<PendingMismatch>,
}

#[derive(Debug, Clone)]
pub struct MatchMode {
    pub pending_delay: Duration,
    pub scoring: MatchScoring,
}

impl Default for MatchMode {
    fn default() -> Self {
        Self {
            pending_delay: Duration::seconds(1),
            scoring: MatchScoring::Neutral,
        }
    }
}

impl MatchMode {
    pub fn board<R: Rng + ?Sized>(&self, cards: &[Card], rng: &mut R) -> MatchBoard {
        MatchBoard::new(cards, self.pending_delay, rng)
    }

    pub fn resolve(
        &self,
        board: &mut MatchBoard,
        term: usize,
        definition: usize,
        now: DateTime<Utc>,
    ) -> Result<Resolution> {
        let term_card = board.card_at_term(term)?;
        let resolution = match board.propose(term, definition, now)? {
            MatchOutcome::Matched { card_id } => {
                let quality = match_quality(self.scoring);
                Resolution {
                    card_id,
                    quality,
                    // A configured failing quality counts the pair as incorrect.
                    is_correct: quality.map_or(true, Quality::is_pass),
                    correct_answer: None,
                    completes_item: true,
                }
            }
            MatchOutcome::Mismatch { .. } => Resolution {
                card_id: term_card,
                quality: None,
                is_correct: false,
                correct_answer: None,
                completes_item: false,
            },
        };
        Ok(resolution)
    }
}

#[derive(Debug, Clone)]
pub struct MatchBoard {
    pairs: Vec<MatchPair>,
    /// Slot -> pair index.
    term_order: Vec<usize>,
    definition_order: Vec<usize>,
    term_matched: Vec<bool>,
    definition_matched: Vec<bool>,
    pending: Option<PendingMismatch>,
    pending_delay: Duration,
}

impl MatchBoard {
    pub fn new<R: Rng + ?Sized>(cards: &[Card], pending_delay: Duration, rng: &mut R) -> Self {
        let pairs: Vec<MatchPair> = cards
            .iter()
            .map(|c| MatchPair {
                card_id: c.id,
                term: c.front.clone(),
                definition: c.back.clone(),
            })
            .collect();

        let mut term_order: Vec<usize> = (0..pairs.len()).collect();
        let mut definition_order = term_order.clone();
        term_order.shuffle(rng);
        definition_order.shuffle(rng);

        Self {
            term_matched: vec![false; pairs.len()],
            definition_matched: vec![false; pairs.len()],
            pairs,
            term_order,
            definition_order,
            pending: None,
            pending_delay,
        }
    }

    pub fn pairs(&self) -> &[MatchPair] {
        &self.pairs
    }

    /// Terms in display order.
    pub fn terms(&self) -> Vec<&str> {
        self.term_order.iter().map(|&i| self.pairs[i].term.as_str()).collect()
    }

    /// Definitions in display order.
    pub fn definitions(&self) -> Vec<&str> {
        self.definition_order
            .iter()
            .map(|&i| self.pairs[i].definition.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.term_matched.iter().filter(|m| **m).count()
    }

    pub fn is_complete(&self) -> bool {
        self.term_matched.iter().all(|m| *m)
    }

    fn card_at_term(&self, slot: usize) -> Result<CardId> {
        self.term_order
            .get(slot)
            .map(|&i| self.pairs[i].card_id)
            .ok_or(CoreError::MatchSlotOutOfRange {
                index: slot,
                count: self.pairs.len(),
            })
    }

    fn check_slot(&self, slot: usize, matched: &[bool]) -> Result<()> {
        match matched.get(slot) {
            None => Err(CoreError::MatchSlotOutOfRange {
                index: slot,
                count: matched.len(),
            }),
            Some(true) => Err(CoreError::AlreadyMatched { index: slot }),
            Some(false) => Ok(()),
        }
    }

    /// Propose that the term in `term` slot goes with the definition in
    /// `definition` slot. Any earlier pending mismatch is replaced.
    pub fn propose(&mut self, term: usize, definition: usize, now: DateTime<Utc>) -> Result<MatchOutcome> {
        self.check_slot(term, &self.term_matched)?;
        self.check_slot(definition, &self.definition_matched)?;
        self.pending = None;

        let term_pair = &self.pairs[self.term_order[term]];
        let definition_pair = &self.pairs[self.definition_order[definition]];

        // Cards sharing a back are interchangeable.
        if term_pair.definition == definition_pair.definition {
            let card_id = term_pair.card_id;
            self.term_matched[term] = true;
            self.definition_matched[definition] = true;
            Ok(MatchOutcome::Matched { card_id })
        } else {
            let expires_at = now + self.pending_delay;
            self.pending = Some(PendingMismatch {
                term,
                definition,
                expires_at,
            });
            Ok(MatchOutcome::Mismatch { expires_at })
        }
    }

    /// The pending mismatch, if it has not expired yet.
    pub fn pending(&self, now: DateTime<Utc>) -> Option<&PendingMismatch> {
        self.pending.as_ref().filter(|p| p.expires_at > now)
    }

    pub fn clear_expired(&mut self, now: DateTime<Utc>) {
        if self.pending.is_some_and(|p| p.expires_at <= now) {
            self.pending = None;
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> MatchSnapshot {
        let matched = |flags: &[bool]| -> Vec<usize> {
            flags
                .iter()
                .enumerate()
                .filter(|(_, m)| **m)
                .map(|(i, _)| i)
                .collect()
        };

        MatchSnapshot {
            terms: self.terms().into_iter().map(str::to_owned).collect(),
            definitions: self.definitions().into_iter().map(str::to_owned).collect(),
            matched_terms: matched(&self.term_matched),
            matched_definitions: matched(&self.definition_matched),
            pending: self.pending(now).copied(),
        }
    }
}
