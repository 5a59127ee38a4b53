//! Study-session state machine.
//!
//! A session moves from `Selecting` to `Active` when its queue is drawn and
//! to `Finished` after the last item, an explicit finish, or an empty queue.
//! Every resolved item updates the session counters, and the card's memory
//! state when the response produced a quality.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::sm2::Sm2;
use crate::algorithm::SpacedRepetitionAlgorithm;
use crate::error::{CoreError, Result};
use crate::matching::AnswerPolicy;
use crate::modes::{
    FlashcardsMode, MatchMode, ModeEngine, MultipleChoiceMode, Presented, Prompt, Resolution, Response,
    WriteMode,
};
use crate::quality::MatchScoring;
use crate::selector::select_due;
use crate::types::{Card, CardId, Quality, StudyMode, StudySession};

/// Per-session settings, fixed when the session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Maximum items drawn from the due set.
    pub limit: usize,
    /// Cards per match board.
    pub match_batch: usize,
    /// Options per multiple-choice question.
    pub option_count: usize,
    pub answer_policy: AnswerPolicy,
    pub match_scoring: MatchScoring,
    pub match_pending_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            match_batch: 10,
            option_count: 4,
            answer_policy: AnswerPolicy::default(),
            match_scoring: MatchScoring::Neutral,
            match_pending_delay: Duration::seconds(1),
        }
    }
}

impl SessionConfig {
    pub fn mode_engine(&self, mode: StudyMode) -> ModeEngine {
        match mode {
            StudyMode::Flashcards => ModeEngine::Flashcards(FlashcardsMode),
            StudyMode::MultipleChoice => ModeEngine::MultipleChoice(MultipleChoiceMode {
                option_count: self.option_count,
            }),
            StudyMode::Write => ModeEngine::Write(WriteMode::new(self.answer_policy)),
            StudyMode::Match => ModeEngine::Match(MatchMode {
                pending_delay: self.match_pending_delay,
                scoring: self.match_scoring,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Selecting(StudyMode),
    Active {
        queue: Vec<Card>,
        position: usize,
        item: Presented,
    },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Selecting,
    Active,
    Finished,
}

/// How far through its queue a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub completed: usize,
    pub total: usize,
}

/// Result of resolving the current item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub resolution: Resolution,
    /// The card after scheduling, when the response produced a quality.
    pub updated_card: Option<Card>,
    pub finished: bool,
}

/// A resolved response not yet applied to its session.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub resolution: Resolution,
    item: Presented,
}

pub struct StudySessionEngine {
    record: StudySession,
    state: SessionState,
    modes: ModeEngine,
    deck: Vec<Card>,
    algorithm: Arc<dyn SpacedRepetitionAlgorithm>,
    config: SessionConfig,
}

impl fmt::Debug for StudySessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySessionEngine")
            .field("record", &self.record)
            .field("status", &self.status())
            .field("algorithm", &self.algorithm.name())
            .finish_non_exhaustive()
    }
}

impl StudySessionEngine {
    pub fn new(record: StudySession, config: SessionConfig) -> Self {
        Self {
            state: SessionState::Selecting(record.mode),
            modes: config.mode_engine(record.mode),
            record,
            deck: Vec::new(),
            algorithm: Arc::new(Sm2::default()),
            config,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Arc<dyn SpacedRepetitionAlgorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn record(&self) -> &StudySession {
        &self.record
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Selecting(_) => SessionStatus::Selecting,
            SessionState::Active { .. } => SessionStatus::Active,
            SessionState::Finished => SessionStatus::Finished,
        }
    }

    pub fn progress(&self) -> SessionProgress {
        match &self.state {
            SessionState::Active {
                item: Presented::Match(board),
                ..
            } => SessionProgress {
                completed: board.matched_count(),
                total: board.len(),
            },
            SessionState::Active { queue, position, .. } => SessionProgress {
                completed: *position,
                total: queue.len(),
            },
            _ => SessionProgress {
                completed: self.record.cards_studied as usize,
                total: self.record.cards_studied as usize,
            },
        }
    }

    /// Draw the queue from `deck_cards` and present the first item.
    ///
    /// An empty queue finishes the session on the spot.
    pub fn start<R: Rng + ?Sized>(&mut self, deck_cards: Vec<Card>, now: DateTime<Utc>, rng: &mut R) -> Result<()> {
        match self.state {
            SessionState::Selecting(_) => {}
            SessionState::Active { .. } => return Err(CoreError::SessionAlreadyStarted),
            SessionState::Finished => return Err(CoreError::SessionFinished),
        }

        let queue = match self.record.mode {
            StudyMode::Match => {
                if self.config.match_batch == 0 {
                    return Err(CoreError::InvalidLimit);
                }
                deck_cards
                    .choose_multiple(rng, self.config.match_batch)
                    .cloned()
                    .collect()
            }
            _ => select_due(&deck_cards, now, self.config.limit)?,
        };
        self.deck = deck_cards;

        match self.modes.present(&queue, 0, &self.deck, rng) {
            Some(item) => {
                self.state = SessionState::Active {
                    queue,
                    position: 0,
                    item,
                };
            }
            None => self.finish(now),
        }
        Ok(())
    }

    /// The prompt for the current item, if the session is active.
    pub fn prompt(&mut self, now: DateTime<Utc>) -> Option<Prompt> {
        match &mut self.state {
            SessionState::Active { item, .. } => {
                if let Presented::Match(board) = item {
                    board.clear_expired(now);
                }
                Some(item.prompt(now))
            }
            _ => None,
        }
    }

    /// Resolve `response` against the current item without changing the
    /// session. Hand the result to [`advance`](Self::advance) once any review
    /// it carries has been stored.
    pub fn evaluate(&self, response: Response, now: DateTime<Utc>) -> Result<Evaluation> {
        let mut item = match &self.state {
            SessionState::Active { item, .. } => item.clone(),
            SessionState::Selecting(_) => return Err(CoreError::SessionNotStarted),
            SessionState::Finished => return Err(CoreError::SessionFinished),
        };
        let resolution = self.modes.resolve(&mut item, response, now)?;
        Ok(Evaluation { resolution, item })
    }

    /// Count an evaluated response and move on to the next item.
    ///
    /// `updated_card` replaces the queued copy of the reviewed card.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        evaluation: Evaluation,
        updated_card: Option<Card>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<ItemOutcome> {
        let (queue, position, item) = match &mut self.state {
            SessionState::Active { queue, position, item } => (queue, position, item),
            SessionState::Selecting(_) => return Err(CoreError::SessionNotStarted),
            SessionState::Finished => return Err(CoreError::SessionFinished),
        };

        let Evaluation { resolution, item: resolved } = evaluation;
        *item = resolved;
        if let Some(card) = &updated_card {
            if let Some(queued) = queue.iter_mut().find(|c| c.id == card.id) {
                *queued = card.clone();
            }
        }

        if !resolution.completes_item {
            return Ok(ItemOutcome {
                resolution,
                updated_card,
                finished: false,
            });
        }

        self.record.record(resolution.is_correct);

        let exhausted = if let Presented::Match(board) = &*item {
            board.is_complete()
        } else {
            *position += 1;
            match self.modes.present(queue, *position, &self.deck, rng) {
                Some(next) => {
                    *item = next;
                    false
                }
                None => true,
            }
        };

        if exhausted {
            self.finish(now);
        }

        Ok(ItemOutcome {
            resolution,
            updated_card,
            finished: exhausted,
        })
    }

    /// Resolve the learner's response, schedule the card with the session's
    /// algorithm and advance.
    pub fn resolve_current<R: Rng + ?Sized>(
        &mut self,
        response: Response,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<ItemOutcome> {
        let evaluation = self.evaluate(response, now)?;
        let updated_card = evaluation
            .resolution
            .quality
            .and_then(|quality| self.schedule(evaluation.resolution.card_id, quality, now));
        self.advance(evaluation, updated_card, now, rng)
    }

    fn schedule(&self, card_id: CardId, quality: Quality, now: DateTime<Utc>) -> Option<Card> {
        let SessionState::Active { queue, .. } = &self.state else {
            return None;
        };
        queue.iter().find(|c| c.id == card_id).map(|card| {
            let mut card = card.clone();
            card.state = self.algorithm.schedule(&card.state, quality, now).new_state;
            card.updated_at = now;
            card
        })
    }

    /// Close the session. Only the first call sets `finished_at`.
    pub fn finish(&mut self, now: DateTime<Utc>) {
        self.record.finish(now);
        self.state = SessionState::Finished;
    }

    /// Drop the session without closing it.
    pub fn abandon(self) -> StudySession {
        self.record
    }
}
