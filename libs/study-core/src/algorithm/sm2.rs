//! SM-2 spaced repetition algorithm.
//!
//! Interval growth follows SuperMemo 2 (previous interval times ease factor).
//! Stability and difficulty are tracked alongside so that cards carry a
//! memory model richer than the ease factor alone.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::types::{MemoryState, Quality};
use chrono::{DateTime, Duration, Utc};

/// Below this stability a successful review restarts growth from
/// `initial_stability`.
const STABILITY_RESTART_THRESHOLD: f64 = 0.1;

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub minimum_ease: f64,
    pub maximum_ease: f64,
    /// Ease gained per quality point above 2 on a pass.
    pub ease_step: f64,
    pub lapse_ease_penalty: f64,
    pub minimum_difficulty: f64,
    pub maximum_difficulty: f64,
    pub difficulty_step: f64,
    pub initial_stability: f64,
    pub stability_growth: f64,
    pub lapse_stability_factor: f64,
    pub maximum_stability: f64,
    /// Interval after a failed review, in days.
    pub fail_interval: u32,
    /// Interval after the first review of a new card, in days.
    pub seed_interval: u32,
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            minimum_ease: 1.3,
            maximum_ease: 3.5,
            ease_step: 0.05,
            lapse_ease_penalty: 0.2,
            minimum_difficulty: 1.0,
            maximum_difficulty: 10.0,
            difficulty_step: 0.5,
            initial_stability: 1.0,
            stability_growth: 0.5,
            lapse_stability_factor: 0.5,
            maximum_stability: 36500.0,
            fail_interval: 1,
            seed_interval: 1,
            maximum_interval: 36500,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn schedule(&self, state: &MemoryState, quality: Quality, now: DateTime<Utc>) -> SchedulingResult {
        let q = f64::from(quality.to_value());

        let (stability, difficulty, ease_factor, interval) = if quality.is_pass() {
            self.schedule_pass(state, q)
        } else {
            self.schedule_fail(state, q)
        };

        let next_due = now + Duration::days(i64::from(interval));

        SchedulingResult {
            new_state: MemoryState {
                stability,
                difficulty,
                ease_factor,
                interval,
                review_count: state.review_count + 1,
                last_review: Some(now),
                due_date: Some(next_due),
            },
            next_due,
        }
    }
}

impl Sm2 {
    fn schedule_fail(&self, state: &MemoryState, q: f64) -> (f64, f64, f64, u32) {
        let difficulty = (state.difficulty + self.difficulty_step * (3.0 - q))
            .clamp(self.minimum_difficulty, self.maximum_difficulty);
        let ease = (state.ease_factor - self.lapse_ease_penalty).max(self.minimum_ease);
        let stability = (state.stability * self.lapse_stability_factor).max(0.0);
        (stability, difficulty, ease, self.fail_interval)
    }

    fn schedule_pass(&self, state: &MemoryState, q: f64) -> (f64, f64, f64, u32) {
        let difficulty = (state.difficulty - self.difficulty_step * (q - 2.0) / 2.0)
            .clamp(self.minimum_difficulty, self.maximum_difficulty);
        let ease = (state.ease_factor + self.ease_step * (q - 2.0))
            .clamp(self.minimum_ease, self.maximum_ease);

        let stability = if state.stability < STABILITY_RESTART_THRESHOLD {
            self.initial_stability * (1.0 + self.stability_growth * (q - 3.0))
        } else {
            state.stability * (1.0 + self.stability_growth * (q - 2.0))
        };
        let stability = stability.min(self.maximum_stability);

        let interval = if state.review_count == 0 {
            self.seed_interval
        } else {
            let grown = (f64::from(state.interval) * ease).round();
            (grown.min(f64::from(self.maximum_interval)) as u32).max(1)
        };

        (stability, difficulty, ease, interval.min(self.maximum_interval))
    }
}
