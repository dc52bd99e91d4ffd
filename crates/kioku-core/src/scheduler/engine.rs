//! Grade update engine
//!
//! Turns a learner's rating and the current [`ScheduleState`] into the next
//! state. Two branches:
//!
//! 1. First review of an unseen item: the half-life is seeded from a per-grade table.
//! 2. Later reviews: a lapse slashes the half-life by the fail decay factor,
//!    a pass grows it by a per-grade multiplier damped by `1 + c * ln(reps)`.
//!
//! The result is clamped to the configured floor and ceiling. Failed items are
//! due again immediately; passed items are due when recall is predicted to
//! drop to the target probability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{hours_to_duration, hours_until_probability, Grade, SchedulerConfig};
use crate::card::ScheduleState;
use crate::error::Result;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Outcome of applying one rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    /// The state after the review
    pub state: ScheduleState,
    /// Grade that was applied
    pub grade: Grade,
    /// Whether the grade counted as a pass
    pub passed: bool,
    /// Whether this was the item's first review
    pub first_review: bool,
    /// Half-life before the review (0 for unseen items)
    pub previous_half_life_hours: f64,
    /// Hours from now until the item is due again
    pub interval_hours: f64,
}

/// What every possible grade would do to a state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPreview {
    pub again: ReviewOutcome,
    pub hard: ReviewOutcome,
    pub good: ReviewOutcome,
    pub easy: ReviewOutcome,
    pub perfect: ReviewOutcome,
}

impl ReviewPreview {
    /// Outcome for a specific grade
    pub fn get(&self, grade: Grade) -> &ReviewOutcome {
        match grade {
            Grade::Again => &self.again,
            Grade::Hard => &self.hard,
            Grade::Good => &self.good,
            Grade::Easy => &self.easy,
            Grade::Perfect => &self.perfect,
        }
    }

    /// Outcomes in ascending grade order
    pub fn iter(&self) -> impl Iterator<Item = (Grade, &ReviewOutcome)> {
        Grade::ALL.into_iter().map(move |g| (g, self.get(g)))
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Half-life review scheduler
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    config: SchedulerConfig,
}

impl ReviewScheduler {
    /// Create a scheduler, rejecting invalid configuration
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Apply a raw 1-5 rating, failing with `InvalidGrade` outside that range
    pub fn apply_rating(
        &self,
        state: &ScheduleState,
        rating: i32,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        let grade = Grade::try_from(rating)?;
        Ok(self.apply_review(state, grade, now))
    }

    /// Compute the state that follows reviewing `state` with `grade` at `now`
    pub fn apply_review(
        &self,
        state: &ScheduleState,
        grade: Grade,
        now: DateTime<Utc>,
    ) -> ReviewOutcome {
        let cfg = &self.config;
        let passed = grade.is_pass();
        let first_review = state.is_new();
        let mut next = state.clone();

        let half_life = if first_review {
            if passed {
                next.repetitions = 1;
            } else {
                next.repetitions = 0;
                next.lapses = state.lapses.saturating_add(1);
            }
            cfg.initial_half_life(grade)
        } else if passed {
            next.repetitions = state.repetitions.saturating_add(1);
            state.half_life_hours * self.effective_multiplier(grade, next.repetitions)
        } else {
            next.repetitions = 0;
            next.lapses = state.lapses.saturating_add(1);
            (state.half_life_hours * cfg.fail_decay_factor).max(cfg.min_half_life_hours)
        };

        next.half_life_hours = self.clamp_half_life(half_life);

        let interval_hours = if passed {
            hours_until_probability(next.half_life_hours, cfg.target_probability)
        } else {
            0.0
        };
        // Saturate at the end of representable time instead of overflowing
        next.next_due_at = now
            .checked_add_signed(hours_to_duration(interval_hours))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        next.last_reviewed_at = Some(now);
        next.last_grade = Some(grade);

        tracing::debug!(
            item_id = next.item_id,
            grade = %grade,
            first_review,
            passed,
            half_life_before = state.half_life_hours,
            half_life_after = next.half_life_hours,
            repetitions = next.repetitions,
            lapses = next.lapses,
            interval_hours,
            "Review applied"
        );

        ReviewOutcome {
            state: next,
            grade,
            passed,
            first_review,
            previous_half_life_hours: state.half_life_hours,
            interval_hours,
        }
    }

    /// Outcomes for all five grades, without committing any of them
    pub fn preview(&self, state: &ScheduleState, now: DateTime<Utc>) -> ReviewPreview {
        ReviewPreview {
            again: self.apply_review(state, Grade::Again, now),
            hard: self.apply_review(state, Grade::Hard, now),
            good: self.apply_review(state, Grade::Good, now),
            easy: self.apply_review(state, Grade::Easy, now),
            perfect: self.apply_review(state, Grade::Perfect, now),
        }
    }

    /// Growth multiplier after logarithmic damping on the repetition count
    pub fn effective_multiplier(&self, grade: Grade, repetitions: u32) -> f64 {
        let damping =
            1.0 + self.config.damping_coefficient * f64::from(repetitions.max(1)).ln();
        self.config.growth_multiplier(grade) / damping
    }

    fn clamp_half_life(&self, half_life: f64) -> f64 {
        let cfg = &self.config;
        if half_life.is_nan() {
            return cfg.min_half_life_hours;
        }
        half_life.clamp(cfg.min_half_life_hours, cfg.max_half_life_hours)
    }
}

// ============================================================================
// TESTS
// ============================================================================
