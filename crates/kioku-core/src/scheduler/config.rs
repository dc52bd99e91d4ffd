//! Scheduler configuration
//!
//! All tuning constants live in one immutable [`SchedulerConfig`] that is handed
//! to the [`ReviewScheduler`](super::ReviewScheduler) at construction. Defaults
//! can be overridden from `KIOKU_*` environment variables.

use serde::{Deserialize, Serialize};

use super::Grade;
use crate::error::{Result, SchedulerError};

// ============================================================================
// DEFAULTS
// ============================================================================

/// Retention probability at which a passed item becomes due again
pub const DEFAULT_TARGET_PROBABILITY: f64 = 0.9;

/// Half-life floor in hours
pub const MIN_HALF_LIFE_HOURS: f64 = 2.0;

/// Half-life ceiling in hours (10 years)
pub const MAX_HALF_LIFE_HOURS: f64 = 24.0 * 365.0 * 10.0;

/// Longest due offset a configuration may produce (1000 years)
pub const MAX_DUE_OFFSET_HOURS: f64 = 24.0 * 365.0 * 1000.0;

/// Fraction of the half-life kept after a lapse
pub const DEFAULT_FAIL_DECAY_FACTOR: f64 = 0.4;

/// Coefficient for diminishing returns on repetitions
pub const DEFAULT_DAMPING_COEFFICIENT: f64 = 0.1;

/// Seed half-lives for a first review: again, hard, good, easy/perfect
pub const DEFAULT_INITIAL_HALF_LIVES: [f64; 4] = [4.0, 12.0, 72.0, 168.0];

/// Base growth multipliers on a pass: hard, good, easy, perfect
pub const DEFAULT_GROWTH_MULTIPLIERS: [f64; 4] = [2.0, 2.5, 3.5, 4.5];

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "KIOKU_";

// ============================================================================
// CONFIG
// ============================================================================

/// Tunable constants of the half-life model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Target recall probability used to derive the next due date
    pub target_probability: f64,
    /// Half-life floor in hours
    pub min_half_life_hours: f64,
    /// Half-life ceiling in hours
    pub max_half_life_hours: f64,
    /// Multiplier applied to the half-life on a lapse
    pub fail_decay_factor: f64,
    /// Seed half-lives for again, hard, good, easy/perfect
    pub initial_half_lives: [f64; 4],
    /// Growth multipliers for hard, good, easy, perfect
    pub growth_multipliers: [f64; 4],
    /// Strength of the logarithmic damping on repetitions
    pub damping_coefficient: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_probability: DEFAULT_TARGET_PROBABILITY,
            min_half_life_hours: MIN_HALF_LIFE_HOURS,
            max_half_life_hours: MAX_HALF_LIFE_HOURS,
            fail_decay_factor: DEFAULT_FAIL_DECAY_FACTOR,
            initial_half_lives: DEFAULT_INITIAL_HALF_LIVES,
            growth_multipliers: DEFAULT_GROWTH_MULTIPLIERS,
            damping_coefficient: DEFAULT_DAMPING_COEFFICIENT,
        }
    }
}

impl SchedulerConfig {
    /// Seed half-life for the first review of an unseen item
    pub fn initial_half_life(&self, grade: Grade) -> f64 {
        match grade {
            Grade::Again => self.initial_half_lives[0],
            Grade::Hard => self.initial_half_lives[1],
            Grade::Good => self.initial_half_lives[2],
            Grade::Easy | Grade::Perfect => self.initial_half_lives[3],
        }
    }

    /// Base growth multiplier for a successful review.
    ///
    /// `Again` has no multiplier of its own and maps to 1.0.
    pub fn growth_multiplier(&self, grade: Grade) -> f64 {
        match grade {
            Grade::Again => 1.0,
            Grade::Hard => self.growth_multipliers[0],
            Grade::Good => self.growth_multipliers[1],
            Grade::Easy => self.growth_multipliers[2],
            Grade::Perfect => self.growth_multipliers[3],
        }
    }

    /// Check every constant is inside its meaningful range
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SchedulerError::InvalidConfig(msg));

        if !(self.target_probability > 0.0 && self.target_probability < 1.0) {
            return invalid(format!(
                "targetProbability must be in (0, 1), got {}",
                self.target_probability
            ));
        }
        if !is_positive_finite(self.min_half_life_hours) {
            return invalid(format!(
                "minHalfLifeHours must be positive, got {}",
                self.min_half_life_hours
            ));
        }
        if !self.max_half_life_hours.is_finite()
            || self.max_half_life_hours < self.min_half_life_hours
        {
            return invalid(format!(
                "maxHalfLifeHours ({}) must be finite and >= minHalfLifeHours ({})",
                self.max_half_life_hours, self.min_half_life_hours
            ));
        }
        let longest_offset = -self.max_half_life_hours * self.target_probability.log2();
        if longest_offset > MAX_DUE_OFFSET_HOURS {
            return invalid(format!(
                "maxHalfLifeHours ({}) gives due offsets of {:.0}h, above the {:.0}h limit",
                self.max_half_life_hours, longest_offset, MAX_DUE_OFFSET_HOURS
            ));
        }
        if !(self.fail_decay_factor > 0.0 && self.fail_decay_factor <= 1.0) {
            return invalid(format!(
                "failDecayFactor must be in (0, 1], got {}",
                self.fail_decay_factor
            ));
        }
        if let Some(bad) = self
            .initial_half_lives
            .iter()
            .find(|h| !is_positive_finite(**h))
        {
            return invalid(format!("initialHalfLives must be positive, got {}", bad));
        }
        if let Some(bad) = self
            .growth_multipliers
            .iter()
            .find(|m| !is_positive_finite(**m))
        {
            return invalid(format!("growthMultipliers must be positive, got {}", bad));
        }
        if !self.damping_coefficient.is_finite() || self.damping_coefficient < 0.0 {
            return invalid(format!(
                "dampingCoefficient must be non-negative, got {}",
                self.damping_coefficient
            ));
        }
        Ok(())
    }

    /// Defaults overridden by `KIOKU_*` environment variables, then validated
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup, then validate.
    ///
    /// Recognized keys: `KIOKU_TARGET_PROBABILITY`, `KIOKU_MIN_HALF_LIFE_HOURS`,
    /// `KIOKU_MAX_HALF_LIFE_HOURS`, `KIOKU_FAIL_DECAY_FACTOR`,
    /// `KIOKU_DAMPING_COEFFICIENT`. Unparsable values are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| -> Option<f64> {
            let key = format!("{ENV_PREFIX}{name}");
            let raw = lookup(&key)?;
            match raw.trim().parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(key = %key, value = %raw, "Ignoring unparsable config override");
                    None
                }
            }
        };

        if let Some(v) = read("TARGET_PROBABILITY") {
            self.target_probability = v;
        }
        if let Some(v) = read("MIN_HALF_LIFE_HOURS") {
            self.min_half_life_hours = v;
        }
        if let Some(v) = read("MAX_HALF_LIFE_HOURS") {
            self.max_half_life_hours = v;
        }
        if let Some(v) = read("FAIL_DECAY_FACTOR") {
            self.fail_decay_factor = v;
        }
        if let Some(v) = read("DAMPING_COEFFICIENT") {
            self.damping_coefficient = v;
        }

        self.validate()?;
        Ok(self)
    }
}

fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
