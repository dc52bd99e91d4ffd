//! Half-Life Scheduler Module
//!
//! Each (learner, item) pair carries a memory half-life: the number of hours
//! until the probability of recalling the item decays to 50%.
//!
//! ## Core Formulas:
//! - Recall: P = 2^(-t / h)
//! - Due offset at target retention R: t = -h * log2(R)
//! - Growth on a pass: h' = h * m(grade) / (1 + c * ln(max(1, reps)))
//! - Lapse: h' = max(h_min, h * f)

mod config;
mod engine;
mod grade;
mod recall;

pub use config::{
    SchedulerConfig, DEFAULT_DAMPING_COEFFICIENT, DEFAULT_FAIL_DECAY_FACTOR,
    DEFAULT_GROWTH_MULTIPLIERS, DEFAULT_INITIAL_HALF_LIVES, DEFAULT_TARGET_PROBABILITY,
    ENV_PREFIX, MAX_DUE_OFFSET_HOURS, MAX_HALF_LIFE_HOURS, MIN_HALF_LIFE_HOURS,
};
pub use engine::{ReviewOutcome, ReviewPreview, ReviewScheduler};
pub use grade::Grade;
pub use recall::{
    elapsed_hours_between, hours_to_duration, hours_until_probability, recall_probability,
};
