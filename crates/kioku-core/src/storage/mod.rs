//! Storage Module
//!
//! The scheduler does not own persistence. It talks to its collaborators
//! through these traits:
//! - [`ScheduleStore`]: per-learner scheduling records
//! - [`Catalog`]: the item catalog, grouped into categories
//! - [`LearnerProfile`]: daily session limit
//! - [`PointsLedger`]: XP awarded per answered card
//!
//! [`InMemoryStore`] implements all of them for tests and embedding.

mod memory;

use std::collections::HashMap;

use crate::card::{Item, ItemId, ScheduleState};

pub use memory::InMemoryStore;

/// Session size used when a learner never set a daily limit
pub const DEFAULT_DAILY_LIMIT: u32 = 20;

/// Largest daily limit a learner may configure
pub const MAX_DAILY_LIMIT: u32 = 100;

/// Points awarded for every answered card, pass or fail
pub const POINTS_PER_REVIEW: u32 = 10;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Collaborator error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Key rejected by the backend (e.g. unsafe learner id)
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// Value rejected before it was written
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// COLLABORATOR TRAITS
// ============================================================================

/// Persists scheduling records, one per (learner, item)
pub trait ScheduleStore {
    /// All records of a learner keyed by item
    fn load_schedule_states(&self, learner_id: &str) -> Result<HashMap<ItemId, ScheduleState>>;

    /// Insert or replace the record for `state.item_id`
    fn save_schedule_state(&self, learner_id: &str, state: &ScheduleState) -> Result<()>;
}

/// Read access to the item catalog
pub trait Catalog {
    /// Items of one category in catalog order
    fn load_catalog(&self, category: &str) -> Result<Vec<Item>>;

    /// Distinct category labels in catalog order
    fn categories(&self) -> Result<Vec<String>>;
}

/// Per-learner study preferences
pub trait LearnerProfile {
    /// The learner's daily limit, [`DEFAULT_DAILY_LIMIT`] when unset
    fn load_daily_limit(&self, learner_id: &str) -> Result<u32>;

    fn save_daily_limit(&self, learner_id: &str, limit: u32) -> Result<()>;
}

/// Experience-point side channel
pub trait PointsLedger {
    /// Add `amount` points; callers treat failures as non-fatal
    fn award_points(&self, learner_id: &str, amount: u32) -> Result<()>;
}

/// Check a daily limit is within `1..=MAX_DAILY_LIMIT`
pub fn validate_daily_limit(limit: u32) -> crate::Result<u32> {
    if (1..=MAX_DAILY_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(crate::SchedulerError::InvalidDailyLimit(limit))
    }
}

/// Limit check for store implementations, in the collaborator error type
pub fn check_daily_limit(limit: u32) -> Result<u32> {
    validate_daily_limit(limit).map_err(|e| StorageError::InvalidValue(e.to_string()))
}

/// Effective limit for a stored value; unset or 0 means the default
pub fn effective_daily_limit(stored: Option<u32>) -> u32 {
    stored.filter(|&limit| limit > 0).unwrap_or(DEFAULT_DAILY_LIMIT)
}
