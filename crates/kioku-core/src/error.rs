//! Scheduler error types

use crate::card::ItemId;
use crate::storage::StorageError;

/// Errors produced by the scheduling core
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Grade outside the 1-5 rating scale (caller bug)
    #[error("Invalid grade: {0} (expected 1-5)")]
    InvalidGrade(i32),
    /// Rating text that is neither a number nor a grade name
    #[error("Unknown grade '{0}' (expected 1-5 or again/hard/good/easy/perfect)")]
    UnknownGrade(String),
    /// Rating captured for a card that is no longer the current one
    #[error("Stale rating for item {item_id} (version {version})")]
    StaleRating { item_id: ItemId, version: u64 },
    /// Rating submitted while no card is being shown
    #[error("No current card to rate")]
    NoCurrentCard,
    /// A session queue can only be started once
    #[error("Session already started")]
    SessionAlreadyStarted,
    /// Daily limit outside the accepted range
    #[error("Invalid daily limit: {0} (expected 1-100)")]
    InvalidDailyLimit(u32),
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Collaborator failure, propagated without interpretation
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SchedulerError {
    /// Whether this error should be swallowed rather than shown to the learner
    pub fn is_silent(&self) -> bool {
        matches!(self, SchedulerError::StaleRating { .. })
    }
}

/// Scheduler result type
pub type Result<T> = std::result::Result<T, SchedulerError>;
