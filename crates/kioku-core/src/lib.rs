//! # Kioku Core
//!
//! Spaced-repetition scheduling for vocabulary study, built on a half-life
//! memory model:
//!
//! - **Recall Model**: recall probability decays as 2^(-t/h)
//! - **Grade Updates**: seeded half-lives for new items, damped multiplicative
//!   growth on a pass, a slashed (not reset) half-life on a lapse
//! - **Due Dates**: an item is due when predicted recall reaches the target probability
//! - **Session Building**: most-at-risk items first, capped by a daily limit
//! - **Study Sessions**: versioned card tickets so stale ratings are discarded
//!
//! Persistence, the catalog, learner preferences and points are external
//! collaborators reached through the traits in [`storage`].
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use kioku_core::{Grade, InMemoryStore, Item, ReviewScheduler, StudySession};
//!
//! let store = InMemoryStore::with_items(vec![
//!     Item::new(1, "犬", "いぬ", "dog").with_category("Animals"),
//!     Item::new(2, "猫", "ねこ", "cat").with_category("Animals"),
//! ]);
//!
//! let now = Utc::now();
//! let mut session = StudySession::new(ReviewScheduler::default(), "learner-1", "Animals");
//! session.start(&store, &store, &store, now)?;
//!
//! while let Some((ticket, _)) = session.current_card() {
//!     session.rate(ticket, Grade::Good, now, &store, &store)?;
//! }
//! assert_eq!(session.summary().reviewed, 2);
//! # Ok::<(), kioku_core::SchedulerError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod card;
pub mod error;
pub mod quiz;
pub mod scheduler;
pub mod session;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Card types
pub use card::{categories_of, filter_by_category, Item, ItemId, ScheduleState, DEFAULT_CATEGORY};

// Errors
pub use error::{Result, SchedulerError};

// Half-life scheduler
pub use scheduler::{
    elapsed_hours_between,
    hours_until_probability,
    // Core functions for advanced usage
    recall_probability,
    Grade,
    ReviewOutcome,
    ReviewPreview,
    ReviewScheduler,
    SchedulerConfig,
};

// Sessions
pub use session::{
    build_session, plan_session, CandidateKind, CardTicket, RatingReport, SessionCandidate,
    SessionQueue, SessionStatus, SessionSummary, StudySession,
};

// Collaborators
pub use storage::{
    validate_daily_limit, Catalog, InMemoryStore, LearnerProfile, PointsLedger, ScheduleStore,
    StorageError, DEFAULT_DAILY_LIMIT, MAX_DAILY_LIMIT, POINTS_PER_REVIEW,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        build_session, recall_probability, Catalog, CardTicket, Grade, InMemoryStore, Item,
        ItemId, LearnerProfile, PointsLedger, Result, ReviewScheduler, ScheduleState,
        ScheduleStore, SchedulerConfig, SchedulerError, SessionStatus, StudySession,
    };
}
