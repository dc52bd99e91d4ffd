//! Session module
//!
//! - Builder: picks and orders the cards of one session
//! - Queue: consume-once queue with versioned card tickets
//! - Study: drives a queue against the storage collaborators

mod builder;
mod queue;
mod study;

pub use builder::{build_session, plan_session, CandidateKind, SessionCandidate};
pub use queue::{CardTicket, SessionQueue, SessionStatus};
pub use study::{RatingReport, SessionSummary, StudySession};
