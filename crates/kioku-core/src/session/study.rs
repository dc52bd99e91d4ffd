//! Study session driver
//!
//! Ties the pieces together for one learner and one deck:
//! load records and catalog, build the queue, then for each answered card
//! verify the ticket, apply the review, persist it, advance, award points.
//!
//! A new state is only kept after the store confirmed the save, so a storage
//! failure leaves both the session and the learner's records untouched.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{plan_session, CardTicket, SessionCandidate, SessionQueue, SessionStatus};
use crate::card::{Item, ItemId, ScheduleState};
use crate::error::{Result, SchedulerError};
use crate::scheduler::{Grade, ReviewOutcome, ReviewScheduler};
use crate::storage::{Catalog, LearnerProfile, PointsLedger, ScheduleStore, POINTS_PER_REVIEW};

/// Result of one accepted rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingReport {
    pub outcome: ReviewOutcome,
    /// Session status after the card was consumed
    pub status: SessionStatus,
    /// Points credited (0 when the ledger failed)
    pub points_awarded: u32,
}

/// Counters for the end-of-session screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub category: String,
    pub status: SessionStatus,
    pub reviewed: usize,
    pub passed: usize,
    pub lapsed: usize,
    pub remaining: usize,
    pub points: u64,
}

/// One learner working through one deck
#[derive(Debug)]
pub struct StudySession {
    id: Uuid,
    learner_id: String,
    category: String,
    scheduler: ReviewScheduler,
    deck: Vec<Item>,
    positions: HashMap<ItemId, usize>,
    states: HashMap<ItemId, ScheduleState>,
    plan: Vec<SessionCandidate>,
    queue: SessionQueue,
    reviewed: usize,
    passed: usize,
    points: u64,
}

impl StudySession {
    /// A session that has not loaded anything yet
    pub fn new(
        scheduler: ReviewScheduler,
        learner_id: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            learner_id: learner_id.into(),
            category: category.into(),
            scheduler,
            deck: Vec::new(),
            positions: HashMap::new(),
            states: HashMap::new(),
            plan: Vec::new(),
            queue: SessionQueue::new(),
            reviewed: 0,
            passed: 0,
            points: 0,
        }
    }

    /// Load the deck and records, then build and start the queue.
    ///
    /// Collaborator failures leave the session in `NotStarted`.
    pub fn start<C, S, P>(
        &mut self,
        catalog: &C,
        store: &S,
        profile: &P,
        now: DateTime<Utc>,
    ) -> Result<SessionStatus>
    where
        C: Catalog + ?Sized,
        S: ScheduleStore + ?Sized,
        P: LearnerProfile + ?Sized,
    {
        if self.queue.status() != SessionStatus::NotStarted {
            return Err(SchedulerError::SessionAlreadyStarted);
        }

        let deck = catalog.load_catalog(&self.category)?;
        let states = store.load_schedule_states(&self.learner_id)?;
        let limit = profile.load_daily_limit(&self.learner_id)?;

        let plan = plan_session(&deck, &states, now, limit);
        let status = self.queue.start(plan.iter().map(|c| c.item_id).collect())?;

        self.positions = deck.iter().enumerate().map(|(i, item)| (item.id, i)).collect();
        self.deck = deck;
        self.states = states;
        self.plan = plan;

        tracing::info!(
            session_id = %self.id,
            learner = %self.learner_id,
            category = %self.category,
            queued = self.queue.remaining(),
            daily_limit = limit,
            status = %status,
            "Study session started"
        );

        Ok(status)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn learner_id(&self) -> &str {
        &self.learner_id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn status(&self) -> SessionStatus {
        self.queue.status()
    }

    pub fn remaining(&self) -> usize {
        self.queue.remaining()
    }

    /// Items of the deck in catalog order
    pub fn deck(&self) -> &[Item] {
        &self.deck
    }

    /// The ranked plan the queue was built from
    pub fn plan(&self) -> &[SessionCandidate] {
        &self.plan
    }

    /// Latest known record of an item
    pub fn state(&self, item_id: ItemId) -> Option<&ScheduleState> {
        self.states.get(&item_id)
    }

    /// Ticket and item for the card currently showing
    pub fn current_card(&self) -> Option<(CardTicket, &Item)> {
        let ticket = self.queue.current()?;
        let item = self.item(ticket.item_id)?;
        Some((ticket, item))
    }

    /// Apply a rating for the card identified by `ticket`.
    ///
    /// A ticket that no longer matches the current card yields `StaleRating`
    /// without touching any state; callers drop it silently.
    pub fn rate<S, L>(
        &mut self,
        ticket: CardTicket,
        grade: Grade,
        now: DateTime<Utc>,
        store: &S,
        ledger: &L,
    ) -> Result<RatingReport>
    where
        S: ScheduleStore + ?Sized,
        L: PointsLedger + ?Sized,
    {
        if let Err(e) = self.queue.verify(ticket) {
            if e.is_silent() {
                tracing::warn!(
                    session_id = %self.id,
                    item_id = ticket.item_id,
                    version = ticket.version,
                    "Discarding stale rating"
                );
            }
            return Err(e);
        }

        let previous = self
            .states
            .get(&ticket.item_id)
            .cloned()
            .unwrap_or_else(|| ScheduleState::new(ticket.item_id, now));
        let outcome = self.scheduler.apply_review(&previous, grade, now);

        if let Err(e) = store.save_schedule_state(&self.learner_id, &outcome.state) {
            tracing::warn!(
                session_id = %self.id,
                item_id = ticket.item_id,
                error = %e,
                "Failed to save schedule state"
            );
            return Err(e.into());
        }

        self.states.insert(ticket.item_id, outcome.state.clone());
        let status = self.queue.advance(ticket)?;
        self.reviewed += 1;
        if outcome.passed {
            self.passed += 1;
        }

        let points_awarded = match ledger.award_points(&self.learner_id, POINTS_PER_REVIEW) {
            Ok(()) => POINTS_PER_REVIEW,
            Err(e) => {
                tracing::warn!(learner = %self.learner_id, error = %e, "Failed to award points");
                0
            }
        };
        self.points += u64::from(points_awarded);

        if status == SessionStatus::Complete {
            tracing::info!(
                session_id = %self.id,
                reviewed = self.reviewed,
                passed = self.passed,
                "Study session complete"
            );
        }

        Ok(RatingReport {
            outcome,
            status,
            points_awarded,
        })
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            category: self.category.clone(),
            status: self.queue.status(),
            reviewed: self.reviewed,
            passed: self.passed,
            lapsed: self.reviewed - self.passed,
            remaining: self.queue.remaining(),
            points: self.points,
        }
    }

    fn item(&self, item_id: ItemId) -> Option<&Item> {
        self.positions.get(&item_id).and_then(|&i| self.deck.get(i))
    }
}
