//! Per-learner scheduling state
//!
//! One [`ScheduleState`] exists per (learner, item) pair once the item has
//! been reviewed. Absence of a state means the item is new.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ItemId;
use crate::scheduler::{elapsed_hours_between, recall_probability, Grade};

/// Scheduling record for one item of one learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleState {
    /// Item this record schedules
    pub item_id: ItemId,
    /// Hours for recall probability to decay to 50%; 0 = never reviewed
    #[serde(default)]
    pub half_life_hours: f64,
    /// Consecutive passes since the last lapse
    #[serde(default)]
    pub repetitions: u32,
    /// Failed reviews, never decreases
    #[serde(default)]
    pub lapses: u32,
    /// Earliest time the item is eligible again
    pub next_due_at: DateTime<Utc>,
    /// When the item was last reviewed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Most recent grade, kept for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_grade: Option<Grade>,
}

impl ScheduleState {
    /// A fresh, never-reviewed state that is due immediately
    pub fn new(item_id: ItemId, now: DateTime<Utc>) -> Self {
        Self {
            item_id,
            half_life_hours: 0.0,
            repetitions: 0,
            lapses: 0,
            next_due_at: now,
            last_reviewed_at: None,
            last_grade: None,
        }
    }

    /// Whether the next review is this item's first.
    ///
    /// A record that was never stamped with a review time counts as unseen
    /// even if a placeholder half-life was stored with it.
    pub fn is_new(&self) -> bool {
        self.repetitions == 0 && (self.half_life_hours <= 0.0 || self.last_reviewed_at.is_none())
    }

    /// Whether the item is eligible for review at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_due_at <= now
    }

    /// Hours since the last review (0 when never reviewed)
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> f64 {
        self.last_reviewed_at
            .map(|t| elapsed_hours_between(t, now))
            .unwrap_or(0.0)
    }

    /// Current recall probability estimate
    pub fn recall_probability_at(&self, now: DateTime<Utc>) -> f64 {
        recall_probability(self.half_life_hours, self.elapsed_hours(now))
    }
}
