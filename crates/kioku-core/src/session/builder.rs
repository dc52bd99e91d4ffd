//! Session selection and ordering
//!
//! Every item of the deck is either new (no record), due (`next_due_at <= now`)
//! or excluded. Candidates are ordered by ascending recall probability so the
//! items closest to being forgotten come first; new items count as probability 0.
//! Ties keep catalog order. The list is cut at the daily limit, which due and
//! new items share.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{Item, ItemId, ScheduleState};

/// Why an item was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// Never reviewed
    New,
    /// Reviewed before and past its due time
    Due,
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateKind::New => write!(f, "new"),
            CandidateKind::Due => write!(f, "due"),
        }
    }
}

/// One selected item with the probability it was ranked by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCandidate {
    pub item_id: ItemId,
    pub probability: f64,
    pub kind: CandidateKind,
}

/// Ranked, truncated candidates for one session
pub fn plan_session(
    items: &[Item],
    states: &HashMap<ItemId, ScheduleState>,
    now: DateTime<Utc>,
    daily_limit: u32,
) -> Vec<SessionCandidate> {
    let mut candidates: Vec<SessionCandidate> = items
        .iter()
        .filter_map(|item| match states.get(&item.id) {
            None => Some(SessionCandidate {
                item_id: item.id,
                probability: 0.0,
                kind: CandidateKind::New,
            }),
            Some(state) if state.is_due(now) => Some(SessionCandidate {
                item_id: item.id,
                probability: state.recall_probability_at(now),
                kind: CandidateKind::Due,
            }),
            Some(_) => None,
        })
        .collect();

    // sort_by is stable: equal probabilities keep catalog order
    candidates.sort_by(|a, b| a.probability.total_cmp(&b.probability));
    candidates.truncate(daily_limit as usize);

    tracing::debug!(
        catalog = items.len(),
        selected = candidates.len(),
        daily_limit,
        "Session planned"
    );

    candidates
}

/// Ordered item ids to present in one session
pub fn build_session(
    items: &[Item],
    states: &HashMap<ItemId, ScheduleState>,
    now: DateTime<Utc>,
    daily_limit: u32,
) -> Vec<ItemId> {
    plan_session(items, states, now, daily_limit)
        .into_iter()
        .map(|c| c.item_id)
        .collect()
}
