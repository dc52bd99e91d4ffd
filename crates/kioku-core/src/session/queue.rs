//! Session queue with stale-rating protection
//!
//! The queue holds item ids, never live card references. Each time the head
//! changes the queue bumps a version counter; a [`CardTicket`] captures the
//! head id and version when a card is shown, and only a ticket matching the
//! current head may advance the queue.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::card::ItemId;
use crate::error::{Result, SchedulerError};

/// Lifecycle of one study session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    /// Created, queue not yet filled
    #[default]
    NotStarted,
    /// Cards remaining
    InProgress,
    /// Queue exhausted (terminal)
    Complete,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "not_started",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Complete => "complete",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the card being shown, taken when the rating starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTicket {
    pub item_id: ItemId,
    pub version: u64,
}

/// Ordered, consume-once queue of item ids
#[derive(Debug, Clone, Default)]
pub struct SessionQueue {
    items: VecDeque<ItemId>,
    status: SessionStatus,
    version: u64,
}

impl SessionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the queue; an empty list completes the session immediately
    pub fn start(&mut self, items: Vec<ItemId>) -> Result<SessionStatus> {
        if self.status != SessionStatus::NotStarted {
            return Err(SchedulerError::SessionAlreadyStarted);
        }
        self.items = items.into();
        self.version = self.version.wrapping_add(1);
        self.status = if self.items.is_empty() {
            SessionStatus::Complete
        } else {
            SessionStatus::InProgress
        };
        Ok(self.status)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    /// Ids still queued, head first
    pub fn pending(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().copied()
    }

    /// Ticket for the current head, if a card is showing
    pub fn current(&self) -> Option<CardTicket> {
        if self.status != SessionStatus::InProgress {
            return None;
        }
        self.items.front().map(|&item_id| CardTicket {
            item_id,
            version: self.version,
        })
    }

    /// Check a ticket still refers to the current head
    pub fn verify(&self, ticket: CardTicket) -> Result<()> {
        match self.current() {
            Some(current) if current == ticket => Ok(()),
            Some(_) => Err(SchedulerError::StaleRating {
                item_id: ticket.item_id,
                version: ticket.version,
            }),
            None if self.status == SessionStatus::Complete => Err(SchedulerError::StaleRating {
                item_id: ticket.item_id,
                version: ticket.version,
            }),
            None => Err(SchedulerError::NoCurrentCard),
        }
    }

    /// Pop the head for a verified ticket
    pub fn advance(&mut self, ticket: CardTicket) -> Result<SessionStatus> {
        self.verify(ticket)?;
        self.items.pop_front();
        self.version = self.version.wrapping_add(1);
        if self.items.is_empty() {
            self.status = SessionStatus::Complete;
        }
        Ok(self.status)
    }
}
