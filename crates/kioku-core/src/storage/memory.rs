//! In-memory collaborator implementation
//!
//! Uses interior mutability so every method takes `&self`, matching how the
//! traits are consumed by [`StudySession`](crate::session::StudySession).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{
    check_daily_limit, effective_daily_limit, Catalog, LearnerProfile, PointsLedger, Result,
    ScheduleStore, StorageError,
};
use crate::card::{categories_of, filter_by_category, Item, ItemId, ScheduleState};

#[derive(Debug, Default)]
struct LearnerRecord {
    states: HashMap<ItemId, ScheduleState>,
    daily_limit: Option<u32>,
    points: u64,
}

/// Catalog plus per-learner records held in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: Vec<Item>,
    learners: Mutex<HashMap<String, LearnerRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by the given catalog
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            learners: Mutex::new(HashMap::new()),
        }
    }

    /// Whole catalog across categories
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Total points awarded to a learner
    pub fn points(&self, learner_id: &str) -> Result<u64> {
        Ok(self
            .lock()?
            .get(learner_id)
            .map(|r| r.points)
            .unwrap_or(0))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, LearnerRecord>>> {
        self.learners
            .lock()
            .map_err(|_| StorageError::Backend("Learner lock poisoned".into()))
    }
}

impl ScheduleStore for InMemoryStore {
    fn load_schedule_states(&self, learner_id: &str) -> Result<HashMap<ItemId, ScheduleState>> {
        Ok(self
            .lock()?
            .get(learner_id)
            .map(|r| r.states.clone())
            .unwrap_or_default())
    }

    fn save_schedule_state(&self, learner_id: &str, state: &ScheduleState) -> Result<()> {
        self.lock()?
            .entry(learner_id.to_string())
            .or_default()
            .states
            .insert(state.item_id, state.clone());
        Ok(())
    }
}

impl Catalog for InMemoryStore {
    fn load_catalog(&self, category: &str) -> Result<Vec<Item>> {
        Ok(filter_by_category(&self.items, category))
    }

    fn categories(&self) -> Result<Vec<String>> {
        Ok(categories_of(&self.items))
    }
}

impl LearnerProfile for InMemoryStore {
    fn load_daily_limit(&self, learner_id: &str) -> Result<u32> {
        Ok(effective_daily_limit(
            self.lock()?.get(learner_id).and_then(|r| r.daily_limit),
        ))
    }

    fn save_daily_limit(&self, learner_id: &str, limit: u32) -> Result<()> {
        let limit = check_daily_limit(limit)?;
        self.lock()?
            .entry(learner_id.to_string())
            .or_default()
            .daily_limit = Some(limit);
        Ok(())
    }
}

impl PointsLedger for InMemoryStore {
    fn award_points(&self, learner_id: &str, amount: u32) -> Result<()> {
        let mut learners = self.lock()?;
        let record = learners.entry(learner_id.to_string()).or_default();
        record.points = record.points.saturating_add(u64::from(amount));
        Ok(())
    }
}
