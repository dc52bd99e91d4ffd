//! JSON file collaborators
//!
//! A thin adapter so the CLI can run sessions end to end. Layout under the
//! data directory:
//!
//! ```text
//! learners/<learner>/schedule.json   item id -> ScheduleState
//! learners/<learner>/profile.json    daily limit and points
//! ```
//!
//! Files are rewritten whole through a temporary file and a rename.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use kioku_core::storage::{
    check_daily_limit, effective_daily_limit, Catalog, LearnerProfile, PointsLedger, Result,
    ScheduleStore, StorageError,
};
use kioku_core::{categories_of, filter_by_category, Item, ItemId, ScheduleState};

/// Sample deck compiled into the binary
const BUILTIN_CATALOG: &str = include_str!("../data/vocab.json");

const SCHEDULE_FILE: &str = "schedule.json";
const PROFILE_FILE: &str = "profile.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    daily_limit: Option<u32>,
    #[serde(default)]
    points: u64,
}

/// File-backed implementation of every collaborator trait
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    catalog: Vec<Item>,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `root`
    pub fn open(root: PathBuf, catalog: Vec<Item>) -> Result<Self> {
        fs::create_dir_all(root.join("learners"))?;
        Ok(Self { root, catalog })
    }

    /// The deck shipped with the binary
    pub fn builtin_catalog() -> Result<Vec<Item>> {
        Ok(serde_json::from_str(BUILTIN_CATALOG)?)
    }

    /// Read a catalog from a JSON array of items
    pub fn read_catalog(path: &Path) -> Result<Vec<Item>> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whole catalog across categories
    pub fn items(&self) -> &[Item] {
        &self.catalog
    }

    /// Look an item up by id
    pub fn find_item(&self, item_id: ItemId) -> Result<&Item> {
        self.catalog
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| StorageError::NotFound(format!("item {}", item_id)))
    }

    /// Total points of a learner
    pub fn points(&self, learner_id: &str) -> Result<u64> {
        Ok(self.read_profile(learner_id)?.points)
    }

    fn learner_dir(&self, learner_id: &str) -> Result<PathBuf> {
        let valid = !learner_id.is_empty()
            && learner_id.len() <= 64
            && learner_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(learner_id.to_string()));
        }
        Ok(self.root.join("learners").join(learner_id))
    }

    fn read_profile(&self, learner_id: &str) -> Result<Profile> {
        read_json(&self.learner_dir(learner_id)?.join(PROFILE_FILE))
    }

    fn write_profile(&self, learner_id: &str, profile: &Profile) -> Result<()> {
        write_json(&self.learner_dir(learner_id)?.join(PROFILE_FILE), profile)
    }
}

/// Missing files read as the default value
fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl ScheduleStore for JsonFileStore {
    fn load_schedule_states(&self, learner_id: &str) -> Result<HashMap<ItemId, ScheduleState>> {
        let path = self.learner_dir(learner_id)?.join(SCHEDULE_FILE);
        let states: BTreeMap<ItemId, ScheduleState> = read_json(&path)?;
        Ok(states.into_iter().collect())
    }

    fn save_schedule_state(&self, learner_id: &str, state: &ScheduleState) -> Result<()> {
        let path = self.learner_dir(learner_id)?.join(SCHEDULE_FILE);
        let mut states: BTreeMap<ItemId, ScheduleState> = read_json(&path)?;
        states.insert(state.item_id, state.clone());
        write_json(&path, &states)
    }
}

impl Catalog for JsonFileStore {
    fn load_catalog(&self, category: &str) -> Result<Vec<Item>> {
        Ok(filter_by_category(&self.catalog, category))
    }

    fn categories(&self) -> Result<Vec<String>> {
        Ok(categories_of(&self.catalog))
    }
}

impl LearnerProfile for JsonFileStore {
    fn load_daily_limit(&self, learner_id: &str) -> Result<u32> {
        Ok(effective_daily_limit(self.read_profile(learner_id)?.daily_limit))
    }

    fn save_daily_limit(&self, learner_id: &str, limit: u32) -> Result<()> {
        let limit = check_daily_limit(limit)?;
        let mut profile = self.read_profile(learner_id)?;
        profile.daily_limit = Some(limit);
        self.write_profile(learner_id, &profile)
    }
}

impl PointsLedger for JsonFileStore {
    fn award_points(&self, learner_id: &str, amount: u32) -> Result<()> {
        let mut profile = self.read_profile(learner_id)?;
        profile.points = profile.points.saturating_add(u64::from(amount));
        self.write_profile(learner_id, &profile)
    }
}
