//! Card module - catalog items and per-learner scheduling state

mod item;
mod state;

pub use item::{categories_of, filter_by_category, Item, ItemId, DEFAULT_CATEGORY};
pub use state::ScheduleState;
