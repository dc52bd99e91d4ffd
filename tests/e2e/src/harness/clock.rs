//! Simulated clock
//!
//! Scheduling depends only on the `now` passed in, so tests move time
//! forward explicitly instead of sleeping.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Manually advanced wall clock
#[derive(Debug, Clone, Copy)]
pub struct TestClock {
    now: DateTime<Utc>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClock {
    /// Clock starting at a fixed instant so runs are reproducible
    pub fn new() -> Self {
        Self::starting_at(Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap())
    }

    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn advance_hours(&mut self, hours: i64) -> DateTime<Utc> {
        self.advance(Duration::hours(hours))
    }

    pub fn advance_days(&mut self, days: i64) -> DateTime<Utc> {
        self.advance(Duration::days(days))
    }

    pub fn advance(&mut self, by: Duration) -> DateTime<Utc> {
        self.now += by;
        self.now
    }

    /// Jump to `at` (never backwards)
    pub fn jump_to(&mut self, at: DateTime<Utc>) -> DateTime<Utc> {
        if at > self.now {
            self.now = at;
        }
        self.now
    }
}
