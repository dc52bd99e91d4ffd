//! Kioku end-to-end test support
//!
//! - [`harness`]: a simulated clock and a driver that runs whole study sessions
//! - [`mocks`]: deck factories and collaborators that fail on demand


pub use harness::{StudyHarness, TestClock};
pub use mocks::{FlakyStore, TestDataFactory};
