//! Learner ratings

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// How well the learner recalled an item, on a 1-5 scale.
///
/// `Good` is the pass boundary: anything below it counts as a lapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Grade {
    /// Forgot completely
    Again = 1,
    /// Recalled with serious difficulty
    Hard = 2,
    /// Recalled correctly
    Good = 3,
    /// Recalled easily
    Easy = 4,
    /// Instant, effortless recall
    Perfect = 5,
}

impl Grade {
    /// All grades in ascending order
    pub const ALL: [Grade; 5] = [
        Grade::Again,
        Grade::Hard,
        Grade::Good,
        Grade::Easy,
        Grade::Perfect,
    ];

    /// Parse a raw rating value
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Grade::Again),
            2 => Some(Grade::Hard),
            3 => Some(Grade::Good),
            4 => Some(Grade::Easy),
            5 => Some(Grade::Perfect),
            _ => None,
        }
    }

    /// Numeric rating value
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Whether this grade counts as a successful review
    #[inline]
    pub fn is_pass(self) -> bool {
        self >= Grade::Good
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
            Grade::Perfect => "perfect",
        }
    }
}

impl TryFrom<i32> for Grade {
    type Error = SchedulerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Grade::from_i32(value).ok_or(SchedulerError::InvalidGrade(value))
    }
}

impl From<Grade> for i32 {
    fn from(grade: Grade) -> Self {
        grade.value()
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Grade {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<i32>() {
            return Grade::try_from(value);
        }
        match trimmed.to_lowercase().as_str() {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "good" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            "perfect" => Ok(Grade::Perfect),
            _ => Err(SchedulerError::UnknownGrade(trimmed.to_string())),
        }
    }
}
