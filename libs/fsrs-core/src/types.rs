//! Core types shared by the calculators and schedulers.

use crate::error::FsrsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card learning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    New,
    Learning,
    Review,
    Relearning,
}

impl Default for State {
    fn default() -> Self {
        Self::New
    }
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Relearning => "relearning",
        }
    }
}

/// Outcome of a review.
///
/// `Manual` marks administrative edits (forget, replayed state changes) and is
/// never accepted by the scheduler itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Manual,
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    /// The four grades a reviewer can give, in ascending order.
    pub const GRADABLE: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Convert to numeric value (Manual = 0, Again..Easy = 1..4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Manual => 0,
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Manual),
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Whether the scheduler accepts this grade.
    pub fn is_gradable(self) -> bool {
        !matches!(self, Self::Manual)
    }

    /// Position in [`Grade::GRADABLE`], `None` for `Manual`.
    pub(crate) fn index(self) -> Option<usize> {
        match self {
            Self::Manual => None,
            other => Some(other.to_value() as usize - 1),
        }
    }
}

/// Unit of a learning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepUnit {
    Minutes,
    Hours,
    Days,
}

impl StepUnit {
    fn suffix(self) -> char {
        match self {
            Self::Minutes => 'm',
            Self::Hours => 'h',
            Self::Days => 'd',
        }
    }

    fn minutes_per_unit(self) -> u32 {
        match self {
            Self::Minutes => 1,
            Self::Hours => 60,
            Self::Days => 1440,
        }
    }
}

/// A sub-day (or multi-day) waypoint in a learning or relearning sequence.
///
/// Serialized in compact form: `"1m"`, `"10m"`, `"1h"`, `"2d"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LearningStep {
    pub magnitude: u32,
    pub unit: StepUnit,
}

impl LearningStep {
    pub const fn minutes(magnitude: u32) -> Self {
        Self {
            magnitude,
            unit: StepUnit::Minutes,
        }
    }

    pub const fn hours(magnitude: u32) -> Self {
        Self {
            magnitude,
            unit: StepUnit::Hours,
        }
    }

    pub const fn days(magnitude: u32) -> Self {
        Self {
            magnitude,
            unit: StepUnit::Days,
        }
    }

    /// Length of the step in minutes.
    pub fn in_minutes(&self) -> u32 {
        self.magnitude.saturating_mul(self.unit.minutes_per_unit())
    }
}

impl fmt::Display for LearningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

impl FromStr for LearningStep {
    type Err = FsrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unit = match trimmed.chars().last() {
            Some('m') => StepUnit::Minutes,
            Some('h') => StepUnit::Hours,
            Some('d') => StepUnit::Days,
            _ => return Err(FsrsError::InvalidStep(s.to_string())),
        };
        let magnitude = trimmed[..trimmed.len() - 1]
            .parse::<u32>()
            .map_err(|_| FsrsError::InvalidStep(s.to_string()))?;
        if magnitude == 0 {
            return Err(FsrsError::InvalidStep(s.to_string()));
        }
        Ok(Self { magnitude, unit })
    }
}

impl TryFrom<String> for LearningStep {
    type Error = FsrsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LearningStep> for String {
    fn from(step: LearningStep) -> Self {
        step.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_values_round_trip() {
        for value in 0..=4 {
            let grade = Grade::from_value(value).unwrap();
            assert_eq!(grade.to_value(), value);
        }
        assert_eq!(Grade::from_value(5), None);
    }

    #[test]
    fn manual_is_not_gradable() {
        assert!(!Grade::Manual.is_gradable());
        assert!(Grade::GRADABLE.iter().all(|g| g.is_gradable()));
        assert_eq!(Grade::Manual.index(), None);
        assert_eq!(Grade::Easy.index(), Some(3));
    }

    #[test]
    fn step_parsing() {
        assert_eq!("1m".parse::<LearningStep>().unwrap(), LearningStep::minutes(1));
        assert_eq!("2h".parse::<LearningStep>().unwrap(), LearningStep::hours(2));
        assert_eq!(" 3d ".parse::<LearningStep>().unwrap(), LearningStep::days(3));
        assert!("10".parse::<LearningStep>().is_err());
        assert!("0m".parse::<LearningStep>().is_err());
        assert!("xm".parse::<LearningStep>().is_err());
        assert!("".parse::<LearningStep>().is_err());
    }

    #[test]
    fn step_minutes() {
        assert_eq!(LearningStep::minutes(10).in_minutes(), 10);
        assert_eq!(LearningStep::hours(2).in_minutes(), 120);
        assert_eq!(LearningStep::days(1).in_minutes(), 1440);
    }

    #[test]
    fn step_serde_uses_compact_form() {
        let steps = vec![LearningStep::minutes(1), LearningStep::hours(6)];
        let json = serde_json::to_string(&steps).unwrap();
        assert_eq!(json, r#"["1m","6h"]"#);
        let back: Vec<LearningStep> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, steps);
    }

    #[test]
    fn state_serde_snake_case() {
        let json = serde_json::to_string(&State::Relearning).unwrap();
        assert_eq!(json, r#""relearning""#);
    }
}
