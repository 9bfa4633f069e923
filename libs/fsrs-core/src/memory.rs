//! Validated memory values.
//!
//! Each value object rejects out-of-range input on construction. Calculators
//! clamp explicitly before building one, so a construction failure always
//! points at a defect upstream rather than at user input.

use crate::error::{FsrsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_STABILITY: f64 = 0.001;
pub const MAX_STABILITY: f64 = 36500.0;
pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Days until retrievability decays to 90%.
///
/// `0.0` is accepted only as the new-card sentinel.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Stability(f64);

impl Stability {
    pub const NEW: Stability = Stability(0.0);

    pub fn new(value: f64) -> Result<Self> {
        if value == 0.0 || (MIN_STABILITY..=MAX_STABILITY).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FsrsError::InvalidStability(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_new(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for Stability {
    type Error = FsrsError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Stability> for f64 {
    fn from(s: Stability) -> Self {
        s.0
    }
}

/// Item difficulty on a 1-10 scale.
///
/// `0.0` is accepted only as the new-card sentinel.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Difficulty(f64);

impl Difficulty {
    pub const NEW: Difficulty = Difficulty(0.0);

    pub fn new(value: f64) -> Result<Self> {
        if value == 0.0 || (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FsrsError::InvalidDifficulty(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_new(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for Difficulty {
    type Error = FsrsError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Difficulty> for f64 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

/// Probability of recall, always in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Retrievability(f64);

impl Retrievability {
    pub const ZERO: Retrievability = Retrievability(0.0);

    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FsrsError::InvalidRetrievability(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Percentage with two decimals, e.g. `"90.00%"`.
    pub fn percent(self) -> String {
        format!("{:.2}%", self.0 * 100.0)
    }
}

impl TryFrom<f64> for Retrievability {
    type Error = FsrsError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Retrievability> for f64 {
    fn from(r: Retrievability) -> Self {
        r.0
    }
}

impl fmt::Display for Retrievability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.percent())
    }
}

/// Immutable (stability, difficulty) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub stability: Stability,
    pub difficulty: Difficulty,
}

impl MemoryState {
    pub fn new(stability: f64, difficulty: f64) -> Result<Self> {
        Ok(Self {
            stability: Stability::new(stability)?,
            difficulty: Difficulty::new(difficulty)?,
        })
    }

    /// Sentinel state of a card that has never been reviewed.
    pub fn new_card() -> Self {
        Self {
            stability: Stability::NEW,
            difficulty: Difficulty::NEW,
        }
    }

    pub fn is_new(&self) -> bool {
        self.stability.is_new() && self.difficulty.is_new()
    }

    pub fn stability(&self) -> f64 {
        self.stability.value()
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty.value()
    }
}
