//! Interval calculation, fuzzing and cross-grade ordering.

use super::FsrsAlgorithm;
use crate::error::{FsrsError, Result};
use crate::parameters::round8;
use crate::random::RandomSource;

/// A band of interval lengths and the fuzz it contributes per day of overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzRange {
    pub start: f64,
    pub end: f64,
    pub factor: f64,
}

pub const FUZZ_RANGES: [FuzzRange; 3] = [
    FuzzRange {
        start: 2.5,
        end: 7.0,
        factor: 0.15,
    },
    FuzzRange {
        start: 7.0,
        end: 20.0,
        factor: 0.1,
    },
    FuzzRange {
        start: 20.0,
        end: f64::INFINITY,
        factor: 0.05,
    },
];

/// Smallest interval that is fuzzed.
const MIN_FUZZ_INTERVAL: f64 = 2.5;

/// Scalar turning stability into days for the requested retention.
pub(crate) fn interval_modifier(decay: f64, factor: f64, request_retention: f64) -> Result<f64> {
    if !(request_retention > 0.0 && request_retention <= 1.0) {
        return Err(FsrsError::InvalidRetention(request_retention));
    }
    Ok(round8((request_retention.powf(1.0 / decay) - 1.0) / factor))
}

/// Inclusive `(min, max)` day range an interval may be fuzzed into.
pub fn fuzz_range(interval: f64, elapsed_days: u32, maximum_interval: u32) -> (u32, u32) {
    let delta = FUZZ_RANGES.iter().fold(1.0, |acc, range| {
        acc + range.factor * (interval.min(range.end) - range.start).max(0.0)
    });
    let maximum = maximum_interval as f64;
    let interval = interval.min(maximum);
    let mut min_ivl = (interval - delta).round().max(2.0);
    let max_ivl = (interval + delta).round().min(maximum);
    if interval > elapsed_days as f64 {
        min_ivl = min_ivl.max(elapsed_days as f64 + 1.0);
    }
    let min_ivl = min_ivl.min(max_ivl);
    (min_ivl as u32, max_ivl as u32)
}

/// At most one draw from a random source per scheduling call.
///
/// Every interval fuzzed within one call shares the same draw so the
/// relative order of the grades is preserved.
pub struct FuzzDraw<'a> {
    source: Option<&'a mut dyn RandomSource>,
    value: Option<f64>,
}

impl<'a> FuzzDraw<'a> {
    pub fn new(source: &'a mut dyn RandomSource) -> Self {
        Self {
            source: Some(source),
            value: None,
        }
    }

    /// A draw that never touches a random source.
    pub fn disabled() -> Self {
        Self {
            source: None,
            value: None,
        }
    }

    fn get(&mut self) -> Option<f64> {
        if self.value.is_none() {
            let source = self.source.as_mut()?;
            let u = source.next_f64();
            tracing::debug!(value = u, "fuzz draw");
            self.value = Some(u.clamp(0.0, 1.0 - f64::EPSILON));
        }
        self.value
    }
}

impl FsrsAlgorithm {
    /// Interval before fuzzing, clamped to [1, maximum_interval].
    pub fn base_interval(&self, stability: f64) -> f64 {
        (stability * self.interval_modifier)
            .round()
            .clamp(1.0, self.params.maximum_interval as f64)
    }

    /// Days until the next review for `stability`.
    pub fn next_interval(&self, stability: f64, elapsed_days: u32, fuzz: &mut FuzzDraw<'_>) -> u32 {
        let interval = self.base_interval(stability);
        self.apply_fuzz(interval, elapsed_days, fuzz)
    }

    fn apply_fuzz(&self, interval: f64, elapsed_days: u32, fuzz: &mut FuzzDraw<'_>) -> u32 {
        if !self.params.enable_fuzz || interval < MIN_FUZZ_INTERVAL {
            return interval.round() as u32;
        }
        let Some(u) = fuzz.get() else {
            return interval.round() as u32;
        };
        let (min_ivl, max_ivl) = fuzz_range(interval, elapsed_days, self.params.maximum_interval);
        let span = f64::from(max_ivl - min_ivl) + 1.0;
        (u * span + min_ivl as f64).floor() as u32
    }
}

/// Enforce `hard < good < easy`.
pub fn constrain_three([hard, good, easy]: [u32; 3]) -> [u32; 3] {
    let hard = hard.min(good);
    let good = good.max(hard.saturating_add(1));
    let easy = easy.max(good.saturating_add(1));
    [hard, good, easy]
}

/// Enforce `again < hard < good < easy`.
pub fn constrain_four([again, hard, good, easy]: [u32; 4]) -> [u32; 4] {
    let again = again.min(hard);
    let hard = hard.max(again.saturating_add(1));
    let good = good.max(hard.saturating_add(1));
    let easy = easy.max(good.saturating_add(1));
    [again, hard, good, easy]
}
