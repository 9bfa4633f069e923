//! Scheduler parameters: defaults, validation, clamping and migration of
//! legacy weight vectors.
//!
//! The current schema has 21 weights. Vectors fitted for the two earlier
//! schemas (17 and 19 weights) are migrated on load:
//! - 19 weights: clamped, then padded with `0.0` and the legacy decay.
//! - 17 weights: clamped, indices 4-6 rewritten to the new difficulty
//!   formulation, then padded with three zeros and the legacy decay.

use crate::error::{FsrsError, Result};
use crate::memory::{MAX_DIFFICULTY, MAX_STABILITY, MIN_DIFFICULTY, MIN_STABILITY};
use crate::types::LearningStep;
use serde::{Deserialize, Serialize};

/// Number of weights in the current schema.
pub const WEIGHT_COUNT: usize = 21;

pub const DEFAULT_REQUEST_RETENTION: f64 = 0.9;
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36500;
/// Largest accepted maximum interval: one day per unit of the stability cap.
pub const MAXIMUM_INTERVAL_LIMIT: u32 = MAX_STABILITY as u32;
pub const DEFAULT_ENABLE_FUZZ: bool = false;
pub const DEFAULT_ENABLE_SHORT_TERM: bool = true;

/// Decay used by the 17 and 19 weight schemas.
pub const LEGACY_DECAY: f64 = 0.5;
/// Decay of the default 21 weight vector.
pub const DEFAULT_DECAY: f64 = 0.1542;

/// Upper bound of the initial stability weights.
pub const INIT_STABILITY_MAX: f64 = 100.0;
/// Default ceiling for the short-term exponents (w17, w18).
pub const SHORT_TERM_CEILING: f64 = 2.0;

pub const DEFAULT_WEIGHTS: [f64; WEIGHT_COUNT] = [
    0.212, 1.2931, 2.3065, 8.2956, // w[0-3]: initial stability for Again, Hard, Good, Easy
    6.4133, // w[4]: initial difficulty base
    0.8334, // w[5]: initial difficulty exponent
    3.0194, // w[6]: difficulty delta
    0.001,  // w[7]: mean reversion weight
    1.8722, // w[8]: recall stability exponent
    0.1666, // w[9]: recall stability decay
    0.796,  // w[10]: recall retrievability effect
    1.4835, // w[11]: forget stability base
    0.0614, // w[12]: forget difficulty exponent
    0.2629, // w[13]: forget stability exponent
    1.6483, // w[14]: forget retrievability effect
    0.6014, // w[15]: hard penalty
    1.8729, // w[16]: easy bonus
    0.5425, // w[17]: short-term grade exponent
    0.0912, // w[18]: short-term grade offset
    0.0658, // w[19]: short-term stability decay
    DEFAULT_DECAY, // w[20]: forgetting curve decay
];

pub fn default_learning_steps() -> Vec<LearningStep> {
    vec![LearningStep::minutes(1), LearningStep::minutes(10)]
}

pub fn default_relearning_steps() -> Vec<LearningStep> {
    vec![LearningStep::minutes(10)]
}

/// Complete, validated scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub request_retention: f64,
    pub maximum_interval: u32,
    pub weights: [f64; WEIGHT_COUNT],
    pub enable_fuzz: bool,
    pub enable_short_term: bool,
    pub learning_steps: Vec<LearningStep>,
    pub relearning_steps: Vec<LearningStep>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            request_retention: DEFAULT_REQUEST_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            weights: DEFAULT_WEIGHTS,
            enable_fuzz: DEFAULT_ENABLE_FUZZ,
            enable_short_term: DEFAULT_ENABLE_SHORT_TERM,
            learning_steps: default_learning_steps(),
            relearning_steps: default_relearning_steps(),
        }
    }
}

impl Parameters {
    /// Check every field, returning the parameters unchanged on success.
    pub fn validated(self) -> Result<Self> {
        if !(self.request_retention > 0.0 && self.request_retention <= 1.0) {
            return Err(FsrsError::InvalidRetention(self.request_retention));
        }
        if self.maximum_interval == 0 {
            return Err(FsrsError::parameter("maximum interval must be positive"));
        }
        if self.maximum_interval > MAXIMUM_INTERVAL_LIMIT {
            return Err(FsrsError::parameter(format!(
                "maximum interval {} exceeds {MAXIMUM_INTERVAL_LIMIT} days",
                self.maximum_interval
            )));
        }
        validate(&self.weights)?;
        check_bounds(&self.weights)?;
        if let Some(step) = self
            .learning_steps
            .iter()
            .chain(self.relearning_steps.iter())
            .find(|step| step.magnitude == 0)
        {
            return Err(FsrsError::InvalidStep(step.to_string()));
        }
        Ok(self)
    }

    /// Forgetting curve decay (always negative).
    pub fn decay(&self) -> f64 {
        -self.weights[20]
    }
}

/// Overrides merged over the defaults by [`generate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_retention: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_fuzz: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_short_term: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_steps: Option<Vec<LearningStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relearning_steps: Option<Vec<LearningStep>>,
}

impl PartialParameters {
    /// Parse overrides from a JSON document.
    ///
    /// A malformed learning step is reported as [`FsrsError::InvalidStep`];
    /// any other problem with the document as [`FsrsError::InvalidParameter`].
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| FsrsError::parameter(e.to_string()))?;
        for key in ["learning_steps", "relearning_steps"] {
            let steps = value.get(key).and_then(serde_json::Value::as_array);
            for step in steps.into_iter().flatten().filter_map(serde_json::Value::as_str) {
                step.parse::<LearningStep>()?;
            }
        }
        serde_json::from_value(value).map_err(|e| FsrsError::parameter(e.to_string()))
    }
}

/// Recoverable problem found while migrating a weight vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationWarning {
    /// The vector length matched no known schema; defaults were used instead.
    UnsupportedLength { found: usize },
}

/// Output of [`migrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct MigratedWeights {
    pub weights: [f64; WEIGHT_COUNT],
    pub warning: Option<MigrationWarning>,
}

/// Reject weight vectors with non-finite values or an unknown length.
pub fn validate(weights: &[f64]) -> Result<()> {
    if let Some((index, value)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
        return Err(FsrsError::parameter(format!(
            "weight w[{index}] is not finite: {value}"
        )));
    }
    if !matches!(weights.len(), 17 | 19 | 21) {
        return Err(FsrsError::parameter(format!(
            "weight vector must have 17, 19 or 21 values, got {}",
            weights.len()
        )));
    }
    Ok(())
}

/// Per-index (min, max) bounds for the 21 weights.
pub fn weight_bounds(short_term_ceiling: f64, enable_short_term: bool) -> [(f64, f64); WEIGHT_COUNT] {
    [
        (MIN_STABILITY, INIT_STABILITY_MAX),
        (MIN_STABILITY, INIT_STABILITY_MAX),
        (MIN_STABILITY, INIT_STABILITY_MAX),
        (MIN_STABILITY, INIT_STABILITY_MAX),
        (MIN_DIFFICULTY, MAX_DIFFICULTY),
        (0.001, 4.0),
        (0.001, 4.0),
        (0.001, 0.75),
        (0.0, 4.5),
        (0.0, 0.8),
        (0.001, 3.5),
        (0.001, 5.0),
        (0.001, 0.25),
        (0.001, 0.9),
        (0.0, 4.0),
        (0.0, 1.0),
        (1.0, 6.0),
        (0.0, short_term_ceiling),
        (0.0, short_term_ceiling),
        (if enable_short_term { 0.01 } else { 0.0 }, 0.8),
        (0.1, 0.8),
    ]
}

/// Reject a 21 weight vector with a value outside its static bound.
///
/// The w19 floor and the w17/w18 ceiling that depend on the step
/// configuration are only applied by [`clip_weights`]: legacy vectors carry
/// `w19 = 0` and the default w17 sits above the ceiling for several
/// relearning steps.
fn check_bounds(weights: &[f64; WEIGHT_COUNT]) -> Result<()> {
    let bounds = weight_bounds(SHORT_TERM_CEILING, false);
    for (index, (&w, &(min, max))) in weights.iter().zip(bounds.iter()).enumerate() {
        if !(min..=max).contains(&w) {
            return Err(FsrsError::parameter(format!(
                "weight w[{index}] = {w} is outside [{min}, {max}]"
            )));
        }
    }
    Ok(())
}

/// Ceiling for w17/w18 when several relearning steps are configured.
///
/// Keeps the stability gained over the relearning steps from exceeding the
/// stability the card had before the lapse.
fn short_term_ceiling(weights: &[f64], relearning_step_count: usize) -> f64 {
    if relearning_step_count <= 1 || weights.len() < 15 {
        return SHORT_TERM_CEILING;
    }
    let value = -(weights[11].ln() + (2f64.powf(weights[13]) - 1.0).ln() + weights[14] * 0.3)
        / relearning_step_count as f64;
    if value.is_finite() {
        round8(value).clamp(0.01, SHORT_TERM_CEILING)
    } else {
        SHORT_TERM_CEILING
    }
}

/// Clamp each weight to its documented bound.
///
/// Works on vectors of any schema length; only the leading bounds are used.
pub fn clip_weights(weights: &[f64], relearning_step_count: usize, enable_short_term: bool) -> Vec<f64> {
    let ceiling = short_term_ceiling(weights, relearning_step_count);
    let bounds = weight_bounds(ceiling, enable_short_term);
    weights
        .iter()
        .zip(bounds.iter())
        .map(|(&w, &(min, max))| {
            let w = if w.is_nan() { 0.0 } else { w };
            w.clamp(min, max)
        })
        .collect()
}

/// Bring any supported weight vector to the current 21 weight schema.
pub fn migrate(
    weights: Option<&[f64]>,
    relearning_step_count: usize,
    enable_short_term: bool,
) -> MigratedWeights {
    let Some(weights) = weights else {
        return MigratedWeights {
            weights: DEFAULT_WEIGHTS,
            warning: None,
        };
    };

    let migrated = match weights.len() {
        21 => clip_weights(weights, relearning_step_count, enable_short_term),
        19 => {
            tracing::debug!("filling 19 weight vector to 21");
            let mut w = clip_weights(weights, relearning_step_count, enable_short_term);
            w.extend_from_slice(&[0.0, LEGACY_DECAY]);
            w
        }
        17 => {
            tracing::debug!("filling 17 weight vector to 21");
            let mut w = clip_weights(weights, relearning_step_count, enable_short_term);
            let bounds = weight_bounds(SHORT_TERM_CEILING, enable_short_term);
            w[4] = round8(w[5] * 2.0 + w[4]).clamp(bounds[4].0, bounds[4].1);
            w[5] = round8((w[5] * 3.0 + 1.0).ln() / 3.0).clamp(bounds[5].0, bounds[5].1);
            w[6] = round8(w[6] + 0.5).clamp(bounds[6].0, bounds[6].1);
            w.extend_from_slice(&[0.0, 0.0, 0.0, LEGACY_DECAY]);
            w
        }
        found => {
            tracing::warn!(found, "unsupported weight vector length, using default weights");
            return MigratedWeights {
                weights: DEFAULT_WEIGHTS,
                warning: Some(MigrationWarning::UnsupportedLength { found }),
            };
        }
    };

    let mut out = DEFAULT_WEIGHTS;
    out.copy_from_slice(&migrated[..WEIGHT_COUNT]);
    MigratedWeights {
        weights: out,
        warning: None,
    }
}

/// Merge overrides over the defaults and migrate the weight vector.
pub fn generate(partial: &PartialParameters) -> Result<Parameters> {
    let learning_steps = partial
        .learning_steps
        .clone()
        .unwrap_or_else(default_learning_steps);
    let relearning_steps = partial
        .relearning_steps
        .clone()
        .unwrap_or_else(default_relearning_steps);
    let enable_short_term = partial.enable_short_term.unwrap_or(DEFAULT_ENABLE_SHORT_TERM);

    if let Some(weights) = &partial.weights {
        if let Some(value) = weights.iter().find(|w| !w.is_finite()) {
            return Err(FsrsError::parameter(format!("weight is not finite: {value}")));
        }
    }

    let migrated = migrate(
        partial.weights.as_deref(),
        relearning_steps.len(),
        enable_short_term,
    );

    Parameters {
        request_retention: partial
            .request_retention
            .unwrap_or(DEFAULT_REQUEST_RETENTION),
        maximum_interval: partial.maximum_interval.unwrap_or(DEFAULT_MAXIMUM_INTERVAL),
        weights: migrated.weights,
        enable_fuzz: partial.enable_fuzz.unwrap_or(DEFAULT_ENABLE_FUZZ),
        enable_short_term,
        learning_steps,
        relearning_steps,
    }
    .validated()
}

/// Round to 8 decimal places.
pub(crate) fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}
