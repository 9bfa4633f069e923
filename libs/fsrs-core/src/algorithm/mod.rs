//! FSRS-6 memory model.
//!
//! DSR model:
//! - Difficulty (D): item difficulty 1-10
//! - Stability (S): days until retrievability drops to 90%
//! - Retrievability (R): probability of recall after `t` days,
//!   `R = (1 + FACTOR * t / S)^DECAY` with `DECAY = -w[20]` and
//!   `FACTOR = 0.9^(1 / DECAY) - 1`
//!
//! All calculators are pure. Results are clamped to their documented range
//! and then built through the validated value types in [`crate::memory`].

mod difficulty;
mod interval;
mod stability;

pub use interval::{constrain_four, constrain_three, fuzz_range, FuzzDraw, FuzzRange, FUZZ_RANGES};

use crate::error::{FsrsError, Result};
use crate::memory::{MemoryState, Retrievability};
use crate::parameters::{round8, Parameters};
use crate::types::Grade;

/// Calculators bound to one validated parameter set.
///
/// The decay, factor and interval modifier are derived once from the weights;
/// building a new algorithm is the only way to change parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FsrsAlgorithm {
    params: Parameters,
    decay: f64,
    factor: f64,
    interval_modifier: f64,
}

/// `(decay, factor)` of the forgetting curve for a weight vector.
pub fn decay_factor(weights: &[f64]) -> (f64, f64) {
    let decay = -weights[20];
    let factor = ((1.0 / decay) * 0.9f64.ln()).exp() - 1.0;
    (decay, round8(factor))
}

impl FsrsAlgorithm {
    pub fn new(params: Parameters) -> Result<Self> {
        let params = params.validated()?;
        let (decay, factor) = decay_factor(&params.weights);
        let interval_modifier = interval::interval_modifier(decay, factor, params.request_retention)?;
        Ok(Self {
            params,
            decay,
            factor,
            interval_modifier,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn interval_modifier(&self) -> f64 {
        self.interval_modifier
    }

    pub(crate) fn w(&self, index: usize) -> f64 {
        self.params.weights[index]
    }

    /// Probability of recall after `elapsed_days` at `stability`, in [0, 1].
    pub fn forgetting_curve(&self, elapsed_days: f64, stability: f64) -> f64 {
        if stability <= 0.0 {
            return 0.0;
        }
        let t = elapsed_days.max(0.0);
        let r = (1.0 + self.factor * t / stability).powf(self.decay);
        round8(r.clamp(0.0, 1.0))
    }

    /// [`Self::forgetting_curve`] as a validated value.
    pub fn retrievability(&self, elapsed_days: f64, stability: f64) -> Result<Retrievability> {
        Retrievability::new(self.forgetting_curve(elapsed_days, stability))
    }

    /// Card-independent memory update.
    ///
    /// `None` (or the new-card sentinel) yields the initial state for `grade`.
    /// A same-day review uses short-term stability when short-term scheduling
    /// is enabled; otherwise recall or forget stability is used.
    pub fn next_memory_state(
        &self,
        memory: Option<MemoryState>,
        elapsed_days: f64,
        grade: Grade,
    ) -> Result<MemoryState> {
        if !grade.is_gradable() {
            return Err(FsrsError::ManualGradeNotAllowed);
        }
        if !(elapsed_days >= 0.0) {
            return Err(FsrsError::parameter(format!(
                "elapsed days must be non-negative, got {elapsed_days}"
            )));
        }

        let memory = match memory {
            Some(m) if !m.is_new() => m,
            _ => {
                return Ok(MemoryState {
                    stability: self.init_stability(grade)?,
                    difficulty: self.init_difficulty(grade)?,
                })
            }
        };
        if memory.stability.is_new() || memory.difficulty.is_new() {
            return Err(FsrsError::parameter(
                "memory state has only one of stability and difficulty set",
            ));
        }

        let (s, d) = (memory.stability(), memory.difficulty());
        let difficulty = self.next_difficulty(d, grade)?;
        let stability = if elapsed_days == 0.0 && self.params.enable_short_term {
            self.next_short_term_stability(s, grade)?
        } else {
            let r = self.forgetting_curve(elapsed_days, s);
            if grade == Grade::Again {
                self.next_forget_stability(d, s, r)?
            } else {
                self.next_recall_stability(d, s, r, grade)?
            }
        };
        Ok(MemoryState {
            stability,
            difficulty,
        })
    }
}
