//! Stability calculators.

use super::FsrsAlgorithm;
use crate::error::{FsrsError, Result};
use crate::memory::{Stability, MAX_STABILITY, MIN_STABILITY};
use crate::parameters::round8;
use crate::types::Grade;

fn clamp_stability(value: f64) -> Result<Stability> {
    Stability::new(round8(value.clamp(MIN_STABILITY, MAX_STABILITY)))
}

impl FsrsAlgorithm {
    /// Initial stability after the first review.
    /// S0(G) = max(w[G-1], 0.1)
    pub fn init_stability(&self, grade: Grade) -> Result<Stability> {
        let index = grade.index().ok_or(FsrsError::ManualGradeNotAllowed)?;
        Stability::new(self.w(index).max(0.1))
    }

    /// Stability after a successful recall.
    /// S' = S * (1 + e^w8 * (11 - D) * S^-w9 * (e^((1-R)*w10) - 1) * hard_penalty * easy_bonus)
    pub fn next_recall_stability(
        &self,
        difficulty: f64,
        stability: f64,
        retrievability: f64,
        grade: Grade,
    ) -> Result<Stability> {
        let (hard_penalty, easy_bonus) = match grade {
            Grade::Hard => (self.w(15), 1.0),
            Grade::Good => (1.0, 1.0),
            Grade::Easy => (1.0, self.w(16)),
            Grade::Manual => return Err(FsrsError::ManualGradeNotAllowed),
            Grade::Again => return Err(FsrsError::grade(grade, "recall stability")),
        };
        let growth = self.w(8).exp()
            * (11.0 - difficulty)
            * stability.powf(-self.w(9))
            * (((1.0 - retrievability) * self.w(10)).exp() - 1.0)
            * hard_penalty
            * easy_bonus;
        clamp_stability(stability * (1.0 + growth))
    }

    /// Stability after a lapse.
    /// S' = w11 * D^-w12 * ((S+1)^w13 - 1) * e^((1-R)*w14)
    pub fn next_forget_stability(
        &self,
        difficulty: f64,
        stability: f64,
        retrievability: f64,
    ) -> Result<Stability> {
        let s = self.w(11)
            * difficulty.powf(-self.w(12))
            * ((stability + 1.0).powf(self.w(13)) - 1.0)
            * ((1.0 - retrievability) * self.w(14)).exp();
        clamp_stability(s)
    }

    /// Stability after a same-day (learning or relearning step) review.
    /// SInc = S^-w19 * e^(w17 * (G - 3 + w18)), floored at 1 for Good/Easy
    pub fn next_short_term_stability(&self, stability: f64, grade: Grade) -> Result<Stability> {
        if !grade.is_gradable() {
            return Err(FsrsError::ManualGradeNotAllowed);
        }
        let g = grade.to_value() as f64;
        let sinc = stability.powf(-self.w(19)) * (self.w(17) * (g - 3.0 + self.w(18))).exp();
        let sinc = if g >= 3.0 { sinc.max(1.0) } else { sinc };
        clamp_stability(stability * sinc)
    }
}
