//! Difficulty calculators.

use super::FsrsAlgorithm;
use crate::error::{FsrsError, Result};
use crate::memory::{Difficulty, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::parameters::round8;
use crate::types::Grade;

fn clamp_difficulty(value: f64) -> f64 {
    value.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

impl FsrsAlgorithm {
    /// Initial difficulty after the first review.
    /// D0(G) = w4 - e^((G-1) * w5) + 1, clamped to [1, 10]
    pub fn init_difficulty(&self, grade: Grade) -> Result<Difficulty> {
        if !grade.is_gradable() {
            return Err(FsrsError::ManualGradeNotAllowed);
        }
        let g = grade.to_value() as f64;
        let d = self.w(4) - ((g - 1.0) * self.w(5)).exp() + 1.0;
        Difficulty::new(round8(clamp_difficulty(d)))
    }

    /// Next difficulty.
    ///
    /// The raw delta `-w6 * (G - 3)` is damped linearly as D approaches 10,
    /// then pulled toward D0(Easy) by mean reversion with weight w7.
    pub fn next_difficulty(&self, difficulty: f64, grade: Grade) -> Result<Difficulty> {
        if !grade.is_gradable() {
            return Err(FsrsError::ManualGradeNotAllowed);
        }
        let g = grade.to_value() as f64;
        let delta = -self.w(6) * (g - 3.0);
        let damped = clamp_difficulty(difficulty + linear_damping(delta, difficulty));
        let target = self.init_difficulty(Grade::Easy)?.value();
        let reverted = round8(self.w(7) * target + (1.0 - self.w(7)) * damped);
        Difficulty::new(clamp_difficulty(reverted))
    }
}

fn linear_damping(delta: f64, difficulty: f64) -> f64 {
    round8(delta * (10.0 - difficulty) / 9.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Parameters;

    fn algorithm() -> FsrsAlgorithm {
        FsrsAlgorithm::new(Parameters::default()).unwrap()
    }

    #[test]
    fn initial_difficulty_decreases_with_grade() {
        let alg = algorithm();
        let d: Vec<f64> = Grade::GRADABLE
            .iter()
            .map(|&g| alg.init_difficulty(g).unwrap().value())
            .collect();
        assert!(d[0] > d[1]);
        assert!(d[1] > d[2]);
        assert!(d[2] >= d[3]);
        assert!(d.iter().all(|v| (1.0..=10.0).contains(v)));
        assert_eq!(d[0], 6.4133);
    }

    #[test]
    fn again_raises_easy_lowers() {
        let alg = algorithm();
        let again = alg.next_difficulty(5.0, Grade::Again).unwrap().value();
        let good = alg.next_difficulty(5.0, Grade::Good).unwrap().value();
        let easy = alg.next_difficulty(5.0, Grade::Easy).unwrap().value();
        assert!(again > 5.0);
        assert!(easy < 5.0);
        assert!((good - 5.0).abs() < 0.01);
    }

    #[test]
    fn damping_vanishes_at_ceiling() {
        let alg = algorithm();
        let d = alg.next_difficulty(10.0, Grade::Again).unwrap().value();
        assert!(d <= 10.0);
        assert!(d > 9.9);
    }

    #[test]
    fn stays_in_bounds() {
        let alg = algorithm();
        for start in [1.0, 3.3, 7.7, 10.0] {
            for g in Grade::GRADABLE {
                let d = alg.next_difficulty(start, g).unwrap().value();
                assert!((1.0..=10.0).contains(&d));
            }
        }
    }

    #[test]
    fn manual_rejected() {
        let alg = algorithm();
        assert_eq!(
            alg.next_difficulty(5.0, Grade::Manual),
            Err(FsrsError::ManualGradeNotAllowed)
        );
    }

    #[test]
    fn linear_damping_formula() {
        assert_eq!(linear_damping(-9.0, 1.0), -9.0);
        assert_eq!(linear_damping(4.5, 10.0), 0.0);
    }
}
