//! FSRS-6 spaced repetition scheduler.
//!
//! Provides:
//! - Memory model calculators (stability, difficulty, retrievability)
//! - Interval calculation with optional fuzzing
//! - Card state machine with short-term (learning steps) and long-term strategies
//! - Parameter defaults, validation and migration of older weight vectors
//! - Review history bookkeeping (rollback, forget, reschedule)
//!
//! The crate performs no I/O and never reads the clock; every call takes the
//! current time from the caller.

pub mod algorithm;
pub mod card;
pub mod date_utils;
pub mod error;
pub mod fsrs;
pub mod history;
pub mod memory;
pub mod parameters;
pub mod random;
pub mod scheduler;
pub mod types;

pub use algorithm::FsrsAlgorithm;
pub use card::{Card, CardRecord, RecordLog, RecordLogItem, ReviewLog};
pub use error::{FsrsError, Result};
pub use fsrs::Fsrs;
pub use history::ReplayEntry;
pub use memory::{Difficulty, MemoryState, Retrievability, Stability};
pub use parameters::{
    clip_weights, generate, migrate, MigratedWeights, MigrationWarning, Parameters,
    PartialParameters,
};
pub use random::{RandomSource, SeededRandom};
pub use scheduler::Strategy;
pub use types::{Grade, LearningStep, State, StepUnit};
