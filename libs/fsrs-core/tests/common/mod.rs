//! Shared fixtures for integration tests.
//!
//! Every fixture uses fixed timestamps so scheduling results are
//! reproducible.

#![allow(dead_code)]

pub mod fixtures;

use fsrs_core::{Fsrs, Parameters, SeededRandom};

/// Session with default parameters and the given toggles.
pub fn session(enable_short_term: bool, enable_fuzz: bool) -> Fsrs {
    Fsrs::new(Parameters {
        enable_short_term,
        enable_fuzz,
        ..Default::default()
    })
    .expect("default parameters are valid")
}

/// Fuzzing session driven by a seeded generator.
pub fn seeded_session(enable_short_term: bool, seed: u64) -> Fsrs {
    session(enable_short_term, true).with_random_source(SeededRandom::new(seed))
}
