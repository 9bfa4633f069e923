//! Scheduling session.
//!
//! `Fsrs` binds one validated parameter set, a scheduling strategy and a
//! random source. It is the entry point hosts use to preview and apply
//! reviews.

use crate::algorithm::{FsrsAlgorithm, FuzzDraw};
use crate::card::{CardRecord, RecordLog, RecordLogItem};
use crate::date_utils::date_diff_in_days;
use crate::error::Result;
use crate::memory::Retrievability;
use crate::parameters::{generate, Parameters, PartialParameters};
use crate::random::{RandomSource, SeededRandom};
use crate::scheduler::{schedule, Strategy};
use crate::types::{Grade, State};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Mutex, PoisonError};

pub struct Fsrs {
    algorithm: FsrsAlgorithm,
    strategy: Strategy,
    random: Mutex<Box<dyn RandomSource>>,
}

impl fmt::Debug for Fsrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsrs")
            .field("algorithm", &self.algorithm)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl Fsrs {
    /// Session for `params`, using the seeded default random source.
    ///
    /// The strategy follows `enable_short_term`.
    pub fn new(params: Parameters) -> Result<Self> {
        let algorithm = FsrsAlgorithm::new(params)?;
        let strategy = Strategy::for_short_term(algorithm.parameters().enable_short_term);
        tracing::debug!(
            strategy = strategy.name(),
            enable_fuzz = algorithm.parameters().enable_fuzz,
            "fsrs session created"
        );
        Ok(Self {
            algorithm,
            strategy,
            random: Mutex::new(Box::new(SeededRandom::default())),
        })
    }

    /// Session for a partial override merged over the defaults.
    pub fn from_partial(partial: &PartialParameters) -> Result<Self> {
        Self::new(generate(partial)?)
    }

    pub fn with_random_source(mut self, source: impl RandomSource + 'static) -> Self {
        self.random = Mutex::new(Box::new(source));
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn parameters(&self) -> &Parameters {
        self.algorithm.parameters()
    }

    pub fn algorithm(&self) -> &FsrsAlgorithm {
        &self.algorithm
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Run `f` with this call's fuzz draw. The random source is only locked
    /// when fuzzing is enabled.
    fn with_fuzz<T>(&self, f: impl FnOnce(&mut FuzzDraw<'_>) -> T) -> T {
        if !self.algorithm.parameters().enable_fuzz {
            return f(&mut FuzzDraw::disabled());
        }
        let mut source = self.random.lock().unwrap_or_else(PoisonError::into_inner);
        let mut draw = FuzzDraw::new(&mut **source);
        f(&mut draw)
    }

    /// Apply `grade` to `card` at `now`. The caller's card is not modified.
    pub fn review<C: CardRecord>(
        &self,
        card: &C,
        now: DateTime<Utc>,
        grade: Grade,
    ) -> Result<RecordLogItem<C>> {
        self.with_fuzz(|fuzz| schedule(&self.algorithm, self.strategy, card, now, grade, fuzz))
    }

    /// Outcomes of all four grades.
    ///
    /// The four replays share one fuzz draw, so fuzzing never reorders them.
    pub fn preview<C: CardRecord>(&self, card: &C, now: DateTime<Utc>) -> Result<RecordLog<C>> {
        self.with_fuzz(|fuzz| -> Result<RecordLog<C>> {
            let mut next =
                |grade| schedule(&self.algorithm, self.strategy, card, now, grade, &mut *fuzz);
            Ok(RecordLog {
                again: next(Grade::Again)?,
                hard: next(Grade::Hard)?,
                good: next(Grade::Good)?,
                easy: next(Grade::Easy)?,
            })
        })
    }

    pub fn forgetting_curve(&self, elapsed_days: f64, stability: f64) -> f64 {
        self.algorithm.forgetting_curve(elapsed_days, stability)
    }

    /// Current recall probability of `card`; zero until it has been reviewed.
    pub fn retrievability<C: CardRecord>(
        &self,
        card: &C,
        now: DateTime<Utc>,
    ) -> Result<Retrievability> {
        match (card.state(), card.last_review()) {
            (State::New, _) | (_, None) => Ok(Retrievability::ZERO),
            (_, Some(last_review)) => {
                let elapsed = date_diff_in_days(last_review, now).max(0);
                self.algorithm
                    .retrievability(elapsed as f64, card.stability())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use crate::error::FsrsError;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn session() -> Fsrs {
        Fsrs::new(Parameters::default()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn review_card() -> Card {
        Card {
            state: State::Review,
            last_review: Some(now() - Duration::days(10)),
            stability: 10.0,
            difficulty: 5.0,
            scheduled_days: 10,
            reps: 5,
            ..Card::new(now())
        }
    }

    #[test]
    fn strategy_follows_parameters() {
        let short = Fsrs::new(Parameters::default()).unwrap();
        assert_eq!(short.strategy(), Strategy::ShortTerm);
        let long = Fsrs::new(Parameters {
            enable_short_term: false,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(long.strategy(), Strategy::LongTerm);
        assert_eq!(
            long.with_strategy(Strategy::ShortTerm).strategy(),
            Strategy::ShortTerm
        );
    }

    #[test]
    fn invalid_parameters_rejected() {
        let result = Fsrs::new(Parameters {
            request_retention: 1.5,
            ..Default::default()
        });
        assert_eq!(result.unwrap_err(), FsrsError::InvalidRetention(1.5));
    }

    #[test]
    fn from_partial_applies_overrides() {
        let partial = PartialParameters::from_json(r#"{"maximum_interval": 365}"#).unwrap();
        let fsrs = Fsrs::from_partial(&partial).unwrap();
        assert_eq!(fsrs.parameters().maximum_interval, 365);
    }

    #[test]
    fn preview_matches_individual_reviews() {
        let fsrs = session();
        let card = review_card();
        let preview = fsrs.preview(&card, now()).unwrap();
        for (grade, item) in preview.iter() {
            assert_eq!(item, &fsrs.review(&card, now(), grade).unwrap());
        }
    }

    #[test]
    fn manual_review_rejected() {
        let fsrs = session();
        let result = fsrs.review(&Card::new(now()), now(), Grade::Manual);
        assert_eq!(result.unwrap_err(), FsrsError::ManualGradeNotAllowed);
    }

    #[test]
    fn fuzz_draws_once_per_preview() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let fsrs = Fsrs::new(Parameters {
            enable_fuzz: true,
            enable_short_term: false,
            ..Default::default()
        })
        .unwrap()
        .with_random_source(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            0.5
        });

        let preview = fsrs.preview(&review_card(), now()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let days: Vec<u32> = preview.iter().map(|(_, i)| i.card.scheduled_days).collect();
        assert!(days[1] < days[2] && days[2] < days[3], "{days:?}");
    }

    #[test]
    fn fuzz_disabled_never_draws() {
        let fsrs = session().with_random_source(|| -> f64 { panic!("drawn") });
        fsrs.preview(&review_card(), now()).unwrap();
    }

    #[test]
    fn retrievability_of_cards() {
        let fsrs = session();
        assert_eq!(
            fsrs.retrievability(&Card::new(now()), now()).unwrap(),
            Retrievability::ZERO
        );
        let r = fsrs.retrievability(&review_card(), now()).unwrap();
        assert!((r.value() - 0.9).abs() < 1e-6);
        assert_eq!(r.percent(), "90.00%");
    }
}
