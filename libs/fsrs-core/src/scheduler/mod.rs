//! Card state machine.
//!
//! ```text
//! New        -> Learning | Review
//! Learning   -> Learning | Review
//! Review     -> Review   | Relearning
//! Relearning -> Relearning | Review
//! ```
//!
//! Every call works on a copy of the caller's card. Two strategies share the
//! dispatch below and differ in how New and Learning/Relearning cards move.

mod long_term;
mod short_term;
pub mod steps;

use crate::algorithm::{FsrsAlgorithm, FuzzDraw};
use crate::card::{CardRecord, RecordLogItem, ReviewLog};
use crate::date_utils::{add_days, date_diff_in_days};
use crate::error::{FsrsError, Result};
use crate::memory::MemoryState;
use crate::types::{Grade, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scheduling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Honors sub-day learning and relearning steps.
    ShortTerm,
    /// Always schedules whole-day intervals.
    LongTerm,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }

    pub fn for_short_term(enable_short_term: bool) -> Self {
        if enable_short_term {
            Self::ShortTerm
        } else {
            Self::LongTerm
        }
    }
}

/// State shared by every branch of one scheduling call.
pub(crate) struct Context<'a, C: CardRecord> {
    pub alg: &'a FsrsAlgorithm,
    /// The caller's card, untouched.
    pub last: &'a C,
    /// Copy with `reps` and `last_review` already updated.
    pub current: C,
    pub now: DateTime<Utc>,
    pub elapsed_days: u32,
}

impl<'a, C: CardRecord> Context<'a, C> {
    fn new(alg: &'a FsrsAlgorithm, card: &'a C, now: DateTime<Utc>) -> Self {
        let elapsed_days = match (card.state(), card.last_review()) {
            (State::New, _) | (_, None) => 0,
            (_, Some(last_review)) => date_diff_in_days(last_review, now).max(0) as u32,
        };
        let mut current = card.clone();
        current.set_last_review(Some(now));
        current.set_reps(card.reps().saturating_add(1));
        Self {
            alg,
            last: card,
            current,
            now,
            elapsed_days,
        }
    }

    /// Memory state of a reviewed card; the new-card sentinel is an error here.
    pub fn memory(&self) -> Result<MemoryState> {
        let memory = self.last.memory_state()?;
        if memory.stability.is_new() {
            return Err(FsrsError::InvalidStability(memory.stability()));
        }
        if memory.difficulty.is_new() {
            return Err(FsrsError::InvalidDifficulty(memory.difficulty()));
        }
        Ok(memory)
    }

    /// Retrievability of the pre-review card at the time of this call.
    pub fn retrievability(&self, memory: &MemoryState) -> f64 {
        self.alg
            .forgetting_curve(self.elapsed_days as f64, memory.stability())
    }

    /// A fresh copy of the updated card carrying `memory`.
    pub fn next_card(&self, memory: MemoryState) -> C {
        let mut next = self.current.clone();
        next.set_memory_state(memory);
        next
    }

    /// Move `card` to Review with a whole-day interval.
    pub fn graduate(&self, card: &mut C, days: u32) -> Result<()> {
        card.set_state(State::Review);
        card.set_learning_steps(0);
        card.set_scheduled_days(days);
        card.set_due(add_days(self.now, days as i64)?);
        Ok(())
    }
}

/// Schedule `card` for `grade` at `now`.
pub(crate) fn schedule<C: CardRecord>(
    alg: &FsrsAlgorithm,
    strategy: Strategy,
    card: &C,
    now: DateTime<Utc>,
    grade: Grade,
    fuzz: &mut FuzzDraw<'_>,
) -> Result<RecordLogItem<C>> {
    if !grade.is_gradable() {
        return Err(FsrsError::ManualGradeNotAllowed);
    }

    let ctx = Context::new(alg, card, now);
    tracing::debug!(
        strategy = strategy.name(),
        state = card.state().as_str(),
        ?grade,
        elapsed_days = ctx.elapsed_days,
        "scheduling card"
    );

    let next = match (strategy, card.state()) {
        (Strategy::ShortTerm, State::New) => short_term::new_state(&ctx, grade, fuzz)?,
        (Strategy::ShortTerm, State::Learning | State::Relearning) => {
            short_term::learning_state(&ctx, grade, fuzz)?
        }
        (Strategy::ShortTerm, State::Review) => short_term::review_state(&ctx, grade, fuzz)?,
        (Strategy::LongTerm, State::New) => long_term::new_state(&ctx, grade, fuzz)?,
        (Strategy::LongTerm, State::Learning | State::Relearning | State::Review) => {
            long_term::review_state(&ctx, grade, fuzz)?
        }
    };

    let log = ReviewLog::build(grade, card, &next, ctx.elapsed_days, now);
    Ok(RecordLogItem { card: next, log })
}

/// Pick the entry matching `grade` from values computed for all grades.
pub(crate) fn select<T>(grade: Grade, [again, hard, good, easy]: [T; 4]) -> Result<T> {
    match grade {
        Grade::Again => Ok(again),
        Grade::Hard => Ok(hard),
        Grade::Good => Ok(good),
        Grade::Easy => Ok(easy),
        Grade::Manual => Err(FsrsError::grade(grade, "interval selection")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use crate::parameters::Parameters;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn manual_grade_rejected_for_both_strategies() {
        let alg = FsrsAlgorithm::new(Parameters::default()).unwrap();
        let card = Card::new(now());
        for strategy in [Strategy::ShortTerm, Strategy::LongTerm] {
            let result = schedule(
                &alg,
                strategy,
                &card,
                now(),
                Grade::Manual,
                &mut FuzzDraw::disabled(),
            );
            assert_eq!(result, Err(FsrsError::ManualGradeNotAllowed));
        }
    }

    #[test]
    fn context_counts_calendar_days() {
        let alg = FsrsAlgorithm::new(Parameters::default()).unwrap();
        let card = Card {
            state: State::Review,
            last_review: Some(Utc.with_ymd_and_hms(2024, 5, 29, 23, 30, 0).unwrap()),
            stability: 5.0,
            difficulty: 5.0,
            reps: 3,
            ..Card::new(now())
        };
        let ctx = Context::new(&alg, &card, now());
        assert_eq!(ctx.elapsed_days, 3);
        assert_eq!(ctx.current.reps, 4);
        assert_eq!(ctx.current.last_review, Some(now()));
        assert_eq!(card.reps, 3);
    }

    #[test]
    fn reviewed_card_without_memory_is_an_error() {
        let alg = FsrsAlgorithm::new(Parameters::default()).unwrap();
        let card = Card {
            state: State::Review,
            last_review: Some(now()),
            ..Card::new(now())
        };
        for strategy in [Strategy::ShortTerm, Strategy::LongTerm] {
            let result = schedule(
                &alg,
                strategy,
                &card,
                now(),
                Grade::Good,
                &mut FuzzDraw::disabled(),
            );
            assert_eq!(result, Err(FsrsError::InvalidStability(0.0)));
        }
    }

    #[test]
    fn select_picks_grade() {
        assert_eq!(select(Grade::Good, [1, 2, 3, 4]), Ok(3));
        assert!(select(Grade::Manual, [1, 2, 3, 4]).is_err());
    }

    #[test]
    fn strategy_follows_short_term_flag() {
        assert_eq!(Strategy::for_short_term(true), Strategy::ShortTerm);
        assert_eq!(Strategy::for_short_term(false), Strategy::LongTerm);
    }
}
