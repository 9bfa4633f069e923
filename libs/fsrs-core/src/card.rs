//! Card records and review logs.

use crate::error::Result;
use crate::memory::MemoryState;
use crate::types::{Grade, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capability interface for anything the scheduler can review.
///
/// The scheduler clones the record, updates the clone through the setters and
/// returns it; the caller's value is never modified.
pub trait CardRecord: Clone {
    fn due(&self) -> DateTime<Utc>;
    fn set_due(&mut self, due: DateTime<Utc>);

    fn state(&self) -> State;
    fn set_state(&mut self, state: State);

    fn last_review(&self) -> Option<DateTime<Utc>>;
    fn set_last_review(&mut self, last_review: Option<DateTime<Utc>>);

    fn stability(&self) -> f64;
    fn set_stability(&mut self, stability: f64);

    fn difficulty(&self) -> f64;
    fn set_difficulty(&mut self, difficulty: f64);

    fn scheduled_days(&self) -> u32;
    fn set_scheduled_days(&mut self, days: u32);

    fn learning_steps(&self) -> u32;
    fn set_learning_steps(&mut self, step: u32);

    fn reps(&self) -> u32;
    fn set_reps(&mut self, reps: u32);

    fn lapses(&self) -> u32;
    fn set_lapses(&mut self, lapses: u32);

    /// Validated memory state of the record.
    fn memory_state(&self) -> Result<MemoryState> {
        MemoryState::new(self.stability(), self.difficulty())
    }

    fn set_memory_state(&mut self, memory: MemoryState) {
        self.set_stability(memory.stability());
        self.set_difficulty(memory.difficulty());
    }
}

/// Plain card record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub due: DateTime<Utc>,
    pub state: State,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    pub stability: f64,
    pub difficulty: f64,
    pub scheduled_days: u32,
    pub learning_steps: u32,
    pub reps: u32,
    pub lapses: u32,
}

impl Card {
    /// A new card, due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            due: now,
            state: State::New,
            last_review: None,
            stability: 0.0,
            difficulty: 0.0,
            scheduled_days: 0,
            learning_steps: 0,
            reps: 0,
            lapses: 0,
        }
    }
}

impl CardRecord for Card {
    fn due(&self) -> DateTime<Utc> {
        self.due
    }
    fn set_due(&mut self, due: DateTime<Utc>) {
        self.due = due;
    }

    fn state(&self) -> State {
        self.state
    }
    fn set_state(&mut self, state: State) {
        self.state = state;
    }

    fn last_review(&self) -> Option<DateTime<Utc>> {
        self.last_review
    }
    fn set_last_review(&mut self, last_review: Option<DateTime<Utc>>) {
        self.last_review = last_review;
    }

    fn stability(&self) -> f64 {
        self.stability
    }
    fn set_stability(&mut self, stability: f64) {
        self.stability = stability;
    }

    fn difficulty(&self) -> f64 {
        self.difficulty
    }
    fn set_difficulty(&mut self, difficulty: f64) {
        self.difficulty = difficulty;
    }

    fn scheduled_days(&self) -> u32 {
        self.scheduled_days
    }
    fn set_scheduled_days(&mut self, days: u32) {
        self.scheduled_days = days;
    }

    fn learning_steps(&self) -> u32 {
        self.learning_steps
    }
    fn set_learning_steps(&mut self, step: u32) {
        self.learning_steps = step;
    }

    fn reps(&self) -> u32 {
        self.reps
    }
    fn set_reps(&mut self, reps: u32) {
        self.reps = reps;
    }

    fn lapses(&self) -> u32 {
        self.lapses
    }
    fn set_lapses(&mut self, lapses: u32) {
        self.lapses = lapses;
    }
}

/// Audit record of one scheduling call.
///
/// `state`, `due`, `stability`, `difficulty`, `last_review`,
/// `last_scheduled_days` and `last_learning_steps` describe the card before
/// the review; `scheduled_days`, `learning_steps` and `lapse` are the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    pub grade: Grade,
    pub state: State,
    pub due: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    pub last_scheduled_days: u32,
    pub last_learning_steps: u32,
    pub elapsed_days: u32,
    pub scheduled_days: u32,
    pub learning_steps: u32,
    /// The review added one to the card's lapse count.
    #[serde(default)]
    pub lapse: bool,
    pub review: DateTime<Utc>,
}

impl ReviewLog {
    /// Log entry for `grade` applied to `before`, producing `after`.
    pub(crate) fn build<C: CardRecord>(
        grade: Grade,
        before: &C,
        after: &C,
        elapsed_days: u32,
        review: DateTime<Utc>,
    ) -> Self {
        Self {
            grade,
            state: before.state(),
            due: before.due(),
            stability: before.stability(),
            difficulty: before.difficulty(),
            last_review: before.last_review(),
            last_scheduled_days: before.scheduled_days(),
            last_learning_steps: before.learning_steps(),
            elapsed_days,
            scheduled_days: after.scheduled_days(),
            learning_steps: after.learning_steps(),
            lapse: after.lapses() > before.lapses(),
            review,
        }
    }
}

/// Updated card plus the log describing the transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLogItem<C> {
    pub card: C,
    pub log: ReviewLog,
}

/// Outcomes for all four gradable grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLog<C> {
    pub again: RecordLogItem<C>,
    pub hard: RecordLogItem<C>,
    pub good: RecordLogItem<C>,
    pub easy: RecordLogItem<C>,
}

impl<C> RecordLog<C> {
    pub fn get(&self, grade: Grade) -> Option<&RecordLogItem<C>> {
        match grade {
            Grade::Again => Some(&self.again),
            Grade::Hard => Some(&self.hard),
            Grade::Good => Some(&self.good),
            Grade::Easy => Some(&self.easy),
            Grade::Manual => None,
        }
    }

    /// Items in ascending grade order.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, &RecordLogItem<C>)> {
        [
            (Grade::Again, &self.again),
            (Grade::Hard, &self.hard),
            (Grade::Good, &self.good),
            (Grade::Easy, &self.easy),
        ]
        .into_iter()
    }
}
