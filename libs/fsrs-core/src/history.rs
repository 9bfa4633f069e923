//! Review-history bookkeeping: undoing a review, resetting a card and
//! rebuilding a card from its log.

use crate::card::{CardRecord, RecordLogItem, ReviewLog};
use crate::date_utils::date_diff_in_days;
use crate::error::{FsrsError, Result};
use crate::fsrs::Fsrs;
use crate::memory::{Difficulty, Stability};
use crate::types::{Grade, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a review history to replay.
///
/// Gradable entries are replayed as reviews. `Manual` entries are
/// administrative edits and must name the state the card was moved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayEntry {
    pub grade: Grade,
    pub review: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
}

impl ReplayEntry {
    pub fn graded(grade: Grade, review: DateTime<Utc>) -> Self {
        Self {
            grade,
            review,
            state: None,
            due: None,
            stability: None,
            difficulty: None,
        }
    }

    pub fn manual(state: State, review: DateTime<Utc>) -> Self {
        Self {
            state: Some(state),
            ..Self::graded(Grade::Manual, review)
        }
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_memory(mut self, stability: f64, difficulty: f64) -> Self {
        self.stability = Some(stability);
        self.difficulty = Some(difficulty);
        self
    }
}

fn elapsed_since<C: CardRecord>(card: &C, now: DateTime<Utc>) -> u32 {
    match (card.state(), card.last_review()) {
        (State::New, _) | (_, None) => 0,
        (_, Some(last_review)) => date_diff_in_days(last_review, now).max(0) as u32,
    }
}

impl Fsrs {
    /// Undo the review described by `log`, returning the card as it was
    /// before that review.
    pub fn rollback<C: CardRecord>(&self, card: &C, log: &ReviewLog) -> Result<C> {
        if !log.grade.is_gradable() {
            return Err(FsrsError::ManualGradeNotAllowed);
        }

        let mut restored = card.clone();
        restored.set_state(log.state);
        restored.set_due(log.due);
        restored.set_stability(log.stability);
        restored.set_difficulty(log.difficulty);
        restored.set_last_review(log.last_review);
        restored.set_scheduled_days(log.last_scheduled_days);
        restored.set_learning_steps(log.last_learning_steps);
        restored.set_reps(card.reps().saturating_sub(1));
        if log.lapse {
            restored.set_lapses(card.lapses().saturating_sub(1));
        }
        Ok(restored)
    }

    /// Reset `card` to New, due at `now`.
    ///
    /// Review and lapse counters are kept unless `reset_count` is set.
    pub fn forget<C: CardRecord>(
        &self,
        card: &C,
        now: DateTime<Utc>,
        reset_count: bool,
    ) -> RecordLogItem<C> {
        let mut next = card.clone();
        next.set_state(State::New);
        next.set_due(now);
        next.set_stability(0.0);
        next.set_difficulty(0.0);
        next.set_scheduled_days(0);
        next.set_learning_steps(0);
        if reset_count {
            next.set_reps(0);
            next.set_lapses(0);
        }
        tracing::debug!(reset_count, "card reset to new");

        let log = ReviewLog::build(Grade::Manual, card, &next, elapsed_since(card, now), now);
        RecordLogItem { card: next, log }
    }

    /// Rebuild a card from its review history.
    ///
    /// `template` is reset to a fresh New card due at the first entry, then
    /// every entry is applied in order. Returns one item per entry.
    pub fn reschedule<C: CardRecord>(
        &self,
        template: &C,
        history: &[ReplayEntry],
    ) -> Result<Vec<RecordLogItem<C>>> {
        if history.windows(2).any(|pair| pair[1].review < pair[0].review) {
            return Err(FsrsError::replay("history is not in chronological order"));
        }
        let Some(first) = history.first() else {
            return Ok(Vec::new());
        };

        let mut card = self.forget(template, first.review, true).card;
        card.set_last_review(None);

        let mut items = Vec::with_capacity(history.len());
        for entry in history {
            let item = if entry.grade.is_gradable() {
                self.review(&card, entry.review, entry.grade)?
            } else {
                self.apply_manual(&card, entry)?
            };
            card = item.card.clone();
            items.push(item);
        }
        tracing::debug!(entries = history.len(), "history replayed");
        Ok(items)
    }

    fn apply_manual<C: CardRecord>(&self, card: &C, entry: &ReplayEntry) -> Result<RecordLogItem<C>> {
        let state = entry
            .state
            .ok_or_else(|| FsrsError::replay("manual entry without a target state"))?;
        if state == State::New {
            return Ok(self.forget(card, entry.review, true));
        }

        let mut next = card.clone();
        next.set_state(state);
        next.set_last_review(Some(entry.review));
        if let Some(stability) = entry.stability {
            next.set_stability(Stability::new(stability)?.value());
        }
        if let Some(difficulty) = entry.difficulty {
            next.set_difficulty(Difficulty::new(difficulty)?.value());
        }
        if next.memory_state()?.is_new() {
            return Err(FsrsError::replay(format!(
                "manual entry moves a card to {} without a memory state",
                state.as_str()
            )));
        }
        let due = entry.due.unwrap_or(entry.review);
        next.set_due(due);
        next.set_scheduled_days(date_diff_in_days(entry.review, due).max(0) as u32);
        next.set_learning_steps(0);

        let log = ReviewLog::build(
            Grade::Manual,
            card,
            &next,
            elapsed_since(card, entry.review),
            entry.review,
        );
        Ok(RecordLogItem { card: next, log })
    }
}
