//! Learning-step table.
//!
//! Maps each grade to the next step duration for a card that is still
//! stepping through its learning or relearning sequence. A grade with no
//! entry graduates the card to full-day intervals.

use crate::parameters::Parameters;
use crate::types::{Grade, LearningStep, State};

/// Minutes until the next review and the step index the card moves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub minutes: u32,
    pub next_step: u32,
}

/// Step outcomes per grade. Easy never has a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepTable {
    pub again: Option<StepOutcome>,
    pub hard: Option<StepOutcome>,
    pub good: Option<StepOutcome>,
}

impl StepTable {
    pub fn get(&self, grade: Grade) -> Option<StepOutcome> {
        match grade {
            Grade::Again => self.again,
            Grade::Hard => self.hard,
            Grade::Good => self.good,
            Grade::Easy | Grade::Manual => None,
        }
    }
}

/// Build the table for a card in `state` sitting at step `current_step`.
///
/// Review and Relearning cards use the relearning steps; New and Learning
/// cards use the learning steps. A Review card only gets an Again entry.
pub fn step_table(params: &Parameters, state: State, current_step: u32) -> StepTable {
    let steps: &[LearningStep] = match state {
        State::Review | State::Relearning => &params.relearning_steps,
        State::New | State::Learning => &params.learning_steps,
    };
    let current = current_step as usize;
    if steps.is_empty() || current >= steps.len() {
        return StepTable::default();
    }

    let first = steps[0].in_minutes();
    if state == State::Review {
        return StepTable {
            again: Some(StepOutcome {
                minutes: steps[current].in_minutes(),
                next_step: 0,
            }),
            ..Default::default()
        };
    }

    let hard_minutes = match steps.get(1) {
        Some(second) => ((first + second.in_minutes()) as f64 / 2.0).round() as u32,
        None => (first as f64 * 1.5).round() as u32,
    };
    let good = steps.get(current + 1).map(|next| StepOutcome {
        minutes: next.in_minutes(),
        next_step: current_step + 1,
    });

    StepTable {
        again: Some(StepOutcome {
            minutes: first,
            next_step: 0,
        }),
        hard: Some(StepOutcome {
            minutes: hard_minutes,
            next_step: current_step,
        }),
        good,
    }
}
