//! Step-aware scheduling: new and lapsed cards walk through the configured
//! learning or relearning steps before they get whole-day intervals.

use super::steps::step_table;
use super::Context;
use crate::algorithm::{constrain_three, FuzzDraw};
use crate::card::CardRecord;
use crate::date_utils::add_minutes;
use crate::error::{FsrsError, Result};
use crate::memory::MemoryState;
use crate::types::{Grade, State};

const MINUTES_PER_DAY: u32 = 1440;

pub(super) fn new_state<C: CardRecord>(
    ctx: &Context<'_, C>,
    grade: Grade,
    fuzz: &mut FuzzDraw<'_>,
) -> Result<C> {
    let memory = MemoryState {
        stability: ctx.alg.init_stability(grade)?,
        difficulty: ctx.alg.init_difficulty(grade)?,
    };
    let mut next = ctx.next_card(memory);
    apply_learning_steps(ctx, &mut next, grade, State::Learning, fuzz)?;
    Ok(next)
}

pub(super) fn learning_state<C: CardRecord>(
    ctx: &Context<'_, C>,
    grade: Grade,
    fuzz: &mut FuzzDraw<'_>,
) -> Result<C> {
    let memory = ctx.memory()?;
    let next_memory = MemoryState {
        stability: ctx
            .alg
            .next_short_term_stability(memory.stability(), grade)?,
        difficulty: ctx.alg.next_difficulty(memory.difficulty(), grade)?,
    };
    let mut next = ctx.next_card(next_memory);
    apply_learning_steps(ctx, &mut next, grade, ctx.last.state(), fuzz)?;
    Ok(next)
}

pub(super) fn review_state<C: CardRecord>(
    ctx: &Context<'_, C>,
    grade: Grade,
    fuzz: &mut FuzzDraw<'_>,
) -> Result<C> {
    let memory = ctx.memory()?;
    let (s, d) = (memory.stability(), memory.difficulty());
    let r = ctx.retrievability(&memory);

    if grade == Grade::Again {
        let lapse = MemoryState {
            stability: ctx.alg.next_forget_stability(d, s, r)?,
            difficulty: ctx.alg.next_difficulty(d, Grade::Again)?,
        };
        let mut next = ctx.next_card(lapse);
        apply_learning_steps(ctx, &mut next, Grade::Again, State::Relearning, fuzz)?;
        next.set_lapses(ctx.last.lapses().saturating_add(1));
        return Ok(next);
    }

    let mut recalled = Vec::with_capacity(3);
    for g in [Grade::Hard, Grade::Good, Grade::Easy] {
        recalled.push(MemoryState {
            stability: ctx.alg.next_recall_stability(d, s, r, g)?,
            difficulty: ctx.alg.next_difficulty(d, g)?,
        });
    }
    let intervals = constrain_three([
        ctx.alg.next_interval(recalled[0].stability(), ctx.elapsed_days, fuzz),
        ctx.alg.next_interval(recalled[1].stability(), ctx.elapsed_days, fuzz),
        ctx.alg.next_interval(recalled[2].stability(), ctx.elapsed_days, fuzz),
    ]);

    let index = match grade {
        Grade::Hard => 0,
        Grade::Good => 1,
        Grade::Easy => 2,
        other => return Err(FsrsError::grade(other, "review recall")),
    };
    let (memory, days) = (recalled[index], intervals[index]);
    let mut next = ctx.next_card(memory);
    ctx.graduate(&mut next, days)?;
    Ok(next)
}

/// Place `next` on the step table, or graduate it when no step applies.
fn apply_learning_steps<C: CardRecord>(
    ctx: &Context<'_, C>,
    next: &mut C,
    grade: Grade,
    to_state: State,
    fuzz: &mut FuzzDraw<'_>,
) -> Result<()> {
    let table = step_table(
        ctx.alg.parameters(),
        ctx.last.state(),
        ctx.last.learning_steps(),
    );
    match table.get(grade) {
        Some(step) if step.minutes > 0 && step.minutes < MINUTES_PER_DAY => {
            next.set_state(to_state);
            next.set_learning_steps(step.next_step);
            next.set_scheduled_days(0);
            next.set_due(add_minutes(ctx.now, step.minutes as i64)?);
        }
        Some(step) if step.minutes >= MINUTES_PER_DAY => {
            next.set_state(State::Review);
            next.set_learning_steps(step.next_step);
            next.set_scheduled_days(step.minutes / MINUTES_PER_DAY);
            next.set_due(add_minutes(ctx.now, step.minutes as i64)?);
        }
        _ => {
            let days = ctx
                .alg
                .next_interval(next.stability(), ctx.elapsed_days, fuzz);
            ctx.graduate(next, days)?;
        }
    }
    Ok(())
}
