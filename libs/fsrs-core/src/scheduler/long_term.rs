//! Interval-only scheduling: no sub-day steps, every outcome is a whole
//! number of days. Learning and Relearning cards are treated as Review.

use super::{select, Context};
use crate::algorithm::{constrain_four, constrain_three, FuzzDraw};
use crate::card::CardRecord;
use crate::error::Result;
use crate::memory::MemoryState;
use crate::types::Grade;

pub(super) fn new_state<C: CardRecord>(
    ctx: &Context<'_, C>,
    grade: Grade,
    fuzz: &mut FuzzDraw<'_>,
) -> Result<C> {
    let mut memories = [MemoryState::new_card(); 4];
    for (slot, g) in memories.iter_mut().zip(Grade::GRADABLE) {
        *slot = MemoryState {
            stability: ctx.alg.init_stability(g)?,
            difficulty: ctx.alg.init_difficulty(g)?,
        };
    }
    let intervals = constrain_four(memories.map(|m| ctx.alg.next_interval(m.stability(), 0, fuzz)));

    let (memory, days) = select(grade, pair(memories, intervals))?;
    let mut next = ctx.next_card(memory);
    ctx.graduate(&mut next, days)?;
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

    let again = MemoryState {
        stability: ctx.alg.next_forget_stability(d, s, r)?,
        difficulty: ctx.alg.next_difficulty(d, Grade::Again)?,
    };
    let mut memories = [again; 4];
    for (slot, g) in memories
        .iter_mut()
        .zip(Grade::GRADABLE)
        .skip(1)
    {
        *slot = MemoryState {
            stability: ctx.alg.next_recall_stability(d, s, r, g)?,
            difficulty: ctx.alg.next_difficulty(d, g)?,
        };
    }

    let raw = memories.map(|m| ctx.alg.next_interval(m.stability(), ctx.elapsed_days, fuzz));
    let [hard, good, easy] = constrain_three([raw[1], raw[2], raw[3]]);
    let intervals = [raw[0], hard, good, easy];

    let (memory, days) = select(grade, pair(memories, intervals))?;
    let mut next = ctx.next_card(memory);
    ctx.graduate(&mut next, days)?;
    if grade == Grade::Again {
        next.set_lapses(ctx.last.lapses().saturating_add(1));
    }
    Ok(next)
}

fn pair(memories: [MemoryState; 4], intervals: [u32; 4]) -> [(MemoryState, u32); 4] {
    [
        (memories[0], intervals[0]),
        (memories[1], intervals[1]),
        (memories[2], intervals[2]),
        (memories[3], intervals[3]),
    ]
}

#[cfg(test)]
mod tests {
    use super::super::{schedule, Strategy};
    use crate::algorithm::{FsrsAlgorithm, FuzzDraw};
    use crate::card::Card;
    use crate::parameters::Parameters;
    use crate::types::{Grade, State};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn algorithm() -> FsrsAlgorithm {
        FsrsAlgorithm::new(Parameters {
            enable_short_term: false,
            ..Default::default()
        })
        .unwrap()
    }

    fn run(alg: &FsrsAlgorithm, card: &Card, grade: Grade) -> Card {
        schedule(alg, Strategy::LongTerm, card, now(), grade, &mut FuzzDraw::disabled())
            .unwrap()
            .card
    }

    fn review_card() -> Card {
        Card {
            state: State::Review,
            last_review: Some(now() - Duration::days(10)),
            due: now(),
            stability: 10.0,
            difficulty: 5.0,
            scheduled_days: 10,
            reps: 5,
            lapses: 5,
            ..Card::new(now())
        }
    }

    #[test]
    fn new_card_intervals_strictly_increase() {
        let alg = algorithm();
        let card = Card::new(now());
        let days: Vec<u32> = Grade::GRADABLE
            .iter()
            .map(|&g| run(&alg, &card, g).scheduled_days)
            .collect();
        assert!(days[0] >= 1);
        assert!(days.windows(2).all(|w| w[0] < w[1]), "{days:?}");
    }

    #[test]
    fn new_card_always_enters_review() {
        let alg = algorithm();
        for g in Grade::GRADABLE {
            let next = run(&alg, &Card::new(now()), g);
            assert_eq!(next.state, State::Review);
            assert_eq!(next.learning_steps, 0);
            assert_eq!(next.due, now() + Duration::days(next.scheduled_days as i64));
        }
    }

    #[test]
    fn review_again_stays_in_review_with_lapse() {
        let alg = algorithm();
        let next = run(&alg, &review_card(), Grade::Again);
        assert_eq!(next.state, State::Review);
        assert_eq!(next.lapses, 6);
        assert_eq!(next.reps, 6);
        assert!(next.scheduled_days >= 1);
    }

    #[test]
    fn review_recall_intervals_ordered() {
        let alg = algorithm();
        let card = review_card();
        let hard = run(&alg, &card, Grade::Hard).scheduled_days;
        let good = run(&alg, &card, Grade::Good).scheduled_days;
        let easy = run(&alg, &card, Grade::Easy).scheduled_days;
        assert!(hard < good && good < easy);
        assert_eq!(run(&alg, &card, Grade::Good).lapses, 5);
    }

    #[test]
    fn learning_cards_use_review_rules() {
        let alg = algorithm();
        let learning = Card {
            state: State::Learning,
            ..review_card()
        };
        let as_learning = run(&alg, &learning, Grade::Good);
        let as_review = run(&alg, &review_card(), Grade::Good);
        assert_eq!(as_learning.scheduled_days, as_review.scheduled_days);
        assert_eq!(as_learning.stability, as_review.stability);
        assert_eq!(as_learning.state, State::Review);
    }
}
