//! Test data builders.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fsrs_core::{Card, State};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn new_card() -> Card {
    Card::new(now())
}

/// Review card last seen ten days ago with stability 10 and difficulty 5.
pub fn review_card() -> Card {
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

pub fn card_in(state: State, stability: f64, difficulty: f64, elapsed_days: i64) -> Card {
    Card {
        state,
        last_review: Some(now() - Duration::days(elapsed_days)),
        due: now(),
        stability,
        difficulty,
        scheduled_days: elapsed_days.max(0) as u32,
        reps: 3,
        lapses: 1,
        ..Card::new(now())
    }
}
