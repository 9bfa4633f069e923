//! Date arithmetic used by the schedulers.

use crate::error::{FsrsError, Result};
use chrono::{DateTime, Duration, Utc};

/// Whole calendar days (UTC) between two timestamps.
///
/// Counts date boundaries crossed rather than 24 hour blocks, so a review at
/// 23:00 followed by one at 01:00 the next day is one day apart.
pub fn date_diff_in_days(last: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - last.date_naive()).num_days()
}

/// Offset `now` by whole days.
pub fn add_days(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or_else(|| FsrsError::DateOutOfRange(format!("{now} + {days} days")))
}

/// Offset `now` by minutes.
pub fn add_minutes(now: DateTime<Utc>, minutes: i64) -> Result<DateTime<Utc>> {
    Duration::try_minutes(minutes)
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or_else(|| FsrsError::DateOutOfRange(format!("{now} + {minutes} minutes")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn calendar_days_not_elapsed_hours() {
        let last = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 1, 0, 0).unwrap();
        assert_eq!(date_diff_in_days(last, now), 1);

        let same_day = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        assert_eq!(date_diff_in_days(last, same_day), 0);
    }

    #[test]
    fn offsets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            add_days(now, 2).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap()
        );
        assert_eq!(
            add_minutes(now, 90).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 13, 30, 0).unwrap()
        );
    }

    #[test]
    fn offsets_past_the_calendar_are_errors() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert!(matches!(
            add_days(now, u32::MAX as i64 * 1000),
            Err(FsrsError::DateOutOfRange(_))
        ));
        assert!(matches!(
            add_minutes(DateTime::<Utc>::MAX_UTC, 1),
            Err(FsrsError::DateOutOfRange(_))
        ));
    }
}
