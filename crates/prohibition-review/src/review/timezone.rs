use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::America::Vancouver;
use chrono_tz::Tz;

use super::domain::ReviewError;

/// Civil timezone every review date is expressed in.
pub const REVIEW_TIMEZONE: Tz = Vancouver;

/// Attaches the review timezone to a wall-clock value without shifting it.
///
/// Ambiguous fall-back times resolve to the earlier instant; times skipped by
/// the spring-forward gap do not exist and are rejected.
pub fn localize(naive: NaiveDateTime) -> Result<DateTime<Tz>, ReviewError> {
    match REVIEW_TIMEZONE.from_local_datetime(&naive) {
        LocalResult::Single(local) => Ok(local),
        LocalResult::Ambiguous(earlier, _later) => Ok(earlier),
        LocalResult::None => Err(ReviewError::InvalidInput(format!(
            "{naive} does not exist in {}",
            REVIEW_TIMEZONE.name()
        ))),
    }
}

/// Midnight at the start of `date` in the review timezone.
pub fn localize_date(date: NaiveDate) -> Result<DateTime<Tz>, ReviewError> {
    localize(date.and_time(NaiveTime::MIN))
}

/// Re-expresses an aware timestamp in the review timezone. Same instant, so
/// values already in the zone come back unchanged.
pub fn to_review_timezone<T: TimeZone>(value: &DateTime<T>) -> DateTime<Tz> {
    value.with_timezone(&REVIEW_TIMEZONE)
}

/// Current wall-clock time in the review timezone. Capture once per operation.
pub fn review_now() -> NaiveDateTime {
    Utc::now().with_timezone(&REVIEW_TIMEZONE).naive_local()
}

/// Calendar-day arithmetic: the wall-clock time is kept across DST changes.
///
/// A shifted time that lands in the spring-forward gap moves past it by the
/// gap's length, so the result is the instant the old offset would name.
pub(crate) fn add_days(value: &DateTime<Tz>, days: i64) -> Result<DateTime<Tz>, ReviewError> {
    let out_of_range =
        || ReviewError::InvalidInput(format!("{value} + {days} days is out of range"));
    let shifted = Duration::try_days(days)
        .and_then(|delta| value.naive_local().checked_add_signed(delta))
        .ok_or_else(out_of_range)?;

    match REVIEW_TIMEZONE.from_local_datetime(&shifted) {
        LocalResult::Single(local) => Ok(local),
        LocalResult::Ambiguous(earlier, _later) => Ok(earlier),
        LocalResult::None => {
            let past_gap = shifted
                .checked_add_signed(Duration::hours(1))
                .ok_or_else(out_of_range)?;
            localize(past_gap)
        }
    }
}
