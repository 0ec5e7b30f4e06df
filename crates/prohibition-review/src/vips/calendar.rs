use chrono::{Datelike, NaiveDate, Weekday};
use std::iter::FusedIterator;

/// Monday-to-Friday dates between two days, both ends included.
///
/// Cloning the range restarts it from wherever the clone was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayRange {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
}

pub fn weekdays_between(start: NaiveDate, end: NaiveDate) -> WeekdayRange {
    WeekdayRange {
        cursor: (start <= end).then_some(start),
        end,
    }
}

impl Iterator for WeekdayRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while let Some(day) = self.cursor {
            self.cursor = day.succ_opt().filter(|next| *next <= self.end);
            if !is_weekend(day) {
                return Some(day);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            Some(day) => {
                let remaining = (self.end - day).num_days() as usize + 1;
                (0, Some(remaining))
            }
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for WeekdayRange {}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}
