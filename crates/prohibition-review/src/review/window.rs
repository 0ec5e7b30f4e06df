use chrono::{DateTime, NaiveDateTime, TimeZone};
use std::cmp::max;
use tracing::debug;

use super::domain::{ReviewError, ReviewWindow};
use super::policy::{ProhibitionPolicy, ReviewWindowRule};
use super::timezone::{add_days, localize, to_review_timezone};

impl ProhibitionPolicy {
    /// Computes the dates a review may be scheduled between.
    ///
    /// `today` is the caller's wall-clock "now" in the review timezone. It is
    /// never read implicitly so the same inputs always give the same window.
    pub fn review_window<T: TimeZone>(
        &self,
        service_date: &DateTime<T>,
        today: NaiveDateTime,
    ) -> Result<ReviewWindow, ReviewError> {
        let today = localize(today)?;
        let earliest_possible = add_days(&today, self.min_days_scheduling_to_review)?;

        let window = match self.window_rule {
            ReviewWindowRule::ServiceDate {
                min_days_served_to_review,
                max_days_served_to_review,
            } => {
                let served = to_review_timezone(service_date);
                let legislated_minimum = add_days(&served, min_days_served_to_review)?;
                let legislated_maximum = add_days(&served, max_days_served_to_review)?;
                ReviewWindow {
                    minimum_date: max(earliest_possible, legislated_minimum),
                    maximum_date: max(earliest_possible, legislated_maximum),
                }
            }
            ReviewWindowRule::Today {
                max_days_from_today_to_review,
            } => ReviewWindow {
                minimum_date: earliest_possible,
                maximum_date: add_days(&today, max_days_from_today_to_review)?,
            },
        };

        debug!(
            prohibition = self.kind.label(),
            minimum = %window.minimum_date,
            maximum = %window.maximum_date,
            collapsed = window.is_degenerate(),
            "review window computed"
        );

        Ok(window)
    }
}
