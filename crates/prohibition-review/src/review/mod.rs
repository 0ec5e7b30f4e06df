//! Prohibition review rules: type registry, fee schedules and review windows.

pub mod domain;
mod policy;
pub mod timezone;
mod window;

pub use domain::{PresentationType, ProhibitionKind, ReviewError, ReviewWindow};
pub use policy::{ProhibitionPolicy, ReviewWindowRule};
pub use timezone::{localize, localize_date, review_now, to_review_timezone, REVIEW_TIMEZONE};
