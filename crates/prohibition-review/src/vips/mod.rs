//! Integration with the VIPS case-management API: its date format, scheduling
//! data and read-only endpoints.

pub mod calendar;
mod client;
pub mod datetime;
pub mod schedule;
pub mod status;

pub use calendar::{weekdays_between, WeekdayRange};
pub use client::{build_endpoint, VipsClient};
pub use datetime::{format_vips_date, format_vips_datetime, parse_vips_datetime};
pub use schedule::{
    available_review_slots, to_friendly_slots, FriendlyTimeSlot, ScheduleData, ScheduleSlot,
};
pub use status::{
    is_last_name_match, DisclosureRef, ProhibitionStatus, StatusData, VipsResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum VipsError {
    #[error("malformed VIPS date '{0}'")]
    MalformedExternalDate(String),
    #[error("VIPS request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("VIPS responded {status} for {endpoint}")]
    Unsuccessful { endpoint: String, status: u16 },
}
