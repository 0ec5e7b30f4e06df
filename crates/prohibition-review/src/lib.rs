//! Review-window rules, fee schedules and VIPS scheduling support for
//! administrative driving prohibition reviews.

pub mod config;
pub mod error;
pub mod review;
pub mod telemetry;
pub mod vips;
