use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::vips::calendar::{weekdays_between, WeekdayRange};

/// Prohibition categories a driver may apply to have reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProhibitionKind {
    #[default]
    Base,
    UnlicencedDriver,
    ImmediateRoadside,
    AdministrativeDriving,
}

impl ProhibitionKind {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Base,
            Self::UnlicencedDriver,
            Self::ImmediateRoadside,
            Self::AdministrativeDriving,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "UL" => Some(Self::UnlicencedDriver),
            "IRP" => Some(Self::ImmediateRoadside),
            "ADP" => Some(Self::AdministrativeDriving),
            _ => None,
        }
    }

    /// Notice type code used by VIPS. `Base` has no notice of its own.
    pub const fn code(self) -> Option<&'static str> {
        match self {
            Self::Base => None,
            Self::UnlicencedDriver => Some("UL"),
            Self::ImmediateRoadside => Some("IRP"),
            Self::AdministrativeDriving => Some("ADP"),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Base => "Prohibition",
            Self::UnlicencedDriver => "Unlicenced Driver Prohibition",
            Self::ImmediateRoadside => "Immediate Roadside Prohibition",
            Self::AdministrativeDriving => "Administrative Driving Prohibition",
        }
    }
}

/// How the applicant presents their case at the review hearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresentationType {
    #[serde(rename = "WRIT")]
    Written,
    #[serde(rename = "ORAL")]
    Oral,
}

impl PresentationType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "WRIT" => Some(Self::Written),
            "ORAL" => Some(Self::Oral),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Written => "WRIT",
            Self::Oral => "ORAL",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Written => "Written review",
            Self::Oral => "Oral review",
        }
    }
}

/// Inclusive range of moments a review hearing may be booked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewWindow {
    pub minimum_date: DateTime<Tz>,
    pub maximum_date: DateTime<Tz>,
}

impl ReviewWindow {
    /// A window where both bounds coincide is still bookable on that day.
    pub fn is_degenerate(&self) -> bool {
        self.minimum_date == self.maximum_date
    }

    pub fn contains(&self, moment: &DateTime<Tz>) -> bool {
        self.minimum_date <= *moment && *moment <= self.maximum_date
    }

    pub fn first_day(&self) -> NaiveDate {
        self.minimum_date.date_naive()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.maximum_date.date_naive()
    }

    /// Business days a hearing could fall on.
    pub fn review_days(&self) -> WeekdayRange {
        weekdays_between(self.first_day(), self.last_day())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("invalid calendar value: {0}")]
    InvalidInput(String),
    #[error("prohibition type '{0}' is not known")]
    UnknownPolicyType(String),
}
