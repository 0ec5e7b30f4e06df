use serde::Serialize;
use tracing::error;

use super::domain::{PresentationType, ProhibitionKind, ReviewError};

const WRITTEN_REVIEW_PRICE: u32 = 100;
const ORAL_REVIEW_PRICE: u32 = 200;
const UNLICENCED_WRITTEN_REVIEW_PRICE: u32 = 50;

// Calendar days in the review timezone.
const MIN_DAYS_FROM_SCHEDULING_TO_REVIEW: i64 = 4;
const MIN_DAYS_FROM_SERVED_TO_REVIEW: i64 = 6;
const MAX_DAYS_FROM_SERVED_TO_REVIEW: i64 = 16;

/// Where the legislated review bounds are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "measured_from", rename_all = "snake_case")]
pub enum ReviewWindowRule {
    /// Bounds count from the date the notice was served.
    ServiceDate {
        min_days_served_to_review: i64,
        max_days_served_to_review: i64,
    },
    /// Only an upper bound applies, counted from the day the review is scheduled.
    Today { max_days_from_today_to_review: i64 },
}

/// Fee schedule and review-window rules for one prohibition type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProhibitionPolicy {
    pub kind: ProhibitionKind,
    /// Whole dollars.
    pub written_review_price: u32,
    /// Whole dollars. Never charged for unlicenced driver prohibitions.
    pub oral_review_price: u32,
    pub must_apply_within_7_days: bool,
    pub licence_must_be_seized_before_acceptance: bool,
    pub min_days_scheduling_to_review: i64,
    pub window_rule: ReviewWindowRule,
}

impl Default for ProhibitionPolicy {
    fn default() -> Self {
        Self::for_kind(ProhibitionKind::Base)
    }
}

impl ProhibitionPolicy {
    pub const fn for_kind(kind: ProhibitionKind) -> Self {
        let base = Self {
            kind,
            written_review_price: WRITTEN_REVIEW_PRICE,
            oral_review_price: ORAL_REVIEW_PRICE,
            must_apply_within_7_days: true,
            licence_must_be_seized_before_acceptance: true,
            min_days_scheduling_to_review: MIN_DAYS_FROM_SCHEDULING_TO_REVIEW,
            window_rule: ReviewWindowRule::ServiceDate {
                min_days_served_to_review: MIN_DAYS_FROM_SERVED_TO_REVIEW,
                max_days_served_to_review: MAX_DAYS_FROM_SERVED_TO_REVIEW,
            },
        };

        match kind {
            ProhibitionKind::UnlicencedDriver => Self {
                written_review_price: UNLICENCED_WRITTEN_REVIEW_PRICE,
                must_apply_within_7_days: false,
                licence_must_be_seized_before_acceptance: false,
                window_rule: ReviewWindowRule::Today {
                    max_days_from_today_to_review: MAX_DAYS_FROM_SERVED_TO_REVIEW,
                },
                ..base
            },
            ProhibitionKind::Base
            | ProhibitionKind::ImmediateRoadside
            | ProhibitionKind::AdministrativeDriving => base,
        }
    }

    /// Looks up the policy for a VIPS notice type code.
    ///
    /// Unknown codes are logged and yield `None`; use [`Self::try_resolve`]
    /// where the caller wants an error instead.
    pub fn resolve(code: &str) -> Option<Self> {
        match ProhibitionKind::from_code(code) {
            Some(kind) => Some(Self::for_kind(kind)),
            None => {
                error!(prohibition_type = code, "prohibition type not known");
                None
            }
        }
    }

    pub fn try_resolve(code: &str) -> Result<Self, ReviewError> {
        Self::resolve(code).ok_or_else(|| ReviewError::UnknownPolicyType(code.to_string()))
    }

    /// Fee owed for a review requested with the given presentation code.
    ///
    /// `None` means no fee applies, which happens for codes other than
    /// `WRIT` and `ORAL`. Unlicenced driver reviews are always written and
    /// always cost the written price.
    pub fn amount_due(&self, presentation_type: &str) -> Option<u32> {
        match self.kind {
            ProhibitionKind::UnlicencedDriver => Some(self.written_review_price),
            _ => PresentationType::from_code(presentation_type)
                .map(|presentation| self.amount_due_for(presentation)),
        }
    }

    pub fn amount_due_for(&self, presentation: PresentationType) -> u32 {
        match (self.kind, presentation) {
            (ProhibitionKind::UnlicencedDriver, _) | (_, PresentationType::Written) => {
                self.written_review_price
            }
            (_, PresentationType::Oral) => self.oral_review_price,
        }
    }

    /// Presentation types an applicant may choose for this prohibition.
    pub fn offered_presentations(&self) -> &'static [PresentationType] {
        match self.kind {
            ProhibitionKind::UnlicencedDriver => &[PresentationType::Written],
            _ => &[PresentationType::Written, PresentationType::Oral],
        }
    }
}
