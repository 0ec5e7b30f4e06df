use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Deserialize;

use super::datetime::deserialize_optional_vips_datetime;
use crate::review::{ProhibitionPolicy, ReviewError, ReviewWindow};

/// Envelope wrapping every VIPS payload: `{"resp": "success", "data": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct VipsResponse<T> {
    pub resp: String,
    pub data: Option<T>,
}

impl<T> VipsResponse<T> {
    pub fn is_success(&self) -> bool {
        self.resp.eq_ignore_ascii_case("success")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusData {
    pub status: ProhibitionStatus,
}

/// Subset of the prohibition status record the review rules depend on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProhibitionStatus {
    #[serde(default)]
    pub notice_type_cd: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_vips_datetime")]
    pub notice_serv_dt: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub surname_nm: Option<String>,
    #[serde(default)]
    pub driver_licence_seized_yn: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_vips_datetime")]
    pub review_start_dtm: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "deserialize_optional_vips_datetime")]
    pub review_end_dtm: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub disclosure: Vec<DisclosureRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureRef {
    pub document_id: String,
    #[serde(default)]
    pub disclosed_dtm: Option<String>,
}

impl ProhibitionStatus {
    pub fn policy(&self) -> Option<ProhibitionPolicy> {
        self.notice_type_cd
            .as_deref()
            .and_then(ProhibitionPolicy::resolve)
    }

    pub fn licence_seized(&self) -> bool {
        self.driver_licence_seized_yn
            .as_deref()
            .is_some_and(|flag| flag.eq_ignore_ascii_case("Y"))
    }

    /// Date the notice was served, as VIPS recorded it.
    pub fn service_date(&self) -> Option<DateTime<FixedOffset>> {
        self.notice_serv_dt
    }

    /// Review window for this prohibition, using its notice type and the
    /// date VIPS says it was served.
    pub fn review_window(&self, today: NaiveDateTime) -> Result<ReviewWindow, ReviewError> {
        let notice_type = self.notice_type_cd.as_deref().unwrap_or_default();
        let policy = ProhibitionPolicy::try_resolve(notice_type)?;
        let served = self.service_date().ok_or_else(|| {
            ReviewError::InvalidInput("VIPS status has no service date".to_string())
        })?;
        policy.review_window(&served, today)
    }
}

/// True when the applicant-supplied surname matches the one VIPS holds.
pub fn is_last_name_match(status: &ProhibitionStatus, last_name: &str) -> bool {
    status
        .surname_nm
        .as_deref()
        .is_some_and(|surname| surname.trim().eq_ignore_ascii_case(last_name.trim()))
}
