use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info, warn};

use super::client::VipsClient;
use super::datetime::{parse_vips_datetime, serialize_vips_datetime};
use super::VipsError;
use crate::review::{PresentationType, ReviewWindow};

/// Review time slot as returned by the VIPS availability endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub review_start_dtm: String,
    pub review_end_dtm: String,
    /// VIPS omits the flag for slots it only lists when bookable.
    #[serde(
        rename = "availableYn",
        default = "available_by_default",
        deserialize_with = "deserialize_yes_no",
        serialize_with = "serialize_yes_no"
    )]
    pub available: bool,
    /// Untagged slots can host either kind of review. Tags other than
    /// `WRIT`/`ORAL` are read as untagged.
    #[serde(
        rename = "presentationTypeCd",
        default,
        deserialize_with = "deserialize_presentation_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub presentation_type: Option<PresentationType>,
}

impl ScheduleSlot {
    pub fn offered_for(&self, presentation: PresentationType) -> bool {
        self.available
            && self
                .presentation_type
                .map_or(true, |tagged| tagged == presentation)
    }
}

/// `data` payload of the VIPS availability response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleData {
    #[serde(rename = "timeSlots", default)]
    pub time_slots: Vec<ScheduleSlot>,
}

/// Display-ready slot carrying the timestamps it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendlyTimeSlot {
    pub label: String,
    #[serde(serialize_with = "serialize_vips_datetime")]
    pub start: DateTime<FixedOffset>,
    #[serde(serialize_with = "serialize_vips_datetime")]
    pub end: DateTime<FixedOffset>,
}

impl FriendlyTimeSlot {
    pub fn from_slot(slot: &ScheduleSlot) -> Result<Self, VipsError> {
        let start = parse_vips_datetime(&slot.review_start_dtm)?;
        let end = parse_vips_datetime(&slot.review_end_dtm)?;
        Ok(Self {
            label: friendly_label(&start, &end),
            start,
            end,
        })
    }
}

/// Turns VIPS slots into labelled options for one presentation type, keeping
/// their order. Unavailable slots and slots reserved for the other
/// presentation type are dropped.
pub fn to_friendly_slots(
    slots: &[ScheduleSlot],
    presentation: PresentationType,
) -> Result<Vec<FriendlyTimeSlot>, VipsError> {
    slots
        .iter()
        .filter(|slot| slot.offered_for(presentation))
        .map(FriendlyTimeSlot::from_slot)
        .collect()
}

/// Queries VIPS for every business day of the review window and collects the
/// bookable slots in day order.
pub async fn available_review_slots(
    client: &VipsClient,
    notice_type: &str,
    presentation: PresentationType,
    window: &ReviewWindow,
    correlation_id: &str,
) -> Result<Vec<FriendlyTimeSlot>, VipsError> {
    let mut friendly = Vec::new();

    for day in window.review_days() {
        let response = client
            .schedule(notice_type, presentation, day, correlation_id)
            .await?;
        if !response.is_success() {
            warn!(%day, resp = %response.resp, correlation_id, "VIPS availability query failed");
        }
        let slots = response.data.unwrap_or_default().time_slots;
        debug!(%day, offered = slots.len(), correlation_id, "VIPS availability received");
        friendly.extend(to_friendly_slots(&slots, presentation)?);
    }

    info!(
        notice_type,
        presentation = presentation.code(),
        slots = friendly.len(),
        correlation_id,
        "review slots assembled"
    );
    Ok(friendly)
}

fn friendly_label(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> String {
    format!(
        "{} - {} to {}",
        start.format("%a, %b %-d, %Y"),
        start.format("%-I:%M%p"),
        end.format("%-I:%M%p")
    )
}

fn deserialize_presentation_tag<'de, D>(deserializer: D) -> Result<Option<PresentationType>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    let Some(tag) = opt.as_deref().map(str::trim).filter(|tag| !tag.is_empty()) else {
        return Ok(None);
    };
    let presentation = PresentationType::from_code(tag);
    if presentation.is_none() {
        warn!(tag, "unrecognised presentation type on VIPS slot, treating it as untagged");
    }
    Ok(presentation)
}

fn available_by_default() -> bool {
    true
}

fn deserialize_yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(true),
        Some(flag) if flag.eq_ignore_ascii_case("Y") => Ok(true),
        Some(flag) if flag.eq_ignore_ascii_case("N") => Ok(false),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected Y or N, found '{other}'"
        ))),
    }
}

fn serialize_yes_no<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *value { "Y" } else { "N" })
}
