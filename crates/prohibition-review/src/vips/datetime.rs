use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt::Display;

use super::VipsError;

const ISO_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";
const VIPS_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";
const VIPS_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a VIPS timestamp such as `2019-01-02 17:30:00 -08:00`.
pub fn parse_vips_datetime(value: &str) -> Result<DateTime<FixedOffset>, VipsError> {
    let malformed = || VipsError::MalformedExternalDate(value.to_string());

    let (stamp, offset) = value.rsplit_once(' ').ok_or_else(malformed)?;
    let offset = compact_offset(offset).ok_or_else(malformed)?;

    DateTime::parse_from_str(&format!("{stamp}{offset}"), ISO_FORMAT).map_err(|_| malformed())
}

/// Renders a timestamp the way VIPS expects it, e.g. `2020-11-22 00:00:00 -08:00`.
/// Sub-second precision is dropped.
pub fn format_vips_datetime<T>(value: &DateTime<T>) -> String
where
    T: TimeZone,
    T::Offset: Display,
{
    value.format(VIPS_FORMAT).to_string()
}

/// Date path segment used by VIPS scheduling endpoints.
pub fn format_vips_date(date: NaiveDate) -> String {
    date.format(VIPS_DATE_FORMAT).to_string()
}

// `-08:00` -> `-0800`
fn compact_offset(offset: &str) -> Option<String> {
    let bytes = offset.as_bytes();
    if bytes.len() != 6 || !offset.is_ascii() {
        return None;
    }
    if !matches!(bytes[0], b'+' | b'-') || bytes[3] != b':' {
        return None;
    }

    let (hours, minutes) = (&offset[1..3], &offset[4..6]);
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(format!("{}{hours}{minutes}", &offset[..1]))
}

pub(crate) fn serialize_vips_datetime<S>(
    value: &DateTime<FixedOffset>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_vips_datetime(value))
}

pub(crate) fn deserialize_optional_vips_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_vips_datetime(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_offset_strips_colon() {
        assert_eq!(compact_offset("-08:00").as_deref(), Some("-0800"));
        assert_eq!(compact_offset("+05:30").as_deref(), Some("+0530"));
        assert_eq!(compact_offset("-0800"), None);
        assert_eq!(compact_offset("08:00"), None);
        assert_eq!(compact_offset("-0a:00"), None);
        assert_eq!(compact_offset("-08\u{2236}0"), None);
    }

    #[test]
    fn rejects_values_without_separate_offset() {
        for value in [
            "",
            "2019-01-02",
            "2019-01-02 17:30:00-08:00",
            "2019-01-02T17:30:00 -08:00",
            "2019-02-30 17:30:00 -08:00",
            "2019-01-02 17:30 -08:00",
        ] {
            let error = parse_vips_datetime(value).expect_err(value);
            assert!(matches!(error, VipsError::MalformedExternalDate(ref raw) if raw == value));
        }
    }

    #[test]
    fn formats_with_spaced_colon_offset() {
        let pst = FixedOffset::west_opt(8 * 3600).unwrap();
        let value = pst.with_ymd_and_hms(2020, 11, 22, 0, 0, 0).unwrap();
        assert_eq!(format_vips_datetime(&value), "2020-11-22 00:00:00 -08:00");
        assert_eq!(format_vips_date(value.date_naive()), "2020-11-22");
    }
}
