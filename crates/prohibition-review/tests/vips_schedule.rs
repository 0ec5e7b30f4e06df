use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use prohibition_review::review::{localize_date, PresentationType};
use prohibition_review::vips::{
    format_vips_datetime, parse_vips_datetime, to_friendly_slots, weekdays_between,
    ScheduleData, VipsResponse,
};

fn load_schedule() -> ScheduleData {
    let raw = include_str!("fixtures/vips_schedule_200.json");
    let response: VipsResponse<ScheduleData> =
        serde_json::from_str(raw).expect("fixture parses");
    assert!(response.is_success());
    response.data.expect("schedule data present")
}

#[test]
fn vips_datetime_strings_parse_as_iso_offsets() {
    let cases = [
        ("2019-01-02 17:30:00 -08:00", "2019-01-02T17:30:00-08:00"),
        ("2019-01-02 17:30:00 -07:00", "2019-01-02T17:30:00-07:00"),
    ];

    for (vips, iso) in cases {
        let actual = parse_vips_datetime(vips).expect("vips date parses");
        let expected = DateTime::parse_from_rfc3339(iso).expect("iso date parses");
        assert_eq!(actual, expected);
        assert_eq!(actual.offset(), expected.offset());
    }
}

#[test]
fn localized_date_renders_in_vips_format() {
    let date = NaiveDate::from_ymd_opt(2020, 11, 22).unwrap();
    let localized = localize_date(date).expect("midnight exists");

    let rendered = format_vips_datetime(&localized);

    assert_eq!(rendered.split(':').count(), 4);
    assert_eq!(&rendered[0..22], "2020-11-22 00:00:00 -0");
    assert_eq!(rendered, "2020-11-22 00:00:00 -08:00");
}

#[test]
fn vips_format_round_trips_for_pacific_offsets() {
    for hours_west in [8, 7] {
        let offset = FixedOffset::west_opt(hours_west * 3600).unwrap();
        let original = offset.with_ymd_and_hms(2020, 3, 8, 1, 59, 59).unwrap();

        let parsed = parse_vips_datetime(&format_vips_datetime(&original)).expect("round trip");

        assert_eq!(parsed, original);
        assert_eq!(parsed.offset(), original.offset());
    }

    let vancouver = localize_date(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap()).unwrap();
    let parsed = parse_vips_datetime(&format_vips_datetime(&vancouver)).expect("round trip");
    assert_eq!(parsed, vancouver);
}

#[test]
fn oral_schedule_fixture_produces_friendly_labels() {
    let schedule = load_schedule();

    let friendly = to_friendly_slots(&schedule.time_slots, PresentationType::Oral)
        .expect("fixture times parse");

    let labels: Vec<&str> = friendly.iter().map(|slot| slot.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Fri, Sep 4, 2020 - 9:00AM to 9:30AM",
            "Fri, Sep 4, 2020 - 10:00AM to 10:30AM",
            "Fri, Sep 4, 2020 - 11:00AM to 11:30AM",
            "Fri, Sep 4, 2020 - 12:00PM to 12:30PM",
            "Fri, Sep 4, 2020 - 1:00PM to 1:30PM",
        ]
    );
    assert_eq!(
        friendly[0].start,
        parse_vips_datetime(&schedule.time_slots[0].review_start_dtm).unwrap()
    );
    assert_eq!(
        friendly[4].end,
        parse_vips_datetime(&schedule.time_slots[4].review_end_dtm).unwrap()
    );
}

#[test]
fn weekday_enumeration_skips_labour_day_weekend() {
    let start = NaiveDate::parse_from_str("2020-09-01", "%Y-%m-%d").unwrap();
    let end = NaiveDate::parse_from_str("2020-09-07", "%Y-%m-%d").unwrap();

    let days: Vec<String> = weekdays_between(start, end)
        .map(|day| day.format("%Y-%m-%d").to_string())
        .collect();

    assert_eq!(
        days,
        ["2020-09-01", "2020-09-02", "2020-09-03", "2020-09-04", "2020-09-07"]
    );
}
