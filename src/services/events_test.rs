use super::*;
use time::macros::datetime;

// =============================================================================
// parse_event_time
// =============================================================================

#[test]
fn parses_rfc3339_with_offset() {
    let parsed = parse_event_time("2025-10-01T18:00:00+02:00").unwrap();
    assert_eq!(parsed, datetime!(2025-10-01 16:00 UTC));
}

#[test]
fn parses_naive_with_seconds_as_utc() {
    assert_eq!(parse_event_time("2025-10-01T18:30:15").unwrap(), datetime!(2025-10-01 18:30:15 UTC));
}

#[test]
fn parses_naive_without_seconds_as_utc() {
    assert_eq!(parse_event_time(" 2025-10-01T18:30 ").unwrap(), datetime!(2025-10-01 18:30 UTC));
}

#[test]
fn parses_date_only_as_midnight() {
    assert_eq!(parse_event_time("2025-12-24").unwrap(), datetime!(2025-12-24 0:00 UTC));
}

#[test]
fn rejects_garbage_dates() {
    assert!(matches!(parse_event_time("next tuesday"), Err(ContentError::Invalid(_))));
    assert!(matches!(parse_event_time("2025-13-01T10:00"), Err(ContentError::Invalid(_))));
}

// =============================================================================
// date_window
// =============================================================================

#[test]
fn month_and_year_window() {
    let (start, end) = date_window(Some(3), Some(2026)).unwrap().unwrap();
    assert_eq!(start, datetime!(2026-03-01 0:00 UTC));
    assert_eq!(end, datetime!(2026-04-01 0:00 UTC));
}

#[test]
fn december_rolls_into_next_year() {
    let (start, end) = date_window(Some(12), Some(2025)).unwrap().unwrap();
    assert_eq!(start, datetime!(2025-12-01 0:00 UTC));
    assert_eq!(end, datetime!(2026-01-01 0:00 UTC));
}

#[test]
fn year_only_window() {
    let (start, end) = date_window(None, Some(2025)).unwrap().unwrap();
    assert_eq!(start, datetime!(2025-01-01 0:00 UTC));
    assert_eq!(end, datetime!(2026-01-01 0:00 UTC));
}

#[test]
fn month_without_year_has_no_window() {
    assert!(date_window(Some(5), None).unwrap().is_none());
    assert!(date_window(None, None).unwrap().is_none());
}

#[test]
fn invalid_month_is_rejected() {
    assert!(matches!(date_window(Some(13), Some(2025)), Err(ContentError::Invalid(_))));
    assert!(matches!(date_window(Some(0), Some(2025)), Err(ContentError::Invalid(_))));
}

// =============================================================================
// collect_tags / validate_range
// =============================================================================

#[test]
fn tags_are_trimmed_unique_and_sorted() {
    let tags = collect_tags(["party, Workshop ,", "Info,party", "  "]);
    assert_eq!(tags, vec!["Info".to_owned(), "Workshop".to_owned(), "party".to_owned()]);
}

#[test]
fn end_before_start_is_rejected() {
    let start = datetime!(2025-10-01 18:00 UTC);
    assert!(validate_range(start, Some(datetime!(2025-10-01 17:59 UTC))).is_err());
    assert!(validate_range(start, Some(start)).is_ok());
    assert!(validate_range(start, None).is_ok());
}

// =============================================================================
// Input parsing
// =============================================================================

#[test]
fn input_defaults() {
    let input: EventInput = serde_json::from_value(serde_json::json!({
        "title": "Erstsemestrigen-Tutorium",
        "start_date": "2025-10-01T10:00"
    }))
    .unwrap();
    assert!(input.is_public);
    assert!(!input.all_day);
    assert_eq!(input.color, EventColor::Blue);
}

#[test]
fn patch_distinguishes_null_end_date() {
    let patch: EventPatch = serde_json::from_value(serde_json::json!({ "end_date": null })).unwrap();
    assert_eq!(patch.end_date, Some(None));
    let untouched: EventPatch = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(untouched.end_date, None);
}

#[test]
fn event_json_uses_rfc3339() {
    let event = CalendarEvent {
        id: 1,
        title: "Punschstand".into(),
        description: None,
        start_date: datetime!(2025-12-10 16:00 UTC),
        end_date: None,
        all_day: false,
        location: Some("Uni-Teich".into()),
        color: "red".into(),
        tags: Some("party".into()),
        is_public: true,
        created_by: None,
        creator_name: "Unbekannt".into(),
        created_at: datetime!(2025-11-01 9:00 UTC),
        updated_at: datetime!(2025-11-01 9:00 UTC),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["start_date"], "2025-12-10T16:00:00Z");
    assert!(json["end_date"].is_null());
    assert_eq!(json["creator_name"], "Unbekannt");
}
