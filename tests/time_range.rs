// Tests for the compact `#...` time-range tokens and duration computation.
use chrono::{Duration, NaiveDate, NaiveDateTime};
use examcal::model::timerange::{
    TimeRange, TimeRangeError, duration_minutes, duration_minutes_with_today,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
}

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn parse(token: &str) -> TimeRange {
    TimeRange::parse_with_today(token, today())
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", token, e))
}

// ============================================================================
// Fully specified ranges
// ============================================================================

#[test]
fn test_full_start_and_end() {
    let r = parse("#20250601T093015-20250603T170545");
    assert_eq!(r.start, dt(2025, 6, 1, 9, 30, 15));
    assert_eq!(r.end, dt(2025, 6, 3, 17, 5, 45));
}

#[test]
fn test_full_start_and_end_without_marker() {
    let r = parse("#20251231235959-20260101000001");
    assert_eq!(r.start, dt(2025, 12, 31, 23, 59, 59));
    assert_eq!(r.end, dt(2026, 1, 1, 0, 0, 1));
}

#[test]
fn test_date_to_date() {
    let r = parse("#20250601-20250603");
    assert_eq!(r.start, dt(2025, 6, 1, 0, 0, 0));
    assert_eq!(r.end, dt(2025, 6, 3, 0, 0, 0));
}

// ============================================================================
// Defaulting rules
// ============================================================================

#[test]
fn test_date_only_lasts_one_day() {
    let r = parse("#20250615");
    assert_eq!(r.start, dt(2025, 6, 15, 0, 0, 0));
    assert_eq!(r.end, r.start + Duration::days(1));
}

#[test]
fn test_month_day_only_uses_reference_year() {
    let r = parse("#0615");
    assert_eq!(r.start, dt(2025, 6, 15, 0, 0, 0));
    assert_eq!(r.end, dt(2025, 6, 16, 0, 0, 0));
}

#[test]
fn test_hour_only_end_stays_on_start_day() {
    let r = parse("#0900-1030");
    assert_eq!(r.start, dt(2025, 4, 1, 9, 0, 0));
    assert_eq!(r.end, dt(2025, 4, 1, 10, 30, 0));
}

#[test]
fn test_start_with_time_lasts_one_hour() {
    let r = parse("#20260125T0900");
    assert_eq!(r.start, dt(2026, 1, 25, 9, 0, 0));
    assert_eq!(r.end, dt(2026, 1, 25, 10, 0, 0));

    let r = parse("#T13");
    assert_eq!(r.start, dt(2025, 4, 1, 13, 0, 0));
    assert_eq!(r.end, dt(2025, 4, 1, 14, 0, 0));
}

#[test]
fn test_date_with_time_range_same_day() {
    let r = parse("#20260125T0900-T1200");
    assert_eq!(r.start, dt(2026, 1, 25, 9, 0, 0));
    assert_eq!(r.end, dt(2026, 1, 25, 12, 0, 0));

    let r = parse("#20260125T0900-1200");
    assert_eq!(r.end, dt(2026, 1, 25, 12, 0, 0));
}

#[test]
fn test_end_month_day_uses_reference_year() {
    // The end takes the reference year even when the start names another.
    let r = parse("#20260110-0120");
    assert_eq!(r.start, dt(2026, 1, 10, 0, 0, 0));
    assert_eq!(r.end, dt(2025, 1, 20, 0, 0, 0));
}

#[test]
fn test_end_month_day_with_time() {
    let r = parse("#0110T0900-0112T1700");
    assert_eq!(r.start, dt(2025, 1, 10, 9, 0, 0));
    assert_eq!(r.end, dt(2025, 1, 12, 17, 0, 0));
}

#[test]
fn test_bare_end_after_dated_start_is_month_day() {
    let r = parse("#0110T0900-0112");
    assert_eq!(r.start, dt(2025, 1, 10, 9, 0, 0));
    assert_eq!(r.end, dt(2025, 1, 12, 0, 0, 0));

    let r = parse("#20260125T0900-1130");
    assert_eq!(r.end, dt(2025, 11, 30, 0, 0, 0));

    let r = parse("#0615-0620");
    assert_eq!(r.start, dt(2025, 6, 15, 0, 0, 0));
    assert_eq!(r.end, dt(2025, 6, 20, 0, 0, 0));
}

#[test]
fn test_bare_end_after_undated_start_is_time() {
    let r = parse("#T09-1030");
    assert_eq!(r.start, dt(2025, 4, 1, 9, 0, 0));
    assert_eq!(r.end, dt(2025, 4, 1, 10, 30, 0));

    let r = parse("#T0900-1130");
    assert_eq!(r.end, dt(2025, 4, 1, 11, 30, 0));
}

#[test]
fn test_bare_end_that_cannot_be_a_date_is_time() {
    let r = parse("#20260125T0900-1530");
    assert_eq!(r.start, dt(2026, 1, 25, 9, 0, 0));
    assert_eq!(r.end, dt(2026, 1, 25, 15, 30, 0));

    // Without a start hour there is nothing to pair a clock time with.
    assert!(matches!(
        TimeRange::parse_with_today("#20260125-1530", today()),
        Err(TimeRangeError::InvalidDate { .. })
    ));
}

#[test]
fn test_month_day_and_hour_without_marker() {
    let r = parse("#061509");
    assert_eq!(r.start, dt(2025, 6, 15, 9, 0, 0));
    assert_eq!(r.end, dt(2025, 6, 15, 10, 0, 0));
}

#[test]
fn test_empty_token_is_zero_length_today() {
    let r = parse("#");
    assert_eq!(r.start, dt(2025, 4, 1, 0, 0, 0));
    assert_eq!(r.end, r.start);

    let r = parse("#-");
    assert_eq!(r.end, r.start);
}

#[test]
fn test_trailing_separator_behaves_like_no_end() {
    let r = parse("#20250601-");
    assert_eq!(r.end, dt(2025, 6, 2, 0, 0, 0));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_malformed_tokens() {
    for token in ["#abc", "#2025061", "#20250601T093", "#20250601-20250602-20250603", "#0900x"] {
        assert!(
            TimeRange::parse_with_today(token, today()).is_err(),
            "expected {} to fail",
            token
        );
    }
}

#[test]
fn test_missing_sentinel() {
    assert!(matches!(
        TimeRange::parse_with_today("20250601", today()),
        Err(TimeRangeError::MissingSentinel(_))
    ));
}

#[test]
fn test_invalid_calendar_values() {
    assert!(matches!(
        TimeRange::parse_with_today("#20250230", today()),
        Err(TimeRangeError::InvalidDate { .. })
    ));
    assert!(matches!(
        TimeRange::parse_with_today("#20250601T2500", today()),
        Err(TimeRangeError::InvalidTime { .. })
    ));
    assert!(matches!(
        TimeRange::parse_with_today("#20251301", today()),
        Err(TimeRangeError::InvalidDate { .. })
    ));
}

// ============================================================================
// Durations
// ============================================================================

#[test]
fn test_duration_minutes() {
    assert_eq!(duration_minutes("0900-1030").unwrap(), "90");
    assert_eq!(duration_minutes("1300-1400").unwrap(), "60");
    assert_eq!(duration_minutes("093000-093045").unwrap(), "0");
}

#[test]
fn test_duration_minutes_on_reference_date() {
    assert_eq!(duration_minutes_with_today("0900-1030", today()).unwrap(), "90");
    assert_eq!(duration_minutes_with_today("2300-0100", today()).unwrap(), "-1320");
}

#[test]
fn test_duration_minutes_negative_and_single_side() {
    assert_eq!(duration_minutes("1030-0900").unwrap(), "-90");
    // A lone start time lasts one hour.
    assert_eq!(duration_minutes("0900").unwrap(), "60");
}

#[test]
fn test_duration_minutes_rejects_garbage() {
    assert!(duration_minutes("abc-def").is_err());
    assert!(duration_minutes("20250601-20250603").is_err());
}
