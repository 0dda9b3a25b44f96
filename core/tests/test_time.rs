//! Integration tests for IST time discipline (spec §3, §9)

use chrono::{NaiveDate, TimeZone, Timelike, Utc};
use income_allocator_core::core::time::{has_lapsed, ist_date, ist_midnight_utc, is_strictly_after, to_ist};

#[test]
fn to_ist_is_five_hours_thirty_ahead_of_utc() {
    let utc = Utc.with_ymd_and_hms(2026, 7, 27, 12, 0, 0).unwrap();
    let ist = to_ist(utc);
    assert_eq!(ist.hour(), 17);
    assert_eq!(ist.minute(), 30);
}

#[test]
fn ist_midnight_round_trips_through_ist_date() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let utc = ist_midnight_utc(date);
    assert_eq!(ist_date(utc), date);
}

#[test]
fn strictly_after_excludes_equal_instants() {
    let t = Utc::now();
    assert!(!is_strictly_after(t, t));
    assert!(is_strictly_after(t + chrono::Duration::seconds(1), t));
}

#[test]
fn lapsed_window_is_anything_before_yesterday() {
    let today = NaiveDate::from_ymd_opt(2026, 7, 27).unwrap();
    let three_days_ago = today - chrono::Duration::days(3);
    assert!(has_lapsed(three_days_ago, today));
    assert!(!has_lapsed(today - chrono::Duration::days(1), today));
}
