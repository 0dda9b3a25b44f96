//! IST time discipline
//!
//! All timestamps are stored UTC but every user-visible comparison — sync
//! eligibility, goal urgency, streak "today" — happens in a fixed IST offset
//! (UTC+05:30). This module is the only place that offset is named.
//!
//! # Example
//! ```
//! use income_allocator_core::core::time::{to_ist, ist_today};
//! use chrono::{TimeZone, Utc};
//!
//! let utc = Utc.with_ymd_and_hms(2026, 1, 1, 20, 0, 0).unwrap();
//! let ist = to_ist(utc);
//! assert_eq!(ist.format("%H:%M").to_string(), "01:30"); // next day, 1:30am IST
//! ```

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Asia::Kolkata;
use chrono_tz::Tz;

/// India Standard Time, UTC+05:30. Fixed; not configurable (spec §1 Non-goals).
pub const IST: Tz = Kolkata;

/// Convert a UTC timestamp to its IST representation.
pub fn to_ist(utc: DateTime<Utc>) -> DateTime<Tz> {
    utc.with_timezone(&IST)
}

/// The current wall-clock instant, for call sites that would otherwise reach
/// for `Utc::now()` directly (kept in one place so tests can substitute it).
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's calendar date in IST. Used by streak logic (spec §3, §5).
pub fn ist_today() -> NaiveDate {
    to_ist(now()).date_naive()
}

/// IST calendar date of an arbitrary UTC timestamp.
pub fn ist_date(utc: DateTime<Utc>) -> NaiveDate {
    to_ist(utc).date_naive()
}

/// Start-of-day (00:00:00 IST) for a given IST calendar date, expressed back
/// in UTC. Used to lift `entries` (date-only records) into full timestamps
/// per spec §6 ("entries items are lifted into credit-type transactions with
/// timestamp = start-of-day in IST").
pub fn ist_midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    IST.from_local_datetime(&date.and_hms_opt(0, 0, 0).expect("valid midnight"))
        .single()
        .expect("IST has no DST transitions")
        .with_timezone(&Utc)
}

/// `a` is strictly after `b` when compared as instants (timezone-agnostic —
/// `DateTime<Utc>` ordering already accounts for offset, this helper exists
/// so call sites read as IST-aware rather than reaching for raw `>`).
pub fn is_strictly_after(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a > b
}

/// Whether `date` is more than one IST calendar day before `today` — i.e. a
/// streak anchored on `date` has lapsed as of `today`.
pub fn has_lapsed(last: NaiveDate, today: NaiveDate) -> bool {
    last < today - Duration::days(1)
}

/// Whether `date` is exactly the IST calendar day before `today` — a streak
/// anchored on `date` continues if activity happens on `today`.
pub fn is_yesterday(last: NaiveDate, today: NaiveDate) -> bool {
    last == today - Duration::days(1)
}
