//! # Deadline Parsing
//!
//! Decides whether a free-text promotion deadline is still in the future.
//!
//! ## Accepted Formats (first match wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input                        Meaning                                   │
//! │  ───────────────────────────  ─────────────────────────────────────────│
//! │  2025.3.31  / 2025. 03. 31.   local end of day (23:59:59.999)           │
//! │  2025.3.31 8:00[:00]          local date-time, exact                    │
//! │  2025-03-31                   local end of day                          │
//! │  anything else                generic parse; "2025-03-31 08:00" is      │
//! │                               first rewritten to "2025-03-31T08:00"     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Local" is the time zone of the `now` the caller passes in. Anything that
//! cannot be parsed is treated as expired: a broken deadline never grants a
//! discount.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// `YYYY.M.D` with optional spaces after the dots and an optional trailing dot.
static DOTTED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})\.\s*(\d{1,2})\.\s*(\d{1,2})\.?$").expect("valid regex"));

/// `YYYY.M.D H:MM[:SS]`.
static DOTTED_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\.\s*(\d{1,2})\.\s*(\d{1,2})\s+(\d{1,2}):(\d{2})(?::(\d{2}))?$")
        .expect("valid regex")
});

/// `YYYY-MM-DD`.
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex"));

/// Local date-time layouts tried by the generic fallback, after the
/// space-to-`T` rewrite.
const LOCAL_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Date-only layouts tried by the generic fallback (local midnight).
/// `%Y-%m-%d` here catches unpadded dashes (`2025-3-31`) that [`ISO_DATE`]
/// leaves alone.
const LOCAL_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Offset-carrying layouts tried by the generic fallback.
const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Parses a deadline into an instant in `tz`.
///
/// Returns `None` for empty text and for anything that does not describe a
/// real calendar instant (`2025.2.30` is rejected, not rolled over).
///
/// ## Example
/// ```rust
/// use arlap_core::deadline::parse_deadline;
/// use chrono::{Timelike, Utc};
///
/// let end = parse_deadline("2025. 3. 31.", &Utc).unwrap();
/// assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
/// ```
pub fn parse_deadline<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = DOTTED_DATE.captures(text) {
        let date = ymd(&caps[1], &caps[2], &caps[3])?;
        return end_of_day(date, tz);
    }

    if let Some(caps) = DOTTED_DATE_TIME.captures(text) {
        let date = ymd(&caps[1], &caps[2], &caps[3])?;
        let hour = caps[4].parse().ok()?;
        let minute = caps[5].parse().ok()?;
        let second = caps.get(6).map_or(Some(0), |s| s.as_str().parse().ok())?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        return local(date.and_time(time), tz);
    }

    if let Some(caps) = ISO_DATE.captures(text) {
        let date = ymd(&caps[1], &caps[2], &caps[3])?;
        return end_of_day(date, tz);
    }

    parse_generic(text, tz)
}

/// Returns `true` only if `raw` parses and lies strictly after `now`.
///
/// ## Example
/// ```rust
/// use arlap_core::deadline::is_future;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
/// assert!(is_future(Some("2025.03.31"), &now));   // until 23:59:59.999
/// assert!(!is_future(Some("2020-01-01"), &now));
/// assert!(!is_future(Some("holnapig"), &now));    // unparseable: closed
/// assert!(!is_future(None, &now));
/// ```
pub fn is_future<Tz: TimeZone>(raw: Option<&str>, now: &DateTime<Tz>) -> bool {
    let Some(raw) = raw else {
        return false;
    };
    match parse_deadline(raw, &now.timezone()) {
        Some(deadline) => deadline > *now,
        None => {
            trace!(deadline = %raw, "Unparseable discount deadline, treating as expired");
            false
        }
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn end_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    local(date.and_hms_milli_opt(23, 59, 59, 999)?, tz)
}

fn local<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest()
}

fn parse_generic<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let normalized = if text.contains('T') {
        text.to_string()
    } else {
        text.replacen(' ', "T", 1)
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed.with_timezone(tz));
    }
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Some(parsed.with_timezone(tz));
        }
    }
    for format in LOCAL_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return local(naive, tz);
        }
    }
    for format in LOCAL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return local(date.and_hms_opt(0, 0, 0)?, tz);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.with_timezone(tz));
    }
    None
}

// =============================================================================
// Unit Tests
// =============================================================================
