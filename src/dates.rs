//! Published-date normalisation.
//!
//! Result cards show either a relative age ("3 hours ago", "an hour ago") or
//! a calendar date in one of several month-name styles ("Jan. 5, 2024",
//! "January 5 2024"). Everything is reduced to a [`NaiveDate`] so the
//! recency filter can compare days.

use crate::error::{Result, ScrapeError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Calendar formats tried in order; the first that parses wins.
const ABSOLUTE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B. %d, %Y",
    "%b %d, %Y",
    "%b. %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%B. %d %Y",
    "%b. %d %Y",
];

/// Formats accepted by the lenient fallback, after whitespace is collapsed.
const LENIENT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%Y/%m/%d",
];

const LENIENT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%b %d, %Y %I:%M %p",
    "%B %d, %Y %I:%M %p",
    "%b. %d, %Y %I:%M %p",
    "%b %d, %Y %H:%M",
    "%B %d, %Y %H:%M",
    "%b. %d, %Y %H:%M",
];

static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());
static SEPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?i:sept)\b").unwrap());
static ZONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+(?:UTC|GMT)$").unwrap());

/// Normalise a raw card date against `now`.
///
/// Relative phrases subtract from `now` and keep the day. "an hour ago" and
/// "a min ago" resolve to `now`'s day as-is.
pub fn normalize_date(raw: &str, now: NaiveDateTime) -> Result<NaiveDate> {
    let raw = raw.trim();

    if raw.contains("an hour ago") || raw.contains("a min ago") {
        return Ok(now.date());
    }

    let relative = if raw.contains("min ago") {
        Some(TimeDelta::try_minutes(leading_count(raw)?))
    } else if raw.contains("sec ago") {
        Some(TimeDelta::try_seconds(leading_count(raw)?))
    } else if raw.contains("hours ago") {
        Some(TimeDelta::try_hours(leading_count(raw)?))
    } else {
        None
    };

    if let Some(delta) = relative {
        let then = delta
            .and_then(|d| now.checked_sub_signed(d))
            .ok_or_else(|| ScrapeError::parse(raw, "relative time out of range"))?;
        return Ok(then.date());
    }

    parse_absolute(raw)
}

/// Parse a calendar date string without any notion of "now".
///
/// The explicit card formats are tried on the raw text first. Failing that,
/// the text is tidied (whitespace collapsed, ordinal suffixes and a trailing
/// `UTC`/`GMT` dropped, `Sept` shortened to `Sep`) and tried against the
/// explicit formats again and then the lenient ones.
///
/// # Errors
/// [`ScrapeError::Parse`] when no format matches, including impossible
/// dates such as `Feb 30, 2024`.
pub fn parse_absolute(raw: &str) -> Result<NaiveDate> {
    if let Some(date) = explicit(raw) {
        return Ok(date);
    }
    let tidy = tidy(raw);
    explicit(&tidy)
        .or_else(|| lenient_parse(&tidy))
        .ok_or_else(|| ScrapeError::parse(raw, "no known date format matched"))
}

fn explicit(s: &str) -> Option<NaiveDate> {
    ABSOLUTE_FORMATS.iter().find_map(|fmt| {
        let date = NaiveDate::parse_from_str(s, fmt).ok()?;
        debug!(raw = %s, format = fmt, "Matched explicit date format");
        Some(date)
    })
}

fn tidy(raw: &str) -> String {
    let s = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let s = ORDINAL_RE.replace_all(&s, "$1");
    let s = SEPT_RE.replace_all(&s, "Sep");
    ZONE_RE.replace(&s, "").into_owned()
}

fn lenient_parse(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in LENIENT_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in LENIENT_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

fn leading_count(raw: &str) -> Result<i64> {
    let first = raw
        .split_whitespace()
        .next()
        .ok_or_else(|| ScrapeError::parse(raw, "empty relative time"))?;
    first
        .parse::<i64>()
        .map_err(|_| ScrapeError::parse(raw, format!("{first:?} is not a number")))
}
