//! Calendar date to decimal-year conversion
//!
//! Time-varying magnetic models are indexed by a decimal year: the calendar year plus the
//! elapsed fraction of that year. The fraction is the ratio of elapsed time since January 1st to
//! the true span between consecutive January 1sts, so leap years need no special casing.

use crate::{Result, RouteError};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Date-time layouts tried in order, before the date-only layouts
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts; month-first for slashed dates that do not start with the year
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
];

/// A route-wide reference date expressed as a decimal year (e.g. `2024.4536`)
///
/// Invariant: `year <= value < year + 1` where `year` is the calendar year it was built from.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epoch(f64);

impl Epoch {
    /// Convert a calendar date-time (UTC) to a decimal year
    pub fn from_datetime(datetime: NaiveDateTime) -> Result<Self> {
        let year = datetime.year();
        let start = new_year(year)?;
        let end = new_year(year + 1)?;

        let elapsed = datetime
            .signed_duration_since(start)
            .num_nanoseconds()
            .ok_or_else(|| RouteError::InvalidDate(datetime.to_string()))?;
        let span = end
            .signed_duration_since(start)
            .num_nanoseconds()
            .ok_or_else(|| RouteError::InvalidDate(datetime.to_string()))?;

        let fraction = elapsed as f64 / span as f64;
        let value = f64::from(year) + fraction;

        // Instants a few nanoseconds before the next new year round up to it in f64
        let upper = f64::from(year + 1);
        Ok(Epoch(if value >= upper {
            largest_below(upper)
        } else {
            value
        }))
    }

    /// Decimal year at 00:00:00 of the given date
    pub fn from_date(date: NaiveDate) -> Result<Self> {
        Self::from_datetime(date.and_time(NaiveTime::MIN))
    }

    /// Parse a free-form date token and convert it to a decimal year
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_datetime(parse_date(text)?)
    }

    /// Wrap an already computed decimal year
    pub fn from_decimal_year(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(RouteError::InvalidDate(value.to_string()));
        }
        Ok(Epoch(value))
    }

    /// The decimal year
    #[inline]
    pub fn decimal_year(&self) -> f64 {
        self.0
    }

    /// The calendar year the epoch falls in
    #[inline]
    pub fn year(&self) -> i32 {
        self.0.floor() as i32
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Resolve a free-form date token to a UTC calendar date-time
///
/// Accepts RFC 3339 timestamps (converted to UTC), ISO-like date-times, ISO dates, compact
/// `YYYYMMDD`, US `MM/DD/YYYY` and dates with English month names. Dates without a time of day
/// resolve to midnight. Anything else fails with [`RouteError::InvalidDate`].
pub fn parse_date(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RouteError::InvalidDate(text.to_string()));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime);
        }
    }

    if let Some(date) = parse_compact_date(trimmed) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    Err(RouteError::InvalidDate(text.to_string()))
}

/// `YYYYMMDD`
fn parse_compact_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = text[0..4].parse().ok()?;
    let month = text[4..6].parse().ok()?;
    let day = text[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn new_year(year: i32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(|| RouteError::InvalidDate(format!("year {year} out of range")))
}

/// The largest representable `f64` strictly below `value`
fn largest_below(value: f64) -> f64 {
    if value > 0.0 {
        f64::from_bits(value.to_bits() - 1)
    } else if value < 0.0 {
        f64::from_bits(value.to_bits() + 1)
    } else {
        -f64::from_bits(1)
    }
}
