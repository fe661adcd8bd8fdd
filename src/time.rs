//! Julian Date conversions and the UTC+8 civil datetime type.
//!
//! The whole crate keeps time as 64-bit Julian Dates (TDB or UTC); this
//! module owns the boundary between those and human calendar fields.
//!
//! # Julian Dates
//!
//! The Julian Date (JD) is a continuous count of days since noon on
//! November 24, 4714 BCE (proleptic Gregorian). It has no gaps and no
//! calendar reforms, which makes it the natural time axis for ephemerides
//! and for the root solver. The conversions here use the Jean Meeus
//! algorithms (*Astronomical Algorithms*, 2nd ed., Chapter 7) extended to
//! the proleptic Gregorian calendar, so they are valid over the full
//! [-4000, +8000] year range a long ephemeris can cover, far beyond what
//! `chrono` date types are intended for.
//!
//! # Civil datetimes
//!
//! [`LocalDT`] is a calendar sextuple (year, month, day, hour, minute,
//! fractional second) in the fixed UTC+8 offset, carrying the canonical
//! UTC Julian Date it was derived from. Ordering and equality always use
//! the canonical JD, never the fields.
//!
//! # Example
//!
//! ```
//! use lunisolar_astro::time::LocalDT;
//!
//! let t = LocalDT::from_local(2025, 3, 20, 17, 1, 23.0);
//! assert_eq!(t.to_string(), "2025-03-20 17:01:23.000");
//! let back = LocalDT::from_utc_jd(t.utc_jd());
//! assert_eq!(back.utc_jd(), t.utc_jd());
//! ```

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::math::{SEC_DAY, UTC8_DAYS};

/// Julian Date of the J2000.0 epoch: 2000 January 1.5.
pub const JD2000: f64 = 2451545.0;

/// Converts proleptic-Gregorian calendar fields to a Julian Date.
///
/// The fields are interpreted in whatever time scale the caller is working
/// in; the function is purely calendrical.
///
/// # Example
///
/// ```
/// use lunisolar_astro::time::gregorian_to_jd;
///
/// assert_eq!(gregorian_to_jd(2000, 1, 1, 12, 0, 0.0), 2451545.0);
/// ```
pub fn gregorian_to_jd(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> f64 {
    let mut y = year as f64;
    let mut m = month as f64;
    if m <= 2.0 {
        y -= 1.0;
        m += 12.0;
    }

    let a = (y / 100.0).floor();
    // Proleptic Gregorian: the leap correction applies to all dates.
    let b = 2.0 - a + (a / 4.0).floor();

    let frac_day = (hour as f64 + (minute as f64 + second / 60.0) / 60.0) / 24.0;

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day as f64 + b - 1524.5
        + frac_day
}

/// Splits a Julian Date into proleptic-Gregorian calendar fields.
///
/// Returns `(year, month, day, hour, minute, second)`. Seconds within half a
/// millisecond of a minute boundary are carried over, so the field form never
/// reads `59.9996`; the carry propagates through minutes, hours and the date.
pub fn jd_to_gregorian(jd: f64) -> (i32, u32, u32, u32, u32, f64) {
    let zf = jd + 0.5;
    let mut z = zf.floor();
    let f = zf - z;

    let mut total_seconds = f * SEC_DAY;
    if total_seconds < 0.0 {
        total_seconds = 0.0;
    }
    let mut hour = (total_seconds / 3600.0).floor() as u32;
    total_seconds -= hour as f64 * 3600.0;
    let mut minute = (total_seconds / 60.0).floor() as u32;
    let mut second = total_seconds - minute as f64 * 60.0;

    if second >= 59.9995 {
        second = 0.0;
        minute += 1;
        if minute >= 60 {
            minute = 0;
            hour += 1;
            if hour >= 24 {
                hour = 0;
                z += 1.0;
            }
        }
    }

    let alpha = ((z - 1867216.25) / 36524.25).floor();
    let a = z + 1.0 + alpha - (alpha / 4.0).floor();
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = (b - d - (30.6001 * e).floor()) as u32;
    let month = if e < 14.0 { (e - 1.0) as u32 } else { (e - 13.0) as u32 };
    let year = if month > 2 { (c - 4716.0) as i32 } else { (c - 4715.0) as i32 };

    (year, month, day, hour, minute, second)
}

/// Converts a UTC `chrono` datetime to a Julian Date in UTC.
///
/// Convenience entry point for callers that live in `chrono` types;
/// sub-second precision is preserved from the nanosecond field.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use lunisolar_astro::time::julian_date_utc;
///
/// let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
/// assert!((julian_date_utc(dt) - 2451545.0).abs() < 1e-9);
/// ```
pub fn julian_date_utc(datetime: DateTime<Utc>) -> f64 {
    let second = datetime.second() as f64 + datetime.nanosecond() as f64 * 1e-9;
    gregorian_to_jd(
        datetime.year(),
        datetime.month(),
        datetime.day(),
        datetime.hour(),
        datetime.minute(),
        second,
    )
}

/// A civil datetime in the fixed UTC+8 offset.
///
/// Stores both the calendar fields and the canonical UTC Julian Date. The
/// JD is the source of truth: comparisons use it, and
/// `from_utc_jd(t.utc_jd())` reproduces `t` exactly.
#[derive(Debug, Clone, Copy)]
pub struct LocalDT {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
    utc_jd: f64,
}

impl LocalDT {
    /// Builds a `LocalDT` from UTC+8 civil fields.
    pub fn from_local(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        let jd_local = gregorian_to_jd(year, month, day, hour, minute, second);
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            utc_jd: jd_local - UTC8_DAYS,
        }
    }

    /// Builds a `LocalDT` from a Julian Date in UTC, deriving the UTC+8
    /// civil fields.
    pub fn from_utc_jd(jd_utc: f64) -> Self {
        let (year, month, day, hour, minute, second) = jd_to_gregorian(jd_utc + UTC8_DAYS);
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            utc_jd: jd_utc,
        }
    }

    /// Builds a `LocalDT` from a `chrono` UTC datetime.
    pub fn from_utc_datetime(datetime: DateTime<Utc>) -> Self {
        Self::from_utc_jd(julian_date_utc(datetime))
    }

    /// The canonical Julian Date in UTC.
    pub fn utc_jd(&self) -> f64 {
        self.utc_jd
    }

    /// This instant shifted by a number of days.
    pub fn shift_days(&self, days: f64) -> Self {
        Self::from_utc_jd(self.utc_jd + days)
    }

    /// The `(year, month, day)` triple of the UTC+8 civil day.
    pub fn civil_date(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }

    /// Midnight UTC+8 opening this instant's civil day.
    pub fn start_of_civil_day(&self) -> Self {
        Self::from_local(self.year, self.month, self.day, 0, 0, 0.0)
    }
}

impl PartialEq for LocalDT {
    fn eq(&self, other: &Self) -> bool {
        self.utc_jd == other.utc_jd
    }
}

impl PartialOrd for LocalDT {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.utc_jd.partial_cmp(&other.utc_jd)
    }
}

impl fmt::Display for LocalDT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:06.3}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
