//! Time scale conversions between TDB and UTC.
//!
//! The ephemeris works in Barycentric Dynamical Time (TDB) while civil
//! output is UTC, so every solved event instant passes through this module.
//!
//! # Time Scale Relationships
//!
//! - **TT = TAI + 32.184 seconds** (exact constant)
//! - **TAI = UTC + leap_seconds** (stepwise, from IERS Bulletin C)
//! - **TDB ≈ TT**: the periodic TDB−TT term stays below 2 ms, well under
//!   the tolerance anything downstream needs, and is treated as zero.
//!
//! Inside the leap-second table span (1972-01-01 through the last announced
//! step) the conversion is exact to the table. Outside it, UTC is
//! approximated by UT1 through a long-term ΔT polynomial (Espenak/Meeus
//! form re-fitted around 1825), which is the right trade for ancient and
//! far-future dates where leap seconds are undefined anyway.
//!
//! # Example
//!
//! ```
//! use lunisolar_astro::time_scales::{tdb_to_utc_jd, utc_to_tdb_jd};
//!
//! let jd_utc = 2460000.5;
//! let jd_tdb = utc_to_tdb_jd(jd_utc);
//! // TT-UTC is 69.184 s in this era.
//! assert!(((jd_tdb - jd_utc) * 86400.0 - 69.184).abs() < 1e-6);
//! assert!((tdb_to_utc_jd(jd_tdb) - jd_utc).abs() < 1e-9);
//! ```

use crate::math::SEC_DAY;

/// TT-TAI offset in seconds (exact constant defined by the IAU).
const TT_TAI_SECONDS: f64 = 32.184;

/// First civil year covered by the leap-second handling below.
const LEAP_ERA_START: f64 = 1970.0;

/// First civil year past the announced leap-second table.
const LEAP_ERA_END: f64 = 2026.0;

/// Leap second table as (JD UTC of the step, cumulative TAI-UTC seconds).
/// Updated from IERS Bulletin C announcements; the last entry is the
/// 2017-01-01 step.
static LEAP_SECOND_TABLE: &[(f64, i32)] = &[
    (2441317.5, 10), // 1972-01-01, initial TAI-UTC offset
    (2441499.5, 11),
    (2441683.5, 12),
    (2442048.5, 13),
    (2442413.5, 14),
    (2442778.5, 15),
    (2443144.5, 16),
    (2443509.5, 17),
    (2443874.5, 18),
    (2444239.5, 19),
    (2444786.5, 20),
    (2445151.5, 21),
    (2445516.5, 22),
    (2446247.5, 23),
    (2447161.5, 24),
    (2447892.5, 25),
    (2448257.5, 26),
    (2448804.5, 27),
    (2449169.5, 28),
    (2449534.5, 29),
    (2450083.5, 30),
    (2450630.5, 31),
    (2451179.5, 32),
    (2453736.5, 33),
    (2454832.5, 34),
    (2456109.5, 35),
    (2457204.5, 36),
    (2457754.5, 37), // 2017-01-01, most recent leap second
];

/// Cumulative TAI-UTC leap seconds in effect at a UTC Julian Date.
///
/// Zero before the table starts; the last step holds indefinitely after
/// the table ends (callers gate on the table era first).
pub fn leap_seconds(jd_utc: f64) -> i32 {
    let mut leaps = 0;
    for &(jd_step, value) in LEAP_SECOND_TABLE {
        if jd_utc >= jd_step {
            leaps = value;
        } else {
            break;
        }
    }
    leaps
}

/// Long-term ΔT (TT−UT1) polynomial in seconds, with the secular
/// correction term applied.
fn delta_t_long_term(year: f64) -> f64 {
    let base = delta_t_base(year);
    let corr = 0.1056 * ((year / 100.0 - 19.55).powi(2) - 0.49);
    base + corr
}

/// The base ΔT expression parameterized on `(year − 1825)/100`.
fn delta_t_base(year: f64) -> f64 {
    let t = (year - 1825.0) / 100.0;
    -150.568 + 31.4115 * t * t + 284.8436 * (2.0 * std::f64::consts::PI * (t + 0.75) / 14.0).cos()
}

/// Decimal civil year of a Julian Date, good enough for era gating.
fn jd_to_year(jd: f64) -> f64 {
    2000.0 + (jd - 2451544.5) / 365.2425
}

/// Converts a TDB Julian Date to a UTC Julian Date.
///
/// Inside the table era the inverse leap lookup iterates twice, because the
/// step in effect depends on the UTC value being computed.
pub fn tdb_to_utc_jd(jd_tdb: f64) -> f64 {
    // TDB ≈ TT for this crate's tolerance.
    let jd_tt = jd_tdb;
    let year = jd_to_year(jd_tt);

    if !(LEAP_ERA_START..=LEAP_ERA_END).contains(&year) {
        return jd_tt - delta_t_long_term(year) / SEC_DAY;
    }
    if year < 1972.0 {
        return jd_tt - delta_t_base(year) / SEC_DAY;
    }

    let jd_tai = jd_tt - TT_TAI_SECONDS / SEC_DAY;
    let mut jd_utc = jd_tai;
    for _ in 0..2 {
        let leaps = leap_seconds(jd_utc);
        jd_utc = jd_tai - leaps as f64 / SEC_DAY;
    }
    jd_utc
}

/// Converts a UTC Julian Date to a TDB Julian Date.
pub fn utc_to_tdb_jd(jd_utc: f64) -> f64 {
    let year = jd_to_year(jd_utc);

    if !(LEAP_ERA_START..=LEAP_ERA_END).contains(&year) {
        return jd_utc + delta_t_long_term(year) / SEC_DAY;
    }
    if year < 1972.0 {
        return jd_utc + delta_t_base(year) / SEC_DAY;
    }

    let leaps = leap_seconds(jd_utc);
    // TDB ≈ TT.
    jd_utc + (leaps as f64 + TT_TAI_SECONDS) / SEC_DAY
}
