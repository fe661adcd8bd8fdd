//! # Lunisolar Astro
//!
//! Computation of the traditional Chinese lunisolar calendar directly from
//! high-precision JPL planetary ephemerides.
//!
//! Given an SPK kernel (e.g. `de440s.bsp`) and a civil year, the crate
//! produces the 24 solar terms (节气), the four principal lunar phases of
//! every lunation touching the year, and the numbered, leap-aware lunar
//! months under the classical 无中气置闰 (no-principal-term intercalation)
//! rule anchored on the winter solstice.
//!
//! ## Pipeline
//!
//! - [`ephemeris`] — geometric Sun/Moon/Earth states through an accessor
//!   trait, backed by an ANISE SPK reader
//! - [`time_scales`] — TDB ↔ UTC via a leap-second table and a long-term
//!   ΔT polynomial
//! - [`frames`], [`precession`], [`nutation`] — the ecliptic-of-date
//!   rotation: bias → precession → nutation → obliquity
//! - [`aberration`], [`apparent`] — light-time corrected apparent ecliptic
//!   longitudes and their rates
//! - [`solver`], [`batch`] — clamped damped Newton with bracket fallback,
//!   fanned out over a bounded worker pool
//! - [`calendar`], [`months`] — the year engine and the intercalation rule
//!
//! ## Accuracy & Standards
//!
//! Frame and time models follow IAU 2006 precession, a truncated IAU
//! luni-solar nutation series, the ERFA/SOFA rotation conventions, and the
//! IERS leap-second table. Event instants are solved to 1e-8 days
//! (≈ 0.86 ms) for reproducibility; end-to-end accuracy against full-series
//! references stays within about a second.
//!
//! ## Quick Example: the 2025 vernal equinox and lunar months
//!
//! ```no_run
//! use lunisolar_astro::{Calendar, SolarTermCode, SpkEphemeris};
//!
//! let eph = SpkEphemeris::open("de440s.bsp")?;
//! let cal = Calendar::new(&eph);
//!
//! let equinox = cal.find_solar_term(SolarTermCode::Z2, 2025)?;
//! println!("春分: {equinox}");
//!
//! for month in cal.civil_year_months(2025)? {
//!     println!("{:<6} {} .. {}", month.label, month.start, month.end);
//! }
//! # Ok::<(), lunisolar_astro::error::CalendarError>(())
//! ```
//!
//! All instants are UTC+8 civil datetimes ([`LocalDT`]) carrying their
//! canonical UTC Julian Date; conversion to other zones is up to the
//! caller.

pub mod aberration;
pub mod apparent;
pub mod batch;
pub mod calendar;
pub mod ephemeris;
pub mod error;
pub mod frames;
pub mod math;
pub mod months;
pub mod nutation;
pub mod precession;
pub mod solver;
pub mod terms;
pub mod time;
pub mod time_scales;

pub use batch::solve_roots;
pub use calendar::{Calendar, MoonPhaseSet, SolarTerm, YearResult};
pub use ephemeris::{Body, Ephemeris, SpkEphemeris};
pub use error::{CalendarError, Result};
pub use months::LunarMonth;
pub use solver::{RootKind, RootTask};
pub use terms::{LunarPhase, SolarTermCode};
pub use time::LocalDT;

#[cfg(test)]
pub mod tests;
