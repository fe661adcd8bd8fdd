//! Cross-module test suites.
//!
//! Most suites run against [`ToyEphemeris`], an analytic stand-in with the
//! Sun and Moon on circular orbits at realistic angular rates; it makes the
//! solver, the year engine, and the intercalation logic testable without a
//! kernel file. The `golden` suite checks published instants against a real
//! SPK kernel and skips itself unless `LUNISOLAR_EPHEM` points at one.

pub mod batch;
pub mod golden;
pub mod solver;

use crate::ephemeris::{Body, Ephemeris};
use crate::error::{CalendarError, Result};
use crate::frames::rotation_x;
use crate::math::{Vec3, TWO_PI};

/// Obliquity used to tilt the toy orbits, radians (23.439291°).
const TOY_OBLIQUITY: f64 = 0.409_092_804_222_329;

/// Toy mean tropical year and synodic month, days.
const TOY_YEAR: f64 = 365.2422;
const TOY_SYNODIC: f64 = 29.530_588;

/// JD TDB of a vernal equinox (2000-03-20ish) and a new moon (2000-01-06ish).
const TOY_VERNAL_JD: f64 = 2_451_623.8;
const TOY_NEW_MOON_JD: f64 = 2_451_550.26;

/// Analytic ephemeris: Earth fixed at the barycenter, Sun and Moon on
/// circular orbits in the J2000 ecliptic plane at the mean tropical and
/// synodic rates. Longitudes are monotone and phases recur on an exact
/// synodic grid, which is all the calendar machinery relies on.
pub struct ToyEphemeris;

impl ToyEphemeris {
    fn orbit(radius: f64, lambda: f64, rate: f64) -> (Vec3, Vec3) {
        let (s, c) = lambda.sin_cos();
        let tilt = rotation_x(-TOY_OBLIQUITY);
        let pos = tilt * Vec3::new(radius * c, radius * s, 0.0);
        let vel = tilt * Vec3::new(-radius * rate * s, radius * rate * c, 0.0);
        (pos, vel)
    }

    fn sun_lambda(jd_tdb: f64) -> f64 {
        TWO_PI / TOY_YEAR * (jd_tdb - TOY_VERNAL_JD)
    }

    fn state_of(body: Body, jd_tdb: f64) -> (Vec3, Vec3) {
        match body {
            Body::Sun => {
                let rate = TWO_PI / TOY_YEAR;
                Self::orbit(1.0, Self::sun_lambda(jd_tdb), rate)
            }
            Body::Moon => {
                let elongation = TWO_PI / TOY_SYNODIC * (jd_tdb - TOY_NEW_MOON_JD);
                let rate = TWO_PI / TOY_YEAR + TWO_PI / TOY_SYNODIC;
                Self::orbit(0.00257, Self::sun_lambda(jd_tdb) + elongation, rate)
            }
            Body::Earth | Body::EarthMoonBarycenter | Body::SolarSystemBarycenter => {
                (Vec3::ZERO, Vec3::ZERO)
            }
        }
    }
}

impl Ephemeris for ToyEphemeris {
    fn state(&self, target: Body, observer: Body, jd_tdb: f64) -> Result<(Vec3, Vec3)> {
        if target == observer {
            return Err(CalendarError::InvalidInput {
                reason: "target and observer must differ".into(),
            });
        }
        let (tp, tv) = Self::state_of(target, jd_tdb);
        let (op, ov) = Self::state_of(observer, jd_tdb);
        Ok((tp - op, tv - ov))
    }
}

/// JD TDB near the toy vernal equinox, handy as a solver seed.
pub fn toy_vernal_jd() -> f64 {
    TOY_VERNAL_JD
}

/// JD TDB of the k-th toy new moon.
pub fn toy_new_moon_jd(k: i32) -> f64 {
    TOY_NEW_MOON_JD + k as f64 * TOY_SYNODIC
}
