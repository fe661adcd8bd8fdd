//! Apparent geocentric ecliptic longitude of the Sun and Moon.
//!
//! For a TDB instant the engine produces `(λ, dλ/dt)`: the light-time
//! corrected geocentric ecliptic-of-date longitude and its time derivative,
//! the two quantities the event solver's Newton iteration consumes.
//!
//! The full rotation is `R = R1(ε)·N·P·B` (bias → precession → nutation →
//! obliquity). Because the solver evaluates Sun and Moon back to back at
//! the same instant, and revisits nearby-but-distinct instants while
//! iterating, the engine memoizes the precession matrix, the `R1(ε)·N`
//! product, and the composed rotation, each keyed on the *exact* JD it was
//! built for. Equality is float equality on purpose: near-equality caching
//! would need an invalidation story, and the same-instant reuse pattern is
//! exact by construction.
//!
//! The engine is a single-holder object: caches are `Cell`s, methods take
//! `&self`, and it is deliberately not `Sync`; each batch worker builds
//! its own engine over the shared ephemeris handle.

use std::cell::Cell;

use crate::aberration::propagated;
use crate::ephemeris::{Body, Ephemeris};
use crate::error::Result;
use crate::frames::{frame_bias, rotation_x};
use crate::math::{norm_two_pi, Mat3, Vec3};
use crate::nutation::{mean_obliquity, nutation, nutation_matrix};
use crate::precession::precession_matrix;

/// Light-time iterations for the residual evaluator.
const LIGHT_TIME_ITER: usize = 3;

/// Apparent ecliptic longitude engine with per-instant rotation memos.
pub struct ApparentLongitude<'e> {
    eph: &'e dyn Ephemeris,
    bias: Mat3,
    prec: Cell<Option<(f64, Mat3)>>,
    obliquity_nut: Cell<Option<(f64, Mat3)>>,
    rotation: Cell<Option<(f64, Mat3)>>,
}

impl<'e> ApparentLongitude<'e> {
    pub fn new(eph: &'e dyn Ephemeris) -> Self {
        Self {
            eph,
            bias: frame_bias(),
            prec: Cell::new(None),
            obliquity_nut: Cell::new(None),
            rotation: Cell::new(None),
        }
    }

    /// The ephemeris this engine evaluates through.
    pub fn ephemeris(&self) -> &'e dyn Ephemeris {
        self.eph
    }

    /// Precession matrix memo.
    fn precession(&self, jd_tdb: f64) -> Mat3 {
        if let Some((jd, m)) = self.prec.get() {
            if jd == jd_tdb {
                return m;
            }
        }
        let m = precession_matrix(jd_tdb);
        self.prec.set(Some((jd_tdb, m)));
        m
    }

    /// `R1(ε)·N` memo: true-equator-of-date to ecliptic-of-date, applied
    /// after nutation.
    fn obliquity_nutation(&self, jd_tdb: f64) -> Mat3 {
        if let Some((jd, m)) = self.obliquity_nut.get() {
            if jd == jd_tdb {
                return m;
            }
        }
        let eps = mean_obliquity(jd_tdb) + nutation(jd_tdb).obliquity;
        let m = rotation_x(eps) * nutation_matrix(jd_tdb);
        self.obliquity_nut.set(Some((jd_tdb, m)));
        m
    }

    /// Composed rotation `R1(ε)·N·P·B` memo.
    fn composed_rotation(&self, jd_tdb: f64) -> Mat3 {
        if let Some((jd, m)) = self.rotation.get() {
            if jd == jd_tdb {
                return m;
            }
        }
        let m = self.obliquity_nutation(jd_tdb) * self.precession(jd_tdb) * self.bias;
        self.rotation.set(Some((jd_tdb, m)));
        m
    }

    /// `(λ, dλ/dt)` for a body, radians and radians/day.
    fn longitude_and_rate(&self, target: Body, jd_tdb: f64) -> Result<(f64, f64)> {
        let state = propagated(self.eph, target, jd_tdb, LIGHT_TIME_ITER)?;
        let r = self.composed_rotation(jd_tdb);

        let xec: Vec3 = r * state.position;
        let vec: Vec3 = r * state.velocity;

        let lambda = norm_two_pi(xec.y.atan2(xec.x));

        let denom = xec.x * xec.x + xec.y * xec.y;
        let lambda_dot = if denom != 0.0 {
            (xec.x * vec.y - xec.y * vec.x) / denom
        } else {
            0.0
        };

        Ok((lambda, lambda_dot))
    }

    /// Apparent geocentric ecliptic longitude of the Sun and its rate.
    pub fn sun(&self, jd_tdb: f64) -> Result<(f64, f64)> {
        self.longitude_and_rate(Body::Sun, jd_tdb)
    }

    /// Apparent geocentric ecliptic longitude of the Moon and its rate.
    pub fn moon(&self, jd_tdb: f64) -> Result<(f64, f64)> {
        self.longitude_and_rate(Body::Moon, jd_tdb)
    }
}
