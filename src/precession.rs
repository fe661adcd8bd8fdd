//! IAU 2006 precession of the equator and equinox.
//!
//! Implements the four-rotation formulation
//! `P = R3(χ_A) · R1(−ω_A) · R3(−ψ_A) · R1(ε₀)`
//! with the Capitaine, Wallace & Chapront (2003) polynomial angles, as
//! adopted by the IAU in 2006. The polynomials are expansions in Julian
//! centuries of TDB since J2000.0 and are the standard short-term model;
//! millennia away from J2000 they degrade gracefully, which is still far
//! inside the sub-second tolerance the calendar solver needs.

use crate::frames::{rotation_x, rotation_z};
use crate::math::Mat3;
use crate::time::JD2000;

/// Arcseconds to radians.
const AS2RAD: f64 = std::f64::consts::PI / 648_000.0;

/// Obliquity of the ecliptic at J2000.0, arcseconds.
const EPS0_ARCSEC: f64 = 84_381.406;

/// Julian centuries of TDB since J2000.0.
#[inline]
pub(crate) fn centuries_since_j2000(jd_tdb: f64) -> f64 {
    (jd_tdb - JD2000) / 36_525.0
}

/// IAU 2006 precession matrix for the epoch of date.
///
/// Takes mean-equator-and-equinox-of-J2000 coordinates to the mean equator
/// and equinox of date. Apply the frame bias first when starting from ICRS.
pub fn precession_matrix(jd_tdb: f64) -> Mat3 {
    let t = centuries_since_j2000(jd_tdb);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let psi_a = (5038.481507 * t - 1.0790069 * t2 - 0.00114045 * t3 + 0.000132851 * t4
        - 0.0000000951 * t5)
        * AS2RAD;
    let omega_a = (EPS0_ARCSEC - 0.025754 * t + 0.0512623 * t2 - 0.00772503 * t3
        - 0.000000467 * t4
        + 0.0000000337 * t5)
        * AS2RAD;
    let chi_a = (10.556403 * t - 2.3814292 * t2 - 0.00121197 * t3 + 0.000170663 * t4
        - 0.0000000560 * t5)
        * AS2RAD;
    let eps0 = EPS0_ARCSEC * AS2RAD;

    rotation_z(chi_a) * rotation_x(-omega_a) * rotation_z(-psi_a) * rotation_x(eps0)
}
