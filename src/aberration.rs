//! Light-time and aberration corrections for geocentric directions.
//!
//! Two variants are provided:
//!
//! - [`propagated`]: iterate the light-time equation and return the
//!   geocentric position *and velocity* evaluated at the retarded instant.
//!   This is what the apparent-longitude residual uses, because its time
//!   derivative assumes the same retardation model.
//! - [`apparent_direction`]: after light-time convergence, additionally
//!   apply the special-relativistic annual aberration from Earth's
//!   barycentric velocity, returning the apparent unit direction scaled
//!   back to the geometric distance.
//!
//! For the calendar the two differ by well under the event tolerance; the
//! second exists for callers that want directions consistent with
//! star-catalog apparent places.

use crate::ephemeris::{Body, Ephemeris};
use crate::error::Result;
use crate::math::{Vec3, C_AUDAY};

/// Light travel time across a vector, in days.
#[inline]
pub fn light_days(vec: &Vec3) -> f64 {
    vec.norm() / C_AUDAY
}

/// Convergence tolerance on the retarded time, in days (≈ 0.1 µs).
const LIGHT_TIME_TOL: f64 = 1e-12;

/// Geocentric state of `target` at the retarded instant.
#[derive(Debug, Clone, Copy)]
pub struct RetardedState {
    /// Geocentric position at the retarded time, AU
    pub position: Vec3,
    /// Geocentric velocity at the retarded time, AU/day
    pub velocity: Vec3,
    /// The retarded TDB Julian Date
    pub retarded_jd: f64,
}

/// Light-time-corrected geocentric state of `target` as seen from Earth at
/// `jd_tdb`.
///
/// Iterates `t_r ← t − |x_t(t_r) − x_E(t_r)|/c` up to `max_iter` times or
/// until the update falls below the tolerance.
pub fn propagated(
    eph: &dyn Ephemeris,
    target: Body,
    jd_tdb: f64,
    max_iter: usize,
) -> Result<RetardedState> {
    let mut tr = jd_tdb;

    for _ in 0..max_iter {
        let xt = eph.position(target, Body::SolarSystemBarycenter, tr)?;
        let xe = eph.position(Body::Earth, Body::SolarSystemBarycenter, tr)?;
        let lt = light_days(&(xt - xe));
        let tr_new = jd_tdb - lt;
        if (tr_new - tr).abs() < LIGHT_TIME_TOL {
            tr = tr_new;
            break;
        }
        tr = tr_new;
    }

    let (xt, vt) = eph.state(target, Body::SolarSystemBarycenter, tr)?;
    let (xe, ve) = eph.state(Body::Earth, Body::SolarSystemBarycenter, tr)?;

    Ok(RetardedState {
        position: xt - xe,
        velocity: vt - ve,
        retarded_jd: tr,
    })
}

/// Fully aberrated geocentric direction of `target`, scaled to the
/// geometric distance, plus the retarded instant.
///
/// Earth's position and velocity are taken at the observation instant (the
/// observer is not retarded); the relativistic formula is
/// `n' = (γ⁻¹ n + β + (n·β)β/(1+γ⁻¹)) / (1 + n·β)` with `β = v_E/c`.
pub fn apparent_direction(
    eph: &dyn Ephemeris,
    target: Body,
    jd_tdb: f64,
    max_iter: usize,
) -> Result<(Vec3, f64)> {
    let xe = eph.position(Body::Earth, Body::SolarSystemBarycenter, jd_tdb)?;
    let ve = eph.velocity(Body::Earth, Body::SolarSystemBarycenter, jd_tdb)?;

    let mut tr = jd_tdb;
    let mut xt = eph.position(target, Body::SolarSystemBarycenter, tr)?;
    for _ in 0..max_iter {
        let lt = light_days(&(xt - xe));
        let tr_new = jd_tdb - lt;
        if (tr_new - tr).abs() < LIGHT_TIME_TOL {
            tr = tr_new;
            break;
        }
        tr = tr_new;
        xt = eph.position(target, Body::SolarSystemBarycenter, tr)?;
    }
    xt = eph.position(target, Body::SolarSystemBarycenter, tr)?;

    let r_geo = xt - xe;
    let r = r_geo.norm();
    let n = r_geo / r;

    let beta = ve / C_AUDAY;
    let beta2 = beta.dot(&beta);
    let gamma_inv = (1.0 - beta2).max(0.0).sqrt();
    let nb = n.dot(&beta);

    let n_app = (gamma_inv * n + beta + (nb / (1.0 + gamma_inv)) * beta) / (1.0 + nb);

    let n_app_norm = n_app.norm();
    if n_app_norm == 0.0 {
        return Ok((n * r, tr));
    }
    Ok(((n_app / n_app_norm) * r, tr))
}
