//! Newton root solver with bracket fallback for longitude events.
//!
//! A task drives a scalar residual to zero modulo 2π:
//!
//! - solar: `wrap(λ_sun − target)` — a solar term
//! - lunar: `wrap(λ_moon − λ_sun − target)` — a lunar phase
//!
//! Newton steps are clamped to ±3 days so a step can never jump across a
//! longitude wraparound, and each step backtracks (halving, up to 20 times)
//! until the residual actually shrinks. When the iteration stalls, a
//! bracketing scan walks outward ±3 days in half-day steps and bisects the
//! first sign-change interval per direction. Defaults: `eps_days = 1e-8`
//! (≈ 0.86 ms, for run-to-run reproducibility rather than calendar
//! accuracy) and 20 Newton iterations.

use crate::apparent::ApparentLongitude;
use crate::error::{CalendarError, Result};
use crate::math::wrap_angle;

/// Residual tolerance treated as "exactly at the root", radians.
const RESIDUAL_TOL: f64 = 1e-12;

/// Derivative magnitude below which Newton gives up, radians/day.
const DERIVATIVE_FLOOR: f64 = 1e-12;

/// Newton step clamp, days.
const STEP_CLAMP: f64 = 3.0;

/// Maximum halvings per backtracking line search.
const MAX_BACKTRACKS: usize = 20;

/// Bracket scan step and reach, days.
const SCAN_STEP: f64 = 0.5;
const SCAN_LIMIT: f64 = 3.0;

/// Maximum bisection iterations per bracketed interval.
const MAX_BISECTIONS: usize = 40;

/// Default convergence tolerance on the root abscissa, days.
pub const DEFAULT_EPS_DAYS: f64 = 1e-8;

/// Default maximum Newton iterations.
pub const DEFAULT_MAX_ITER: usize = 20;

/// Which residual a root task evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// Solar apparent longitude reaches a target angle.
    Solar,
    /// Moon−Sun elongation reaches a target phase angle.
    Lunar,
}

impl RootKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Lunar => "lunar",
        }
    }
}

/// One independent root-finding task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootTask {
    pub kind: RootKind,
    /// Target angle, radians.
    pub target_angle: f64,
    /// Initial guess, JD TDB.
    pub initial_jd_tdb: f64,
    /// Convergence tolerance on the abscissa, days.
    pub eps_days: f64,
    /// Newton iteration budget.
    pub max_iterations: usize,
}

impl RootTask {
    /// A task with the default tolerance and iteration budget.
    pub fn new(kind: RootKind, target_angle: f64, initial_jd_tdb: f64) -> Self {
        Self {
            kind,
            target_angle,
            initial_jd_tdb,
            eps_days: DEFAULT_EPS_DAYS,
            max_iterations: DEFAULT_MAX_ITER,
        }
    }
}

/// Residual and its time derivative for a task kind at an instant.
pub fn value_and_derivative(
    engine: &ApparentLongitude<'_>,
    kind: RootKind,
    jd_tdb: f64,
    target_angle: f64,
) -> Result<(f64, f64)> {
    match kind {
        RootKind::Solar => {
            let (lam, lam_dot) = engine.sun(jd_tdb)?;
            Ok((wrap_angle(lam - target_angle), lam_dot))
        }
        RootKind::Lunar => {
            let (lam_s, lam_dot_s) = engine.sun(jd_tdb)?;
            let (lam_m, lam_dot_m) = engine.moon(jd_tdb)?;
            Ok((wrap_angle(lam_m - lam_s - target_angle), lam_dot_m - lam_dot_s))
        }
    }
}

/// Solves one task: damped Newton, then the bracket fallback.
pub fn solve(engine: &ApparentLongitude<'_>, task: &RootTask) -> Result<f64> {
    let RootTask {
        kind,
        target_angle,
        initial_jd_tdb,
        eps_days,
        max_iterations,
    } = *task;

    let mut jd = initial_jd_tdb;
    let (mut f, mut fdot) = value_and_derivative(engine, kind, jd, target_angle)?;
    if f.abs() < RESIDUAL_TOL {
        return Ok(jd);
    }

    for _ in 0..max_iterations {
        if fdot.abs() < DERIVATIVE_FLOOR {
            break;
        }
        let mut delta = (f / fdot).clamp(-STEP_CLAMP, STEP_CLAMP);
        let mut jd_new = jd - delta;
        let (mut f_new, mut fdot_new) = value_and_derivative(engine, kind, jd_new, target_angle)?;

        let mut backtracks = 0;
        while f_new.abs() > f.abs() && delta.abs() > eps_days && backtracks < MAX_BACKTRACKS {
            delta *= 0.5;
            jd_new = jd - delta;
            (f_new, fdot_new) = value_and_derivative(engine, kind, jd_new, target_angle)?;
            backtracks += 1;
        }

        if f_new.abs() > f.abs() && delta.abs() > eps_days {
            break;
        }

        if delta.abs() < eps_days || f_new.abs() < RESIDUAL_TOL {
            return Ok(jd_new);
        }

        jd = jd_new;
        f = f_new;
        fdot = fdot_new;
    }

    match bracket_fallback(engine, kind, target_angle, jd, f, eps_days) {
        Some(result) => result,
        None => Err(CalendarError::DidNotConverge {
            kind: kind.as_str(),
            target_angle,
            initial_jd: initial_jd_tdb,
        }),
    }
}

/// Scan ±3 days from the last iterate for a sign change, then bisect.
///
/// Returns `None` when no interval brackets a root; evaluation errors pass
/// through as `Some(Err(..))`.
fn bracket_fallback(
    engine: &ApparentLongitude<'_>,
    kind: RootKind,
    target_angle: f64,
    jd_center: f64,
    f_center: f64,
    eps_days: f64,
) -> Option<Result<f64>> {
    if f_center.abs() < RESIDUAL_TOL {
        return Some(Ok(jd_center));
    }

    struct Interval {
        left: f64,
        right: f64,
        f_left: f64,
    }

    let eval = |jd: f64| -> Result<f64> {
        Ok(value_and_derivative(engine, kind, jd, target_angle)?.0)
    };

    let mut intervals = Vec::new();
    let steps = (SCAN_LIMIT / SCAN_STEP) as i32;

    for dir in [-1.0, 1.0] {
        let mut prev_jd = jd_center;
        let mut prev_f = f_center;
        for i in 1..=steps {
            let cand_jd = jd_center + dir * i as f64 * SCAN_STEP;
            let cand_f = match eval(cand_jd) {
                Ok(v) => v,
                Err(e) => return Some(Err(e)),
            };
            if cand_f.abs() < RESIDUAL_TOL {
                return Some(Ok(cand_jd));
            }
            if prev_f * cand_f <= 0.0 {
                let (left, right, f_left) = if prev_jd < cand_jd {
                    (prev_jd, cand_jd, prev_f)
                } else {
                    (cand_jd, prev_jd, cand_f)
                };
                intervals.push(Interval { left, right, f_left });
                break;
            }
            prev_jd = cand_jd;
            prev_f = cand_f;
        }
    }

    for iv in intervals {
        let (mut left, mut right, mut f_left) = (iv.left, iv.right, iv.f_left);
        if f_left == 0.0 {
            return Some(Ok(left));
        }
        for _ in 0..MAX_BISECTIONS {
            let mid = 0.5 * (left + right);
            let f_mid = match eval(mid) {
                Ok(v) => v,
                Err(e) => return Some(Err(e)),
            };
            if f_mid.abs() < RESIDUAL_TOL || (right - left) * 0.5 < eps_days {
                return Some(Ok(mid));
            }
            if f_left * f_mid <= 0.0 {
                right = mid;
            } else {
                left = mid;
                f_left = f_mid;
            }
        }
    }

    None
}
