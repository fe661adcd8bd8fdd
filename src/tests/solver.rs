use crate::apparent::ApparentLongitude;
use crate::error::CalendarError;
use crate::math::wrap_angle;
use crate::solver::{solve, value_and_derivative, RootKind, RootTask};
use crate::tests::{toy_new_moon_jd, toy_vernal_jd, ToyEphemeris};
use std::f64::consts::PI;

#[test]
fn solar_root_lands_on_target_longitude() {
    let eph = ToyEphemeris;
    let engine = ApparentLongitude::new(&eph);

    let task = RootTask::new(RootKind::Solar, 0.0, toy_vernal_jd() + 4.0);
    let root = solve(&engine, &task).unwrap();

    // The root sits within a day of the toy equinox (the frame wobble
    // shifts it by minutes, not days).
    assert!((root - toy_vernal_jd()).abs() < 1.0, "root {root}");

    let (lam, _) = engine.sun(root).unwrap();
    assert!(wrap_angle(lam).abs() < 1e-10, "residual {}", wrap_angle(lam));
}

#[test]
fn lunar_root_lands_on_phase_angle() {
    let eph = ToyEphemeris;
    let engine = ApparentLongitude::new(&eph);

    for (angle, offset) in [(0.0, 0.0), (PI / 2.0, 7.0), (PI, 15.0), (-PI / 2.0, 22.0)] {
        let task = RootTask::new(RootKind::Lunar, angle, toy_new_moon_jd(5) + offset);
        let root = solve(&engine, &task).unwrap();
        let (f, fdot) = value_and_derivative(&engine, RootKind::Lunar, root, angle).unwrap();
        assert!(f.abs() < 1e-10, "residual {f} for angle {angle}");
        assert!(fdot > 0.0, "elongation rate must be positive");
    }
}

#[test]
fn rerun_from_perturbed_initial_reproduces_root() {
    let eph = ToyEphemeris;
    let engine = ApparentLongitude::new(&eph);

    let task = RootTask::new(RootKind::Solar, PI / 2.0, toy_vernal_jd() + 90.0);
    let root = solve(&engine, &task).unwrap();

    for perturbation in [-1e-6, 1e-6] {
        let nudged = RootTask::new(RootKind::Solar, PI / 2.0, root + perturbation);
        let again = solve(&engine, &nudged).unwrap();
        assert!(
            (again - root).abs() < 1e-7,
            "perturbed rerun drifted {} days",
            (again - root).abs()
        );
    }
}

#[test]
fn bracket_fallback_recovers_without_newton() {
    let eph = ToyEphemeris;
    let engine = ApparentLongitude::new(&eph);

    // No Newton budget: only the ±3 day scan-and-bisect path can find the
    // root 2.3 days from the guess.
    let mut task = RootTask::new(RootKind::Lunar, 0.0, toy_new_moon_jd(3) - 2.3);
    task.max_iterations = 0;
    let root = solve(&engine, &task).unwrap();
    let (f, _) = value_and_derivative(&engine, RootKind::Lunar, root, 0.0).unwrap();
    assert!(f.abs() < 1e-8, "bracket residual {f}");
}

#[test]
fn far_root_reports_did_not_converge() {
    let eph = ToyEphemeris;
    let engine = ApparentLongitude::new(&eph);

    // The nearest solar root is ~120 days away: Newton's ±3-day clamp walks
    // at most 60 days in 20 iterations and the ±3-day scan finds no sign
    // change, so the task must fail cleanly.
    let task = RootTask::new(RootKind::Solar, PI, toy_vernal_jd() + 60.0);
    let err = solve(&engine, &task).unwrap_err();
    assert!(matches!(err, CalendarError::DidNotConverge { kind: "solar", .. }));
}

#[test]
fn residual_wraps_across_the_discontinuity() {
    let eph = ToyEphemeris;
    let engine = ApparentLongitude::new(&eph);

    // Just past the target the residual must be small positive, not ~2π.
    let (f, _) =
        value_and_derivative(&engine, RootKind::Solar, toy_vernal_jd() + 0.5, 0.0).unwrap();
    assert!(f > 0.0 && f < 0.1, "residual {f}");
    let (g, _) =
        value_and_derivative(&engine, RootKind::Solar, toy_vernal_jd() - 0.5, 0.0).unwrap();
    assert!(g < 0.0 && g > -0.1, "residual {g}");
}
