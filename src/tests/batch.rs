use crate::apparent::ApparentLongitude;
use crate::batch::solve_roots;
use crate::solver::{solve, RootKind, RootTask};
use crate::tests::{toy_new_moon_jd, toy_vernal_jd, ToyEphemeris};
use std::f64::consts::PI;

fn sample_tasks() -> Vec<RootTask> {
    let mut tasks = Vec::new();
    for k in 0..6 {
        tasks.push(RootTask::new(
            RootKind::Solar,
            k as f64 * PI / 12.0,
            toy_vernal_jd() + k as f64 * 15.2,
        ));
    }
    for k in 0..6 {
        tasks.push(RootTask::new(RootKind::Lunar, 0.0, toy_new_moon_jd(k) + 0.9));
    }
    tasks
}

#[test]
fn batch_matches_sequential_solves_in_order() {
    let eph = ToyEphemeris;
    let tasks = sample_tasks();

    let (values, errors) = solve_roots(&eph, &tasks);
    assert_eq!(values.len(), tasks.len());
    assert_eq!(errors.len(), tasks.len());

    let engine = ApparentLongitude::new(&eph);
    for (i, task) in tasks.iter().enumerate() {
        assert!(errors[i].is_empty(), "task {i}: {}", errors[i]);
        let direct = solve(&engine, task).unwrap();
        assert!(
            (values[i] - direct).abs() < 1e-9,
            "task {i}: batch {} vs direct {direct}",
            values[i]
        );
    }
}

#[test]
fn batch_is_deterministic_across_runs() {
    let eph = ToyEphemeris;
    let tasks = sample_tasks();

    let (first, _) = solve_roots(&eph, &tasks);
    let (second, _) = solve_roots(&eph, &tasks);
    assert_eq!(first, second, "same inputs must give identical roots");
}

#[test]
fn failing_task_is_isolated() {
    let eph = ToyEphemeris;
    let mut tasks = sample_tasks();
    // Insert an unsolvable task in the middle: nearest root ~120 days out.
    tasks.insert(3, RootTask::new(RootKind::Solar, PI, toy_vernal_jd() + 60.0));

    let (values, errors) = solve_roots(&eph, &tasks);

    assert!(values[3].is_nan());
    assert!(errors[3].contains("did not converge"), "got: {}", errors[3]);
    assert!(!errors[3].contains('\n') && !errors[3].contains('\t'));

    for (i, err) in errors.iter().enumerate() {
        if i != 3 {
            assert!(err.is_empty(), "sibling task {i} aborted: {err}");
            assert!(values[i].is_finite());
        }
    }
}

#[test]
fn single_task_short_circuit_agrees_with_batch() {
    let eph = ToyEphemeris;
    let task = RootTask::new(RootKind::Solar, -PI / 2.0, toy_vernal_jd() + 276.0);

    let (alone, err_alone) = solve_roots(&eph, &[task]);
    let (paired, err_paired) = solve_roots(
        &eph,
        &[task, RootTask::new(RootKind::Lunar, 0.0, toy_new_moon_jd(2))],
    );

    assert!(err_alone[0].is_empty() && err_paired[0].is_empty());
    assert!(
        (alone[0] - paired[0]).abs() < 1e-9,
        "solo {} vs batched {}",
        alone[0],
        paired[0]
    );
}

#[test]
fn empty_batch_returns_empty_lists() {
    let eph = ToyEphemeris;
    let (values, errors) = solve_roots(&eph, &[]);
    assert!(values.is_empty() && errors.is_empty());
}
