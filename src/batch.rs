//! Batch execution of independent root-finding tasks.
//!
//! Results come back as two lists parallel to the input: converged JD TDB
//! values (NaN where a task failed) and per-task error strings (empty on
//! success). One task failing never aborts its siblings, results are
//! indexed identically to inputs regardless of scheduling, and the
//! converged value for a task does not depend on which worker ran it,
//! since tasks share no mutable state.
//!
//! Workers are threads on a bounded rayon pool sharing the one ephemeris
//! handle; each task evaluates through its own [`ApparentLongitude`]
//! engine, so the exact-JD rotation memos never cross threads. Single-task
//! batches run synchronously, and if the pool cannot be built the whole
//! batch falls back to the sequential path.

use rayon::prelude::*;

use crate::apparent::ApparentLongitude;
use crate::ephemeris::Ephemeris;
use crate::solver::{solve, RootTask};

/// Hard ceiling on worker threads.
const MAX_WORKERS: usize = 8;

/// Error strings travel single-line; collapse any embedded whitespace.
fn single_line(text: String) -> String {
    text.replace(['\t', '\r', '\n'], " ")
}

fn solve_one(eph: &dyn Ephemeris, task: &RootTask) -> (f64, String) {
    let engine = ApparentLongitude::new(eph);
    match solve(&engine, task) {
        Ok(root) => (root, String::new()),
        Err(e) => (f64::NAN, single_line(e.to_string())),
    }
}

fn unzip_results(pairs: Vec<(f64, String)>) -> (Vec<f64>, Vec<String>) {
    pairs.into_iter().unzip()
}

/// Solves a batch of root tasks, preserving input order.
pub fn solve_roots(eph: &dyn Ephemeris, tasks: &[RootTask]) -> (Vec<f64>, Vec<String>) {
    if tasks.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let run_serial =
        || unzip_results(tasks.iter().map(|task| solve_one(eph, task)).collect());

    if tasks.len() == 1 {
        return run_serial();
    }

    let workers = num_cpus::get().min(tasks.len()).min(MAX_WORKERS).max(1);
    if workers <= 1 {
        return run_serial();
    }

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool,
        Err(e) => {
            log::warn!("root batch worker pool unavailable ({e}); solving sequentially");
            return run_serial();
        }
    };

    log::debug!("solving {} root tasks on {workers} workers", tasks.len());
    let pairs: Vec<(f64, String)> =
        pool.install(|| tasks.par_iter().map(|task| solve_one(eph, task)).collect());
    unzip_results(pairs)
}
