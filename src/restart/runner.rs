//! Anytime restart scheduler.
//!
//! # Algorithm
//!
//! 1. Seed one generator; it drives the start-vertex draw and every
//!    nearest-neighbor tie-break, so a fixed seed with enough time gives a
//!    reproducible run.
//! 2. Start vertices: 0 first, then `min(max_restarts - 1, n - 1)` others
//!    drawn without replacement from `1..n`.
//! 3. Before each restart, stop if the deadline has passed or the cancel
//!    flag is set. A restart in progress always completes.
//! 4. Construct, improve, and keep the tour if it beats the best by more
//!    than ε. Emit one [`RestartRecord`] per restart.
//! 5. If no restart completed, run one construct+improve from vertex 0
//!    regardless of time, so a valid tour is always returned.

use super::config::RestartConfig;
use super::record::RestartRecord;
use super::sink::{NullSink, RestartSink};
use crate::construct::nearest_neighbor;
use crate::distance::{tour_cost, DistanceMatrix};
use crate::improve::two_opt_in_place;
use crate::EPSILON;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a restart run.
#[derive(Debug, Clone)]
pub struct RestartResult {
    /// Best closed tour found (`n + 1` entries, empty for `n == 0`).
    pub best_tour: Vec<usize>,

    /// Cost of `best_tour`.
    pub best_cost: f64,

    /// Number of restarts that completed before the deadline.
    pub restarts: usize,

    /// Whether the result came from the forced fallback because no
    /// restart completed in time.
    pub fallback: bool,

    /// Whether the run was cancelled externally or, for the parallel
    /// runner, cut short by the deadline.
    pub cancelled: bool,

    /// Wall-clock time of the whole run, fallback included.
    pub elapsed: Duration,

    /// Best cost after each completed restart.
    pub cost_history: Vec<f64>,
}

impl RestartResult {
    pub(super) fn empty(elapsed: Duration) -> Self {
        Self {
            best_tour: Vec::new(),
            best_cost: 0.0,
            restarts: 0,
            fallback: false,
            cancelled: false,
            elapsed,
            cost_history: Vec::new(),
        }
    }
}

/// Executes nearest-neighbor + 2-opt restarts under a time budget.
///
/// # Usage
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::restart::{RestartConfig, RestartRunner};
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .unwrap();
/// let config = RestartConfig::default().with_max_restarts(4).with_seed(412);
/// let result = RestartRunner::run(&dm, &config);
/// assert!((result.best_cost - 80.0).abs() < 1e-9);
/// ```
pub struct RestartRunner;

impl RestartRunner {
    /// Runs the scheduler, discarding telemetry.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`RestartConfig::validate`] first to get a descriptive error).
    pub fn run(dm: &DistanceMatrix, config: &RestartConfig) -> RestartResult {
        Self::run_with_sink(dm, config, &mut NullSink, None)
    }

    /// Runs the scheduler, appending one record per restart to `sink`.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, no further
    /// restarts are issued; the best tour so far (or the fallback tour)
    /// is returned.
    #[tracing::instrument(level = "info", skip_all, fields(n = dm.size()))]
    pub fn run_with_sink(
        dm: &DistanceMatrix,
        config: &RestartConfig,
        sink: &mut dyn RestartSink,
        cancel: Option<Arc<AtomicBool>>,
    ) -> RestartResult {
        config.validate().expect("invalid RestartConfig");

        let started = Instant::now();
        let deadline = started + Duration::from_millis(config.time_limit_ms);
        let n = dm.size();
        if n == 0 {
            return RestartResult::empty(started.elapsed());
        }

        let seed = resolve_seed(config.seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let starts = start_vertices(n, config.max_restarts, &mut rng);
        tracing::debug!(seed, restarts = starts.len(), "restart schedule drawn");

        let mut best_cost = f64::INFINITY;
        let mut best_tour: Vec<usize> = Vec::new();
        let mut cost_history = Vec::with_capacity(starts.len());
        let mut cancelled = false;

        for (restart, &start) in starts.iter().enumerate() {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if Instant::now() >= deadline {
                break;
            }

            let (before, after, tour) = construct_and_improve(dm, start, &mut rng, None);
            if after < best_cost - EPSILON {
                best_cost = after;
                best_tour = tour;
            }
            cost_history.push(best_cost);

            let record = RestartRecord::new(
                started.elapsed(),
                restart,
                start,
                before,
                after,
                best_cost,
                n,
            );
            tracing::debug!(
                restart,
                start,
                before,
                after,
                best = best_cost,
                "restart complete"
            );
            sink.append(&record);
        }

        let restarts = cost_history.len();
        let fallback = restarts == 0;
        if fallback {
            tracing::warn!(
                time_limit_ms = config.time_limit_ms,
                "no restart completed before the deadline; running forced fallback"
            );
            let (_, after, tour) = construct_and_improve(dm, 0, &mut rng, None);
            best_cost = after;
            best_tour = tour;
        }

        let elapsed = started.elapsed();
        tracing::info!(
            best_cost,
            restarts,
            fallback,
            elapsed_ms = elapsed.as_millis() as u64,
            "restart run finished"
        );

        RestartResult {
            best_tour,
            best_cost,
            restarts,
            fallback,
            cancelled,
            elapsed,
            cost_history,
        }
    }
}

/// Uses the configured seed or draws a fresh one.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Vertex 0 followed by `min(max_restarts - 1, n - 1)` distinct vertices
/// drawn from `1..n`.
pub(crate) fn start_vertices<R: Rng + ?Sized>(
    n: usize,
    max_restarts: usize,
    rng: &mut R,
) -> Vec<usize> {
    if n == 0 || max_restarts == 0 {
        return Vec::new();
    }
    let extra = (max_restarts - 1).min(n - 1);
    let mut starts = Vec::with_capacity(extra + 1);
    starts.push(0);
    starts.extend(
        rand::seq::index::sample(rng, n - 1, extra)
            .into_iter()
            .map(|v| v + 1),
    );
    starts
}

/// One restart: nearest-neighbor from `start`, then 2-opt.
///
/// Returns `(cost_before, cost_after, tour)`.
pub(crate) fn construct_and_improve<R: Rng + ?Sized>(
    dm: &DistanceMatrix,
    start: usize,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> (f64, f64, Vec<usize>) {
    let (before, mut tour) = nearest_neighbor(dm, start, rng);
    two_opt_in_place(dm, &mut tour, cancel);
    let after = tour_cost(dm, &tour);
    (before, after, tour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::is_closed_tour;

    fn scenario_a() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 3.0, 5.4],
            vec![3.0, 0.0, 4.2],
            vec![5.4, 4.2, 0.0],
        ])
        .expect("valid")
    }

    fn scenario_b() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid")
    }

    fn ring(n: usize) -> DistanceMatrix {
        // Points on a slightly irregular circle, listed out of order.
        let points: Vec<(f64, f64)> = (0..n)
            .map(|k| {
                let i = (k * 7) % n;
                let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                let r = 1.0 + 0.05 * ((i * 13 % 5) as f64);
                (r * angle.cos(), r * angle.sin())
            })
            .collect();
        DistanceMatrix::from_points(&points)
    }

    fn generous() -> RestartConfig {
        RestartConfig::default()
            .with_time_limit_ms(60_000)
            .with_seed(412)
    }

    #[test]
    fn test_scenario_a() {
        let dm = scenario_a();
        let result = RestartRunner::run(&dm, &generous());
        assert!((result.best_cost - 12.6).abs() < 1e-9);
        assert!(is_closed_tour(&result.best_tour, 3));
        assert_eq!(format!("{:.4}", result.best_cost), "12.6000");
    }

    #[test]
    fn test_scenario_b_reaches_optimum() {
        let dm = scenario_b();
        let config = generous().with_max_restarts(4);
        let result = RestartRunner::run(&dm, &config);
        assert!((result.best_cost - 80.0).abs() < 1e-9);
        assert_eq!(result.restarts, 4);
    }

    #[test]
    fn test_single_vertex() {
        let dm = DistanceMatrix::from_rows(&[vec![0.0]]).expect("valid");
        let result = RestartRunner::run(&dm, &generous());
        assert_eq!(result.best_tour, vec![0, 0]);
        assert_eq!(result.best_cost, 0.0);
        assert_eq!(result.restarts, 1);
    }

    #[test]
    fn test_two_vertices() {
        let dm = DistanceMatrix::from_rows(&[vec![0.0, 4.5], vec![4.5, 0.0]]).expect("valid");
        let result = RestartRunner::run(&dm, &generous());
        assert_eq!(result.best_tour, vec![0, 1, 0]);
        assert!((result.best_cost - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_instance() {
        let dm = DistanceMatrix::from_rows(&[]).expect("valid");
        let result = RestartRunner::run(&dm, &generous());
        assert!(result.best_tour.is_empty());
        assert_eq!(result.best_cost, 0.0);
        assert_eq!(result.restarts, 0);
        assert!(!result.fallback);
    }

    #[test]
    fn test_zero_budget_forces_fallback() {
        let dm = ring(30);
        let config = generous().with_time_limit_ms(0);
        let mut records: Vec<RestartRecord> = Vec::new();
        let result = RestartRunner::run_with_sink(&dm, &config, &mut records, None);
        assert!(result.fallback);
        assert_eq!(result.restarts, 0);
        assert!(records.is_empty());
        assert!(is_closed_tour(&result.best_tour, 30));
        assert_eq!(result.best_tour[0], 0);
        assert!((tour_cost(&dm, &result.best_tour) - result.best_cost).abs() < 1e-9);
    }

    #[test]
    fn test_cancelled_before_start_still_returns_tour() {
        let dm = ring(12);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = RestartRunner::run_with_sink(&dm, &generous(), &mut NullSink, Some(cancel));
        assert!(result.cancelled);
        assert!(result.fallback);
        assert!(is_closed_tour(&result.best_tour, 12));
    }

    #[test]
    fn test_records_consistent_with_result() {
        let dm = ring(25);
        let config = generous().with_max_restarts(10);
        let mut records: Vec<RestartRecord> = Vec::new();
        let result = RestartRunner::run_with_sink(&dm, &config, &mut records, None);

        assert_eq!(records.len(), 10);
        assert_eq!(records[0].start_vertex, 0);
        let mut starts: Vec<usize> = records.iter().map(|r| r.start_vertex).collect();
        starts.sort_unstable();
        starts.dedup();
        assert_eq!(starts.len(), 10, "start vertices must be distinct");

        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.restart, i);
            assert!(r.cost_after <= r.cost_before + EPSILON);
            assert!(result.best_cost <= r.cost_after + EPSILON);
            assert!((r.best_per_vertex - r.best_so_far / 25.0).abs() < 1e-12);
        }
        assert!((records[9].best_so_far - result.best_cost).abs() < 1e-12);
    }

    fn octagon() -> DistanceMatrix {
        let points: Vec<(f64, f64)> = (0..8)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / 8.0;
                (angle.cos(), angle.sin())
            })
            .collect();
        DistanceMatrix::from_points(&points)
    }

    #[test]
    fn test_ties_keep_first_restart() {
        for dm in [scenario_a(), octagon()] {
            let mut records: Vec<RestartRecord> = Vec::new();
            let result = RestartRunner::run_with_sink(&dm, &generous(), &mut records, None);
            assert_eq!(result.restarts, dm.size());
            assert_eq!(result.best_tour[0], 0, "a tied later restart replaced the best");
            assert_eq!(result.best_cost, records[0].cost_after);
            for r in &records {
                assert!((r.cost_after - records[0].cost_after).abs() < EPSILON);
                assert_eq!(r.best_so_far, records[0].cost_after);
            }
        }
    }

    #[test]
    fn test_cost_history_non_increasing() {
        let dm = ring(20);
        let result = RestartRunner::run(&dm, &generous());
        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_reproducible_with_seed() {
        let dm = ring(40);
        let config = generous().with_max_restarts(8);
        let a = RestartRunner::run(&dm, &config);
        let b = RestartRunner::run(&dm, &config);
        assert_eq!(a.best_tour, b.best_tour);
        assert_eq!(a.best_cost, b.best_cost);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_restarts_capped_by_vertex_count() {
        let dm = scenario_b();
        let result = RestartRunner::run(&dm, &generous().with_max_restarts(50));
        assert_eq!(result.restarts, 4);
    }

    #[test]
    fn test_start_vertices() {
        let mut rng = StdRng::seed_from_u64(1);
        let starts = start_vertices(10, 4, &mut rng);
        assert_eq!(starts.len(), 4);
        assert_eq!(starts[0], 0);
        assert!(starts[1..].iter().all(|&v| (1..10).contains(&v)));

        assert_eq!(start_vertices(1, 5, &mut rng), vec![0]);
        assert!(start_vertices(0, 5, &mut rng).is_empty());
        assert_eq!(start_vertices(5, 1, &mut rng), vec![0]);
    }

    #[test]
    #[should_panic(expected = "invalid RestartConfig")]
    fn test_invalid_config_panics() {
        let dm = scenario_a();
        let _ = RestartRunner::run(&dm, &RestartConfig::default().with_max_restarts(0));
    }
}
