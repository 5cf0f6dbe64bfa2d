//! Parallel restarts on the rayon pool.
//!
//! Restarts are independent, so they are mapped over the pool and reduced
//! afterwards. Each restart owns a generator seeded from the run seed and
//! its restart index, which keeps every restart reproducible regardless
//! of completion order. A watcher thread raises a shared flag at the
//! deadline; 2-opt polls it at pass boundaries so in-flight work stops
//! early and returns its (valid) partially improved tour.

use super::config::RestartConfig;
use super::record::RestartRecord;
use super::runner::{construct_and_improve, resolve_seed, start_vertices, RestartResult};
use super::sink::{NullSink, RestartSink};
use super::RestartRunner;
use crate::distance::DistanceMatrix;
use crate::EPSILON;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Completed restart, as produced by a worker.
struct Outcome {
    restart: usize,
    start: usize,
    before: f64,
    after: f64,
    tour: Vec<usize>,
    elapsed: Duration,
}

/// Generator for one restart, derived from the run seed and restart index.
fn substream(seed: u64, restart: usize) -> StdRng {
    let mix = (restart as u64)
        .wrapping_add(1)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(seed ^ mix)
}

impl RestartRunner {
    /// Runs restarts in parallel, discarding telemetry.
    ///
    /// # Panics
    /// Panics if the configuration is invalid.
    pub fn run_parallel(dm: &DistanceMatrix, config: &RestartConfig) -> RestartResult {
        Self::run_parallel_with_sink(dm, config, &mut NullSink)
    }

    /// Runs restarts in parallel and emits their records in restart order
    /// once the pool has joined.
    ///
    /// With a budget large enough for every restart to finish, the result
    /// depends only on the seed: the best tour is the cheapest one, ties
    /// going to the lowest restart index.
    #[tracing::instrument(level = "info", skip_all, fields(n = dm.size()))]
    pub fn run_parallel_with_sink(
        dm: &DistanceMatrix,
        config: &RestartConfig,
        sink: &mut dyn RestartSink,
    ) -> RestartResult {
        config.validate().expect("invalid RestartConfig");

        let started = Instant::now();
        let deadline = started + Duration::from_millis(config.time_limit_ms);
        let n = dm.size();
        if n == 0 {
            return RestartResult::empty(started.elapsed());
        }

        let seed = resolve_seed(config.seed);
        let starts = start_vertices(n, config.max_restarts, &mut StdRng::seed_from_u64(seed));
        tracing::debug!(
            seed,
            restarts = starts.len(),
            threads = rayon::current_num_threads(),
            "parallel restart schedule drawn"
        );

        let cancel = AtomicBool::new(false);
        let done = AtomicBool::new(false);

        let mut outcomes: Vec<Outcome> = std::thread::scope(|scope| {
            let watcher = scope.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now >= deadline {
                        cancel.store(true, Ordering::Release);
                        break;
                    }
                    std::thread::park_timeout(deadline - now);
                }
            });

            let outcomes: Vec<Outcome> = starts
                .par_iter()
                .enumerate()
                .filter_map(|(restart, &start)| {
                    if cancel.load(Ordering::Acquire) || Instant::now() >= deadline {
                        return None;
                    }
                    let mut rng = substream(seed, restart);
                    let (before, after, tour) =
                        construct_and_improve(dm, start, &mut rng, Some(&cancel));
                    Some(Outcome {
                        restart,
                        start,
                        before,
                        after,
                        tour,
                        elapsed: started.elapsed(),
                    })
                })
                .collect();

            done.store(true, Ordering::Release);
            watcher.thread().unpark();
            outcomes
        });
        outcomes.sort_by_key(|o| o.restart);

        let cancelled = cancel.load(Ordering::Acquire);
        let restarts = outcomes.len();
        let mut best: Option<usize> = None;
        let mut cost_history = Vec::with_capacity(restarts);

        for (k, o) in outcomes.iter().enumerate() {
            // Lowest restart index wins ties.
            if best.is_none_or(|b| o.after < outcomes[b].after - EPSILON) {
                best = Some(k);
            }
            let best_cost = best.map_or(o.after, |b| outcomes[b].after);
            cost_history.push(best_cost);
            sink.append(&RestartRecord::new(
                o.elapsed, o.restart, o.start, o.before, o.after, best_cost, n,
            ));
        }

        let fallback = best.is_none();
        let (best_cost, best_tour) = match best {
            Some(b) => {
                let o = outcomes.swap_remove(b);
                (o.after, o.tour)
            }
            None => {
                tracing::warn!(
                    time_limit_ms = config.time_limit_ms,
                    "no parallel restart completed before the deadline; running forced fallback"
                );
                let (_, after, tour) = construct_and_improve(dm, 0, &mut substream(seed, 0), None);
                (after, tour)
            }
        };

        let elapsed = started.elapsed();
        tracing::info!(
            best_cost,
            restarts,
            fallback,
            cancelled,
            elapsed_ms = elapsed.as_millis() as u64,
            "parallel restart run finished"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{is_closed_tour, tour_cost};

    fn ring(n: usize) -> DistanceMatrix {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|k| {
                let i = (k * 11) % n;
                let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                let r = 1.0 + 0.03 * ((i * 7 % 4) as f64);
                (r * angle.cos(), r * angle.sin())
            })
            .collect();
        DistanceMatrix::from_points(&points)
    }

    fn generous() -> RestartConfig {
        RestartConfig::default()
            .with_time_limit_ms(60_000)
            .with_max_restarts(12)
            .with_seed(412)
    }

    #[test]
    fn test_parallel_valid_tour() {
        let dm = ring(30);
        let result = RestartRunner::run_parallel(&dm, &generous());
        assert!(is_closed_tour(&result.best_tour, 30));
        assert!((tour_cost(&dm, &result.best_tour) - result.best_cost).abs() < 1e-9);
        assert_eq!(result.restarts, 12);
        assert!(!result.fallback);
    }

    #[test]
    fn test_parallel_reproducible() {
        let dm = ring(35);
        let a = RestartRunner::run_parallel(&dm, &generous());
        let b = RestartRunner::run_parallel(&dm, &generous());
        assert_eq!(a.best_tour, b.best_tour);
        assert_eq!(a.best_cost, b.best_cost);
    }

    #[test]
    fn test_parallel_records_in_order() {
        let dm = ring(20);
        let mut records: Vec<RestartRecord> = Vec::new();
        let result = RestartRunner::run_parallel_with_sink(&dm, &generous(), &mut records);
        assert_eq!(records.len(), result.restarts);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.restart, i);
            assert!(r.cost_after <= r.cost_before + EPSILON);
            assert!(result.best_cost <= r.cost_after + EPSILON);
        }
        assert_eq!(records[0].start_vertex, 0);
    }

    #[test]
    fn test_parallel_ties_keep_first_restart() {
        let polygon: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / 10.0;
                (angle.cos(), angle.sin())
            })
            .collect();
        let dm = DistanceMatrix::from_points(&polygon);
        let mut records: Vec<RestartRecord> = Vec::new();
        let result = RestartRunner::run_parallel_with_sink(&dm, &generous(), &mut records);
        assert_eq!(result.restarts, 10);
        assert_eq!(result.best_tour[0], 0);
        assert_eq!(result.best_cost, records[0].cost_after);
        assert!(records.iter().all(|r| r.best_so_far == records[0].cost_after));
    }

    #[test]
    fn test_parallel_zero_budget_fallback() {
        let dm = ring(15);
        let config = generous().with_time_limit_ms(0);
        let result = RestartRunner::run_parallel(&dm, &config);
        assert!(result.fallback);
        assert_eq!(result.restarts, 0);
        assert!(is_closed_tour(&result.best_tour, 15));
    }

    #[test]
    fn test_substreams_differ() {
        use rand::Rng;
        let a: u64 = substream(412, 0).random();
        let b: u64 = substream(412, 1).random();
        assert_ne!(a, b);
    }
}
