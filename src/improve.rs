//! 2-opt local search.
//!
//! # Algorithm
//!
//! The tour is treated as a cycle of `n` vertices `r[0..n]` (the closing
//! edge `r[n-1] → r[0]` is implicit). For every pair of non-adjacent
//! edges `(r[i], r[i+1])` and `(r[j], r[j+1 mod n])` with `i < j`:
//!
//! ```text
//! delta = d(a, c) + d(b, d) - d(a, b) - d(c, d)
//!         a = r[i], b = r[i+1], c = r[j], d = r[(j+1) mod n]
//! ```
//!
//! If `delta < -ε`, the segment `r[i+1..=j]` is reversed, which swaps
//! edges `(a,b)`/`(c,d)` for `(a,c)`/`(b,d)`, and the scan restarts from
//! the first pair (first-improvement-with-restart). The search stops when
//! a full scan accepts no move, i.e. at a 2-opt local optimum.
//!
//! Position 0 is never part of a reversed segment, so the start vertex
//! stays at both ends of the closed tour.
//!
//! # Complexity
//!
//! O(n²) per scan. The number of scans until convergence is small in
//! practice but not polynomially bounded in the worst case.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;
use crate::EPSILON;
use std::sync::atomic::{AtomicBool, Ordering};

/// Counters describing one 2-opt descent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoOptStats {
    /// Number of accepted segment reversals.
    pub moves: usize,
    /// Number of scans started (each accepted move starts a new scan).
    pub passes: usize,
    /// `false` if the descent was cut short by the cancel flag.
    pub converged: bool,
}

/// Improves a closed tour with 2-opt and returns the result.
///
/// The input is not modified. See [`two_opt_in_place`] for the in-place
/// variant with cooperative cancellation.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::{tour_cost, DistanceMatrix};
/// use u_tsp::improve::two_opt;
///
/// // Square visited in crossing order 0 → 2 → 1 → 3.
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let improved = two_opt(&dm, &[0, 2, 1, 3, 0]);
/// assert!((tour_cost(&dm, &improved) - 4.0).abs() < 1e-12);
/// ```
pub fn two_opt(dm: &DistanceMatrix, tour: &[usize]) -> Vec<usize> {
    let mut improved = tour.to_vec();
    two_opt_in_place(dm, &mut improved, None);
    improved
}

/// Runs 2-opt on a closed tour in place.
///
/// `cancel` is polled at the start of every scan; once it reads `true`
/// the descent stops and the (still valid) partially improved tour is
/// left in `tour`, with [`TwoOptStats::converged`] set to `false`.
///
/// Tours with fewer than four distinct vertices admit no non-adjacent
/// edge pair and are left untouched.
pub fn two_opt_in_place(
    dm: &DistanceMatrix,
    tour: &mut [usize],
    cancel: Option<&AtomicBool>,
) -> TwoOptStats {
    let mut stats = TwoOptStats::default();
    if tour.len() < 5 {
        stats.converged = true;
        return stats;
    }

    // Work on the open cycle; the closing vertex is tour[0] and never moves.
    let n = tour.len() - 1;
    let route = &mut tour[..n];

    'scan: loop {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return stats;
        }
        stats.passes += 1;

        for i in 0..n - 1 {
            let a = route[i];
            let b = route[i + 1];
            let d_ab = dm.get(a, b);

            for j in (i + 2)..n {
                // (r[0], r[1]) and (r[n-1], r[0]) share r[0].
                if i == 0 && j == n - 1 {
                    continue;
                }
                let c = route[j];
                let d = route[(j + 1) % n];

                let delta = dm.get(a, c) + dm.get(b, d) - (d_ab + dm.get(c, d));
                if delta < -EPSILON {
                    route[i + 1..=j].reverse();
                    stats.moves += 1;
                    continue 'scan;
                }
            }
        }

        stats.converged = true;
        return stats;
    }
}
