//! Nearest-neighbor tour construction.
//!
//! # Algorithm
//!
//! Starting from `start`, repeatedly extend the path to the closest
//! unvisited vertex, then close the cycle back to `start`.
//!
//! Ties are resolved without scan-order bias: every unvisited vertex
//! within [`EPSILON`] of the scan minimum is collected and one is chosen
//! uniformly at random. The generator is only consulted when at least two
//! candidates tie, so instances without ties never touch it.
//!
//! # Complexity
//!
//! O(n²) time, O(n) extra space.

use crate::distance::DistanceMatrix;
use crate::EPSILON;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Builds a closed tour greedily from `start`.
///
/// Returns `(cost, tour)` where `tour` has `n + 1` entries beginning and
/// ending with `start`. An empty matrix yields `(0.0, [])`.
///
/// # Panics
///
/// Panics if `start >= dm.size()` on a non-empty matrix.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_tsp::construct::nearest_neighbor;
/// use u_tsp::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 3.0, 5.4],
///     vec![3.0, 0.0, 4.2],
///     vec![5.4, 4.2, 0.0],
/// ])
/// .unwrap();
/// let mut rng = StdRng::seed_from_u64(412);
/// let (cost, tour) = nearest_neighbor(&dm, 0, &mut rng);
/// assert_eq!(tour, vec![0, 1, 2, 0]);
/// assert!((cost - 12.6).abs() < 1e-9);
/// ```
pub fn nearest_neighbor<R: Rng + ?Sized>(
    dm: &DistanceMatrix,
    start: usize,
    rng: &mut R,
) -> (f64, Vec<usize>) {
    let n = dm.size();
    if n == 0 {
        return (0.0, Vec::new());
    }
    assert!(start < n, "start vertex {start} out of range for n = {n}");

    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n + 1);
    let mut ties: Vec<usize> = Vec::new();

    visited[start] = true;
    tour.push(start);
    let mut current = start;
    let mut cost = 0.0;

    for _ in 1..n {
        let row = dm.row(current);

        let mut min_dist = f64::INFINITY;
        for (v, &d) in row.iter().enumerate() {
            if !visited[v] && d < min_dist {
                min_dist = d;
            }
        }

        ties.clear();
        ties.extend(
            row.iter()
                .enumerate()
                .filter(|&(v, &d)| !visited[v] && d - min_dist <= EPSILON)
                .map(|(v, _)| v),
        );

        let next = if ties.len() == 1 {
            ties[0]
        } else {
            *ties
                .choose(&mut *rng)
                .expect("at least one unvisited vertex remains")
        };

        visited[next] = true;
        tour.push(next);
        cost += row[next];
        current = next;
    }

    cost += dm.get(current, start);
    tour.push(start);
    (cost, tour)
}
