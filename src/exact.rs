//! Exhaustive TSP solver for tiny instances.
//!
//! Fixes vertex 0 as the root and enumerates the (n−1)! orders of the
//! remaining vertices in lexicographic order, keeping the strictly
//! cheapest cycle. Used as a correctness oracle for the heuristic; it
//! shares the heuristic's `(cost, closed tour)` contract.

use crate::distance::DistanceMatrix;
use crate::error::{TspError, TspResult};

/// Largest instance accepted by [`brute_force`] (11! ≈ 4·10⁷ cycles).
pub const MAX_EXACT_VERTICES: usize = 12;

/// Returns an optimal closed tour rooted at vertex 0 and its cost.
///
/// # Errors
///
/// [`TspError::TooLarge`] if the instance has more than
/// [`MAX_EXACT_VERTICES`] vertices.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
/// use u_tsp::exact::brute_force;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .unwrap();
/// let (cost, tour) = brute_force(&dm).unwrap();
/// assert_eq!(cost, 80.0);
/// assert_eq!(tour, vec![0, 1, 3, 2, 0]);
/// ```
pub fn brute_force(dm: &DistanceMatrix) -> TspResult<(f64, Vec<usize>)> {
    let n = dm.size();
    if n > MAX_EXACT_VERTICES {
        return Err(TspError::TooLarge {
            n,
            max: MAX_EXACT_VERTICES,
        });
    }
    match n {
        0 => return Ok((0.0, Vec::new())),
        1 => return Ok((0.0, vec![0, 0])),
        _ => {}
    }

    let mut perm: Vec<usize> = (1..n).collect();
    let mut best_cost = f64::INFINITY;
    let mut best_perm = perm.clone();

    loop {
        let cost = cycle_cost(dm, &perm);
        if cost < best_cost {
            best_cost = cost;
            best_perm.copy_from_slice(&perm);
        }
        if !next_permutation(&mut perm) {
            break;
        }
    }

    let mut tour = Vec::with_capacity(n + 1);
    tour.push(0);
    tour.extend_from_slice(&best_perm);
    tour.push(0);
    Ok((best_cost, tour))
}

/// Cost of the cycle `0 → perm[0] → … → perm[last] → 0`.
fn cycle_cost(dm: &DistanceMatrix, perm: &[usize]) -> f64 {
    let mut cost = dm.get(0, perm[0]);
    for w in perm.windows(2) {
        cost += dm.get(w[0], w[1]);
    }
    cost + dm.get(perm[perm.len() - 1], 0)
}

/// Advances `items` to the next lexicographic permutation.
///
/// Returns `false` (leaving `items` in its last order) when `items` is
/// already the last permutation.
fn next_permutation(items: &mut [usize]) -> bool {
    let Some(pivot) = items.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let successor = items
        .iter()
        .rposition(|&x| x > items[pivot])
        .expect("a larger element exists right of the pivot");
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{is_closed_tour, tour_cost};

    #[test]
    fn test_scenario_a() {
        let dm = DistanceMatrix::from_rows(&[
            vec![0.0, 3.0, 5.4],
            vec![3.0, 0.0, 4.2],
            vec![5.4, 4.2, 0.0],
        ])
        .expect("valid");
        let (cost, tour) = brute_force(&dm).expect("small");
        assert_eq!(format!("{cost:.4}"), "12.6000");
        assert_eq!(tour, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_matches_reported_cost() {
        let dm = DistanceMatrix::from_points(&[
            (0.0, 0.0),
            (4.0, 1.0),
            (1.0, 5.0),
            (6.0, 6.0),
            (3.0, 3.0),
            (7.0, 2.0),
            (2.0, 8.0),
        ]);
        let (cost, tour) = brute_force(&dm).expect("small");
        assert!(is_closed_tour(&tour, 7));
        assert!((tour_cost(&dm, &tour) - cost).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_sizes() {
        let empty = DistanceMatrix::from_rows(&[]).expect("valid");
        assert_eq!(brute_force(&empty).expect("ok"), (0.0, vec![]));

        let one = DistanceMatrix::from_rows(&[vec![0.0]]).expect("valid");
        assert_eq!(brute_force(&one).expect("ok"), (0.0, vec![0, 0]));

        let two = DistanceMatrix::from_rows(&[vec![0.0, 3.0], vec![3.0, 0.0]]).expect("valid");
        assert_eq!(brute_force(&two).expect("ok"), (6.0, vec![0, 1, 0]));
    }

    #[test]
    fn test_too_large() {
        let points: Vec<(f64, f64)> = (0..13).map(|i| (i as f64, 0.0)).collect();
        let dm = DistanceMatrix::from_points(&points);
        assert!(matches!(
            brute_force(&dm),
            Err(TspError::TooLarge { n: 13, max: 12 })
        ));
    }

    #[test]
    fn test_next_permutation_enumerates_all() {
        let mut items = vec![1, 2, 3, 4];
        let mut count = 1;
        while next_permutation(&mut items) {
            count += 1;
        }
        assert_eq!(count, 24);
        assert_eq!(items, vec![4, 3, 2, 1]);
    }
}
