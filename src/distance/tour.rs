//! Closed-tour helpers.

use super::DistanceMatrix;

/// Total length of a tour: the sum of `d(tour[k], tour[k + 1])`.
///
/// The tour is expected in closed form (first vertex repeated at the
/// end), so no wrap-around edge is added.
pub fn tour_cost(dm: &DistanceMatrix, tour: &[usize]) -> f64 {
    tour.windows(2).map(|w| dm.get(w[0], w[1])).sum()
}

/// Returns `true` if `tour` is a closed Hamiltonian cycle over `0..n`.
///
/// For `n == 0` only the empty tour qualifies.
pub fn is_closed_tour(tour: &[usize], n: usize) -> bool {
    if n == 0 {
        return tour.is_empty();
    }
    if tour.len() != n + 1 || tour[0] != tour[n] {
        return false;
    }
    let mut seen = vec![false; n];
    for &v in &tour[..n] {
        if v >= n || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}
