//! 1-tree lower bound.
//!
//! A 1-tree rooted at `r` is a minimum spanning tree on every vertex
//! except `r`, plus the two cheapest edges incident to `r`. Every
//! Hamiltonian cycle is a 1-tree, so its weight bounds the optimal tour
//! from below; taking the maximum over all roots tightens the bound.
//!
//! The spanning tree uses the dense O(n²) form of Prim's algorithm, which
//! suits complete graphs better than a heap.
//!
//! # Reference
//!
//! Held, M. & Karp, R.M. (1970). "The traveling-salesman problem and
//! minimum spanning trees", *Operations Research* 18(6), 1138-1162.

use crate::distance::DistanceMatrix;

/// Weight of a minimum spanning tree over all vertices except `excluded`.
pub fn mst_cost_excluding(dm: &DistanceMatrix, excluded: Option<usize>) -> f64 {
    let n = dm.size();
    let mut in_tree = vec![false; n];
    if let Some(r) = excluded {
        in_tree[r] = true;
    }
    let Some(first) = (0..n).find(|&v| !in_tree[v]) else {
        return 0.0;
    };

    // Cheapest known edge from the tree to each outside vertex.
    let mut link = vec![f64::INFINITY; n];
    in_tree[first] = true;
    for v in 0..n {
        if !in_tree[v] {
            link[v] = dm.get(first, v);
        }
    }

    let mut total = 0.0;
    loop {
        let mut next = None;
        let mut best = f64::INFINITY;
        for v in 0..n {
            if !in_tree[v] && link[v] < best {
                best = link[v];
                next = Some(v);
            }
        }
        let Some(u) = next else {
            break;
        };

        in_tree[u] = true;
        total += best;
        for v in 0..n {
            if !in_tree[v] {
                link[v] = link[v].min(dm.get(u, v));
            }
        }
    }
    total
}

/// 1-tree weight for a single root.
///
/// Requires at least three vertices; smaller instances return the exact
/// optimum instead (0 for n ≤ 1, twice the single edge for n = 2).
///
/// # Panics
/// Panics if `root >= n` on a non-empty instance.
pub fn one_tree_bound(dm: &DistanceMatrix, root: usize) -> f64 {
    let n = dm.size();
    assert!(
        n == 0 || root < n,
        "root {root} out of range for n = {n}"
    );
    if n < 3 {
        return small_optimum(dm);
    }

    let mut first = f64::INFINITY;
    let mut second = f64::INFINITY;
    for v in (0..n).filter(|&v| v != root) {
        let w = dm.get(root, v);
        if w < first {
            second = first;
            first = w;
        } else if w < second {
            second = w;
        }
    }
    mst_cost_excluding(dm, Some(root)) + first + second
}

/// Maximum 1-tree weight over all roots.
///
/// # Examples
///
/// ```
/// use u_tsp::bound::one_tree_lower_bound;
/// use u_tsp::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .unwrap();
/// assert!(one_tree_lower_bound(&dm) <= 80.0);
/// ```
pub fn one_tree_lower_bound(dm: &DistanceMatrix) -> f64 {
    let n = dm.size();
    if n < 3 {
        return small_optimum(dm);
    }
    (0..n)
        .map(|root| one_tree_bound(dm, root))
        .fold(f64::NEG_INFINITY, f64::max)
}

fn small_optimum(dm: &DistanceMatrix) -> f64 {
    if dm.size() == 2 {
        2.0 * dm.get(0, 1)
    } else {
        0.0
    }
}
