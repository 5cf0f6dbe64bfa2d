//! Dense symmetric distance matrix.

use crate::error::{TspError, TspResult};

/// A dense n×n distance matrix stored in row-major order.
///
/// Invariants, checked by every public constructor:
///
/// - `get(i, i) == 0`
/// - `get(i, j) == get(j, i)`
/// - every entry is finite and non-negative
///
/// The matrix is immutable once handed out; solvers borrow it.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 3.0, 5.4],
///     vec![3.0, 0.0, 4.2],
///     vec![5.4, 4.2, 0.0],
/// ])
/// .expect("valid matrix");
/// assert_eq!(dm.size(), 3);
/// assert!((dm.get(1, 2) - 4.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates an all-zero matrix. Crate-internal: callers fill it via
    /// [`set_symmetric`](Self::set_symmetric) before exposing it.
    pub(crate) fn zeroed(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Writes `w` to both `(i, j)` and `(j, i)`.
    pub(crate) fn set_symmetric(&mut self, i: usize, j: usize, w: f64) {
        self.data[i * self.size + j] = w;
        self.data[j * self.size + i] = w;
    }

    /// Builds a matrix from explicit rows, validating every invariant.
    pub fn from_rows(rows: &[Vec<f64>]) -> TspResult<Self> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(TspError::InvalidMatrix(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
        }

        let mut dm = Self::zeroed(n);
        for i in 0..n {
            if rows[i][i] != 0.0 {
                return Err(TspError::InvalidMatrix(format!(
                    "diagonal entry ({i}, {i}) is {}, expected 0",
                    rows[i][i]
                )));
            }
            for j in (i + 1)..n {
                let w = rows[i][j];
                if !w.is_finite() || w < 0.0 {
                    return Err(TspError::InvalidMatrix(format!(
                        "entry ({i}, {j}) = {w} is not a finite non-negative weight"
                    )));
                }
                if rows[j][i] != w {
                    return Err(TspError::InvalidMatrix(format!(
                        "asymmetric entries ({i}, {j}) = {w} and ({j}, {i}) = {}",
                        rows[j][i]
                    )));
                }
                dm.set_symmetric(i, j, w);
            }
        }
        Ok(dm)
    }

    /// Computes a Euclidean distance matrix from 2-D points.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut dm = Self::zeroed(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let (xi, yi) = points[i];
                let (xj, yj) = points[j];
                dm.set_symmetric(i, j, (xi - xj).hypot(yi - yj));
            }
        }
        dm
    }

    /// Returns the distance between `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of vertices.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix has no vertices.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Row `i` as a slice of distances to every vertex.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }
}
