//! Error types.
//!
//! Only the collaborators around the solver can fail: parsing an
//! instance, validating an explicit matrix, and refusing exact search on
//! instances that are too large. The heuristic core never returns an
//! error on a valid [`DistanceMatrix`](crate::distance::DistanceMatrix).

use thiserror::Error;

/// Result type alias for fallible u-tsp operations.
pub type TspResult<T> = Result<T, TspError>;

/// Error type for instance construction and the exact solver.
#[derive(Debug, Error)]
pub enum TspError {
    /// Structurally invalid edge-list input.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput {
        /// 1-based input line where the problem was detected
        /// (0 when the problem only shows after reading everything).
        line: usize,
        /// Human-readable description.
        reason: String,
    },

    /// An explicit matrix violates the distance model invariants.
    #[error("invalid distance matrix: {0}")]
    InvalidMatrix(String),

    /// Instance too large for exhaustive enumeration.
    #[error("instance with {n} vertices exceeds the exact solver limit of {max}")]
    TooLarge {
        /// Number of vertices in the instance.
        n: usize,
        /// Largest supported size.
        max: usize,
    },

    /// I/O failure while reading an instance.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TspError {
    /// Creates a [`TspError::MalformedInput`] for the given line.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}
