//! Distance model.
//!
//! An immutable symmetric lookup over `n` indexed vertices, plus the
//! helpers that evaluate and validate closed tours against it.
//!
//! Tours are plain `Vec<usize>` in closed form: `n + 1` entries with the
//! start vertex repeated at the end.

mod matrix;
mod tour;

pub use matrix::DistanceMatrix;
pub use tour::{is_closed_tour, tour_cost};
