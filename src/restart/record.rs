//! Per-restart telemetry record.

use crate::EPSILON;
use std::time::Duration;

/// One entry per completed restart, emitted in restart order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestartRecord {
    /// Time since the run started, measured when the restart completed.
    pub elapsed: Duration,
    /// Zero-based restart index.
    pub restart: usize,
    /// Start vertex of the nearest-neighbor construction.
    pub start_vertex: usize,
    /// Cost of the constructed tour.
    pub cost_before: f64,
    /// Cost after 2-opt.
    pub cost_after: f64,
    /// `cost_before - cost_after`.
    pub improvement: f64,
    /// `improvement / cost_before`, or 0 when `cost_before` is 0.
    pub improvement_ratio: f64,
    /// The constructed tour was already 2-opt optimal.
    pub already_optimal: bool,
    /// Best cost over all restarts so far, this one included.
    pub best_so_far: f64,
    /// `best_so_far / n`.
    pub best_per_vertex: f64,
}

impl RestartRecord {
    /// Derives the computed fields from the raw measurements.
    pub(crate) fn new(
        elapsed: Duration,
        restart: usize,
        start_vertex: usize,
        cost_before: f64,
        cost_after: f64,
        best_so_far: f64,
        n: usize,
    ) -> Self {
        let improvement = cost_before - cost_after;
        let improvement_ratio = if cost_before > 0.0 {
            improvement / cost_before
        } else {
            0.0
        };
        Self {
            elapsed,
            restart,
            start_vertex,
            cost_before,
            cost_after,
            improvement,
            improvement_ratio,
            already_optimal: cost_after >= cost_before - EPSILON,
            best_so_far,
            best_per_vertex: if n > 0 { best_so_far / n as f64 } else { 0.0 },
        }
    }
}
