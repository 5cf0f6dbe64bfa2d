//! Anytime restart scheduler.
//!
//! Repeats nearest-neighbor construction followed by 2-opt from varied
//! start vertices until a wall-clock budget or a restart cap is reached,
//! keeping the best tour seen. Each completed restart produces a
//! [`RestartRecord`] that is handed to an injected [`RestartSink`]; the
//! scheduler itself does no formatting or I/O.
//!
//! The deadline is only polled between restarts, so the run may overshoot
//! the budget by one restart. If not a single restart fits in the budget,
//! one forced construct+improve from vertex 0 still produces a valid tour.
//!
//! With the `parallel` feature, [`RestartRunner::run_parallel`] spreads the
//! restarts over the rayon pool.

mod config;
#[cfg(feature = "parallel")]
mod parallel;
mod record;
mod runner;
mod sink;

pub use config::RestartConfig;
pub use record::RestartRecord;
pub use runner::{RestartResult, RestartRunner};
pub use sink::{CsvSink, NullSink, RestartSink, CSV_HEADER};
