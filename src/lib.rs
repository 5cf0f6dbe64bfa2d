//! Anytime heuristic for the symmetric Traveling Salesman Problem.
//!
//! Builds a good closed tour over a complete weighted graph within a
//! wall-clock budget:
//!
//! - **Construction** ([`construct`]): nearest-neighbor from a given start
//!   vertex, breaking near-ties uniformly at random.
//! - **Improvement** ([`improve`]): 2-opt local search, first improvement
//!   with restart, to a 2-opt local optimum.
//! - **Restarts** ([`restart`]): repeats construct+improve from random
//!   start vertices until a deadline or a restart cap, keeping the best
//!   tour and streaming per-restart telemetry into an injected sink.
//!
//! Supporting modules parse and emit the edge-list instance format
//! ([`instance`]), solve tiny instances exactly ([`exact`]), compute the
//! 1-tree lower bound ([`bound`]) and generate synthetic benchmark
//! instances ([`generate`]).
//!
//! # Example
//!
//! ```
//! use u_tsp::instance::Instance;
//! use u_tsp::restart::{RestartConfig, RestartRunner};
//!
//! let inst = Instance::parse("3 3\na b 3.0\nb c 4.2\na c 5.4\n").unwrap();
//! let config = RestartConfig::default().with_seed(412);
//! let result = RestartRunner::run(inst.matrix(), &config);
//! assert_eq!(
//!     inst.format_solution(result.best_cost, &result.best_tour),
//!     "12.6000\na b c a"
//! );
//! ```

pub mod bound;
pub mod construct;
pub mod distance;
pub mod error;
pub mod exact;
pub mod generate;
pub mod improve;
pub mod instance;
pub mod restart;

pub use error::{TspError, TspResult};

/// Tolerance for every floating-point cost comparison.
pub const EPSILON: f64 = 1e-12;
