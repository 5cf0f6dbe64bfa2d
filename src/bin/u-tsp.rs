//! Command-line front end.
//!
//! ```text
//! u-tsp approx   [--input FILE] [--time-limit-ms MS] [--max-restarts K] [--seed S] [--log-series FILE]
//! u-tsp exact    [--input FILE]
//! u-tsp bound    [--input FILE]
//! u-tsp generate --out-dir DIR [--count N]
//! ```
//!
//! Instances are read from `--input` or stdin. Diagnostics go to stderr,
//! filtered by `RUST_LOG` (default `warn`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use u_tsp::bound::one_tree_lower_bound;
use u_tsp::exact::brute_force;
use u_tsp::generate::{suite_case, suite_file_name, SUITE_SIZE};
use u_tsp::instance::Instance;
use u_tsp::restart::{CsvSink, NullSink, RestartConfig, RestartResult, RestartRunner, RestartSink};

#[derive(Parser)]
#[command(name = "u-tsp", version, about = "Anytime TSP heuristic and companions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Nearest-neighbor + 2-opt with random restarts under a time budget.
    Approx {
        /// Instance file (stdin if omitted).
        #[arg(long)]
        input: Option<PathBuf>,

        /// Wall-clock budget in milliseconds.
        #[arg(long, default_value_t = 1900)]
        time_limit_ms: u64,

        /// Upper bound on the number of restarts.
        #[arg(long, default_value_t = 50)]
        max_restarts: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 412)]
        seed: u64,

        /// Write one CSV row per restart to this file.
        #[arg(long)]
        log_series: Option<PathBuf>,

        /// Run restarts on all cores.
        #[cfg(feature = "parallel")]
        #[arg(long)]
        parallel: bool,
    },

    /// Exhaustive search (small instances only).
    Exact {
        /// Instance file (stdin if omitted).
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// 1-tree lower bound on the optimal tour.
    Bound {
        /// Instance file (stdin if omitted).
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Writes the synthetic benchmark suite.
    Generate {
        /// Output directory, created if missing.
        #[arg(long)]
        out_dir: PathBuf,

        /// Number of cases, starting from case 1.
        #[arg(long, default_value_t = SUITE_SIZE)]
        count: usize,
    },
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_instance(input: Option<&Path>) -> Result<Instance> {
    match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Instance::from_reader(BufReader::new(file))
                .with_context(|| format!("reading instance {}", path.display()))
        }
        None => Instance::from_reader(io::stdin().lock()).context("reading instance from stdin"),
    }
}

#[cfg(feature = "parallel")]
fn solve(
    instance: &Instance,
    config: &RestartConfig,
    sink: &mut dyn RestartSink,
    parallel: bool,
) -> RestartResult {
    if parallel {
        return RestartRunner::run_parallel_with_sink(instance.matrix(), config, sink);
    }
    RestartRunner::run_with_sink(instance.matrix(), config, sink, None)
}

#[cfg(not(feature = "parallel"))]
fn solve(
    instance: &Instance,
    config: &RestartConfig,
    sink: &mut dyn RestartSink,
    _parallel: bool,
) -> RestartResult {
    RestartRunner::run_with_sink(instance.matrix(), config, sink, None)
}

fn approx(
    input: Option<&Path>,
    config: RestartConfig,
    log_series: Option<&Path>,
    parallel: bool,
) -> Result<()> {
    config.validate().map_err(anyhow::Error::msg)?;
    let instance = load_instance(input)?;

    let result = match log_series {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut sink = CsvSink::new(BufWriter::new(file));
            let result = solve(&instance, &config, &mut sink, parallel);
            sink.finish()
                .with_context(|| format!("writing restart log {}", path.display()))?;
            result
        }
        None => solve(&instance, &config, &mut NullSink, parallel),
    };

    tracing::info!(
        restarts = result.restarts,
        fallback = result.fallback,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "approximation finished"
    );
    println!(
        "{}",
        instance.format_solution(result.best_cost, &result.best_tour)
    );
    Ok(())
}

fn generate(out_dir: &Path, count: usize) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    for idx in 1..=count {
        let instance = suite_case(idx);
        let path = out_dir.join(suite_file_name(idx, instance.size()));
        fs::write(&path, instance.to_edge_list())
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), n = instance.size(), "case written");
    }
    println!("Generated {count} cases in {}", out_dir.display());
    Ok(())
}

fn main() -> Result<()> {
    enable_tracing();

    match Cli::parse().command {
        Command::Approx {
            input,
            time_limit_ms,
            max_restarts,
            seed,
            log_series,
            #[cfg(feature = "parallel")]
            parallel,
        } => {
            #[cfg(not(feature = "parallel"))]
            let parallel = false;
            let config = RestartConfig::default()
                .with_time_limit_ms(time_limit_ms)
                .with_max_restarts(max_restarts)
                .with_seed(seed);
            approx(input.as_deref(), config, log_series.as_deref(), parallel)
        }
        Command::Exact { input } => {
            let instance = load_instance(input.as_deref())?;
            let (cost, tour) = brute_force(instance.matrix())?;
            println!("{}", instance.format_solution(cost, &tour));
            Ok(())
        }
        Command::Bound { input } => {
            let instance = load_instance(input.as_deref())?;
            println!(
                "1-tree lower bound: {:.4}",
                one_tree_lower_bound(instance.matrix())
            );
            Ok(())
        }
        Command::Generate { out_dir, count } => generate(&out_dir, count),
    }
}
