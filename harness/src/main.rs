//! Benchmark runner: generates the dataset, runs every strategy and prints
//! one timing line per strategy and expression, then the matrix
//! multiplication group unless `EXPRBENCH_MATMUL=off`.
//!
//! Usage:
//!   cargo run --release
//!   EXPRBENCH_N=10_000_000 EXPRBENCH_SEED=42 cargo run --release
//!   EXPRBENCH_MATMUL=500x500x500 cargo run --release
//!
//! See `config.rs` for the full list of variables. Exits non-zero on the
//! first mismatch between a strategy and the reference.

use anyhow::{Context, Result};
use exprbench::config::BenchConfig;
use exprbench::dataset::generate;
use exprbench::harness;
use exprbench::matmul::{self, generate_matrices};
use exprbench::report::Reporter;
use exprbench::strategy;
use std::time::Instant;

fn main() -> Result<()> {
    let config = BenchConfig::from_env().context("invalid configuration")?;
    exprbench_core::initialize_logger(config.log_level, config.log_file.as_deref())?;

    log::info!(
        "exprbench {} (n={}, seed={}, format={:?})",
        env!("CARGO_PKG_VERSION"),
        config.n,
        config
            .seed
            .map_or_else(|| "fresh".to_string(), |s| s.to_string()),
        config.format
    );

    let strategies = strategy::select(config.strategies.as_deref(), config.block)?;
    let mut reporter = Reporter::stdout(config.format);

    let measurements = {
        let started = Instant::now();
        let dataset = generate(config.n, config.seed)
            .with_context(|| format!("failed to generate {} elements", config.n))?;
        log::info!("dataset ready in {:.2}s", started.elapsed().as_secs_f64());
        harness::run(&dataset, &strategies, &mut reporter)?
    };
    log::info!(
        "{} measurements, all strategies match the reference",
        measurements.len()
    );

    if let Some(shape) = config.matmul {
        let kernels = matmul::registry(config.matmul_tile)?;
        let started = Instant::now();
        let matrices = generate_matrices(shape, config.seed);
        log::info!("matrices ready in {:.2}s", started.elapsed().as_secs_f64());
        let measurements = harness::run_matmul(&matrices, &kernels, &mut reporter)?;
        log::info!(
            "{} matmul kernels, all match the naive product",
            measurements.len()
        );
    }
    Ok(())
}
