//! The benchmark sequence: baseline first, then every alternative strategy
//! timed, verified against the baseline and reported, in a fixed order.

use crate::dataset::Dataset;
use crate::error::{HarnessError, Result};
use crate::expression::Expression;
use crate::matmul::{MatmulMeasurement, MatmulStrategy, Matrices};
use crate::measure::{output_buffer, time_run, working_set_bytes, Measurement};
use crate::report::Reporter;
use crate::strategy::Strategy;
use crate::verify::assert_equal;
use std::hint::black_box;
use std::io::Write;
use std::time::{Duration, Instant};

/// Runtime banner printed before any timing line.
pub fn runtime_banner() -> String {
    format!("Rust version: {}", env!("EXPRBENCH_RUSTC_VERSION"))
}

fn strategy_banner(strategy: &dyn Strategy) -> String {
    format!("{} version:", strategy.name())
}

/// Output of the reference strategy for one expression.
struct Baseline {
    expression: Expression,
    values: Vec<f64>,
}

/// Run every strategy over `dataset`. The first strategy is the reference;
/// each later one must reproduce its outputs exactly. Stops at the first
/// error or mismatch.
pub fn run<W: Write>(
    dataset: &Dataset,
    strategies: &[Box<dyn Strategy>],
    reporter: &mut Reporter<W>,
) -> Result<Vec<Measurement>> {
    let Some((reference, alternatives)) = strategies.split_first() else {
        return Err(HarnessError::invalid_argument(
            "at least one strategy is required",
        ));
    };

    let (x, y) = (dataset.x(), dataset.y());
    let bytes = working_set_bytes(dataset.len())?;
    let mut measurements = Vec::with_capacity(strategies.len() * Expression::ALL.len());

    reporter.banner(&runtime_banner())?;

    log::info!(
        "baseline: {} over {} elements ({:.3} GiB working set, seed={})",
        reference.describe(),
        dataset.len(),
        bytes as f64 / (1u64 << 30) as f64,
        dataset
            .seed()
            .map_or_else(|| "none".to_string(), |s| s.to_string())
    );
    reporter.banner(&strategy_banner(reference.as_ref()))?;

    let mut baselines = Vec::with_capacity(Expression::ALL.len());
    for expr in Expression::ALL {
        let (values, elapsed) = time_run(reference.as_ref(), expr, x, y)?;
        let m = Measurement::new(reference.name(), expr, elapsed, bytes)?;
        reporter.measurement(&m)?;
        measurements.push(m);
        baselines.push(Baseline {
            expression: expr,
            values,
        });
    }

    for strategy in alternatives {
        log::info!("timing {}", strategy.describe());
        reporter.banner(&strategy_banner(strategy.as_ref()))?;

        for baseline in &baselines {
            let expr = baseline.expression;
            let (values, elapsed) = time_run(strategy.as_ref(), expr, x, y)?;

            assert_equal(&baseline.values, &values).map_err(|source| {
                log::error!(
                    "{} / {} disagrees with {}: {source}",
                    strategy.name(),
                    expr.name(),
                    reference.name()
                );
                HarnessError::Mismatch {
                    strategy: strategy.name().to_string(),
                    expression: expr.name(),
                    source,
                }
            })?;
            drop(values);

            let m = Measurement::new(strategy.name(), expr, elapsed, bytes)?;
            log::debug!(
                "{} / {}: {:.6}s, {:.3} GB/s",
                m.strategy,
                expr.name(),
                m.elapsed_seconds,
                m.throughput_gbps
            );
            reporter.measurement(&m)?;
            measurements.push(m);
        }
    }

    reporter.flush()?;
    Ok(measurements)
}

/// Time one matrix product into a pre-faulted, zeroed buffer.
pub fn time_matmul(
    strategy: &dyn MatmulStrategy,
    matrices: &Matrices,
) -> Result<(Vec<f64>, Duration)> {
    let shape = matrices.shape();
    let mut z = output_buffer(shape.z_len());

    let start = Instant::now();
    strategy.multiply(
        shape,
        black_box(matrices.x()),
        black_box(matrices.y()),
        &mut z,
    )?;
    let elapsed = start.elapsed();

    black_box(&z);
    Ok((z, elapsed))
}

/// Matrix-multiplication group: the first kernel is the reference, every
/// later one must reproduce it exactly. No runtime banner; this follows
/// [`run`] in the same report.
pub fn run_matmul<W: Write>(
    matrices: &Matrices,
    strategies: &[Box<dyn MatmulStrategy>],
    reporter: &mut Reporter<W>,
) -> Result<Vec<MatmulMeasurement>> {
    let Some((reference, alternatives)) = strategies.split_first() else {
        return Err(HarnessError::invalid_argument(
            "at least one matmul strategy is required",
        ));
    };
    let shape = matrices.shape();

    log::info!(
        "matmul baseline: {} on {shape} ({:.1} GFLOP)",
        reference.name(),
        shape.flop() / 1e9
    );
    reporter.banner(&format!("Matrix multiplication {shape}:"))?;

    let (z0, elapsed) = time_matmul(reference.as_ref(), matrices)?;
    let m = MatmulMeasurement::new(reference.as_ref(), shape, elapsed)?;
    reporter.matmul_measurement(&m)?;
    let mut measurements = vec![m];

    for strategy in alternatives {
        log::info!("timing {}", strategy.name());
        let (z, elapsed) = time_matmul(strategy.as_ref(), matrices)?;
        assert_equal(&z0, &z).map_err(|source| {
            log::error!(
                "{} disagrees with {}: {source}",
                strategy.name(),
                reference.name()
            );
            HarnessError::Mismatch {
                strategy: strategy.name().to_string(),
                expression: "matmul",
                source,
            }
        })?;
        drop(z);

        let m = MatmulMeasurement::new(strategy.as_ref(), shape, elapsed)?;
        reporter.matmul_measurement(&m)?;
        measurements.push(m);
    }

    reporter.flush()?;
    Ok(measurements)
}
