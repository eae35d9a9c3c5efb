//! Timing and throughput.

use crate::error::{HarnessError, Result};
use crate::expression::{Expression, WORKING_SET_ARRAYS};
use crate::strategy::Strategy;
use serde::Serialize;
use std::hint::black_box;
use std::time::{Duration, Instant};

const BYTES_PER_GB: f64 = (1u64 << 30) as f64;
const FLOP_PER_GFLOP: f64 = 1e9;

/// Shortest duration reported; a run faster than the clock resolution is
/// rounded up to this rather than producing an infinite throughput.
pub const MIN_ELAPSED: Duration = Duration::from_nanos(1);

/// Timing result for one (strategy, expression) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub strategy: String,
    pub expression: Expression,
    pub elapsed_seconds: f64,
    pub working_set_bytes: u64,
    pub throughput_gbps: f64,
}

impl Measurement {
    pub fn new(
        strategy: &str,
        expression: Expression,
        elapsed: Duration,
        working_set_bytes: u64,
    ) -> Result<Self> {
        let elapsed_seconds = elapsed.max(MIN_ELAPSED).as_secs_f64();
        Ok(Self {
            strategy: strategy.to_string(),
            expression,
            elapsed_seconds,
            working_set_bytes,
            throughput_gbps: throughput(working_set_bytes as f64, elapsed_seconds)?,
        })
    }
}

/// Bytes touched by one evaluation over `n` elements of `f64`. Computed in
/// `u64` so 32-bit targets cannot wrap.
pub fn working_set_bytes(n: usize) -> Result<u64> {
    let per_element = (WORKING_SET_ARRAYS * std::mem::size_of::<f64>()) as u64;
    (n as u64).checked_mul(per_element).ok_or_else(|| {
        HarnessError::invalid_argument(format!("working set of {n} elements overflows u64"))
    })
}

/// `bytes / 2^30 / seconds`. Zero, negative or non-finite inputs are
/// rejected instead of yielding an infinite or negative rate.
pub fn throughput(working_set_bytes: f64, elapsed_seconds: f64) -> Result<f64> {
    if !(elapsed_seconds.is_finite() && elapsed_seconds > 0.0) {
        return Err(HarnessError::invalid_argument(format!(
            "elapsed time must be positive, got {elapsed_seconds}"
        )));
    }
    if !(working_set_bytes.is_finite() && working_set_bytes > 0.0) {
        return Err(HarnessError::invalid_argument(format!(
            "working set must be positive, got {working_set_bytes}"
        )));
    }
    Ok(working_set_bytes / BYTES_PER_GB / elapsed_seconds)
}

/// `flop / 1e9 / seconds`, with the same argument checks as [`throughput`].
pub fn gflops(flop: f64, elapsed_seconds: f64) -> Result<f64> {
    if !(elapsed_seconds.is_finite() && elapsed_seconds > 0.0) {
        return Err(HarnessError::invalid_argument(format!(
            "elapsed time must be positive, got {elapsed_seconds}"
        )));
    }
    if !(flop.is_finite() && flop > 0.0) {
        return Err(HarnessError::invalid_argument(format!(
            "flop count must be positive, got {flop}"
        )));
    }
    Ok(flop / FLOP_PER_GFLOP / elapsed_seconds)
}

/// Zeroed output buffer whose pages are already mapped.
///
/// `vec![0.0; n]` comes from `calloc`, which for large sizes returns
/// untouched pages; the first write to each page would then fault inside
/// the timed region. `black_box` hides the known-zero contents so the fill
/// is not optimised away.
pub fn output_buffer(n: usize) -> Vec<f64> {
    let mut out = black_box(vec![0.0f64; n]);
    out.fill(0.0);
    black_box(&mut out);
    out
}

/// Run `strategy` once and time only the evaluation call. The output buffer
/// is allocated and faulted in before the clock starts.
pub fn time_run(
    strategy: &dyn Strategy,
    expr: Expression,
    x: &[f64],
    y: &[f64],
) -> Result<(Vec<f64>, Duration)> {
    let mut out = output_buffer(x.len());

    let start = Instant::now();
    strategy.evaluate(expr, black_box(x), black_box(y), &mut out)?;
    let elapsed = start.elapsed();

    black_box(&out);
    Ok((out, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::scalar::ScalarLoop;

    #[test]
    fn one_gib_in_one_second() {
        assert_eq!(throughput(BYTES_PER_GB, 1.0).unwrap(), 1.0);
        assert_eq!(throughput(BYTES_PER_GB * 3.0, 0.5).unwrap(), 6.0);
    }

    #[test]
    fn degenerate_elapsed_is_rejected() {
        for t in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = throughput(1024.0, t).unwrap_err();
            assert!(matches!(err, HarnessError::InvalidArgument(_)), "t={t}");
        }
    }

    #[test]
    fn degenerate_bytes_are_rejected() {
        assert!(throughput(0.0, 1.0).is_err());
        assert!(throughput(-8.0, 1.0).is_err());
    }

    #[test]
    fn working_set_counts_three_f64_arrays() {
        assert_eq!(working_set_bytes(100_000_000).unwrap(), 2_400_000_000);
        assert_eq!(working_set_bytes(1).unwrap(), 24);
    }

    #[test]
    fn working_set_overflow_is_rejected() {
        // 200M elements = 4.8 GB, past u32::MAX
        assert_eq!(working_set_bytes(200_000_000).unwrap(), 4_800_000_000);
        if usize::BITS == 64 {
            // Past u64::MAX / 24 elements the byte count no longer fits.
            let err = working_set_bytes(usize::MAX).unwrap_err();
            assert!(matches!(err, HarnessError::InvalidArgument(_)));
        }
    }

    #[test]
    fn gflops_divides_by_1e9() {
        assert_eq!(gflops(12e9, 2.0).unwrap(), 6.0);
        assert!(gflops(12e9, 0.0).is_err());
        assert!(gflops(0.0, 1.0).is_err());
    }

    #[test]
    fn output_buffer_is_zeroed() {
        let out = output_buffer(10_000);
        assert_eq!(out.len(), 10_000);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_duration_is_clamped() {
        let m = Measurement::new("Scalar loop", Expression::Algebraic, Duration::ZERO, 24)
            .unwrap();
        assert_eq!(m.elapsed_seconds, 1e-9);
        assert!(m.throughput_gbps.is_finite());
    }

    #[test]
    fn time_run_returns_full_output() {
        let x = [3.0, 5.0];
        let y = [4.0, 12.0];
        let (out, _elapsed) = time_run(&ScalarLoop, Expression::Algebraic, &x, &y).unwrap();
        assert_eq!(out, vec![5.0, 13.0]);
    }

    #[test]
    fn time_run_propagates_strategy_failure() {
        let err = time_run(&ScalarLoop, Expression::Algebraic, &[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, HarnessError::Strategy { .. }));
    }
}
