//! Elementwise Expression Benchmark
//!
//! Times several strategies for evaluating `sqrt(x² + y²)` and
//! `atan2(y, x)` over large `f64` arrays, reports wall-clock time and
//! throughput in GB/s, and checks that every strategy reproduces the
//! reference output bit for bit. A second group times dense matrix
//! multiplication kernels the same way and reports GFLOPS.
//!
//! Run the benchmark: `cargo run --release`
//! Run benches: `cargo bench`
//! Run tests: `cargo test`

pub mod config;
pub mod dataset;
pub mod error;
pub mod expression;
pub mod harness;
pub mod matmul;
pub mod measure;
pub mod report;
pub mod strategy;
pub mod verify;

pub use dataset::{generate, Dataset};
pub use error::{HarnessError, MismatchError};
pub use expression::Expression;
pub use measure::{throughput, time_run, Measurement};
pub use strategy::Strategy;
pub use verify::assert_equal;
