//! Run configuration, resolved from environment variables (and a `.env`
//! file if present).
//!
//! | Variable               | Default       | Meaning                               |
//! |------------------------|---------------|---------------------------------------|
//! | `EXPRBENCH_N`          | 100,000,000   | elements per array                    |
//! | `EXPRBENCH_SEED`       | unset         | unset: fresh data each run            |
//! | `EXPRBENCH_STRATEGIES` | all           | comma list of strategy keys           |
//! | `EXPRBENCH_BLOCK`      | 4096          | block size of the chunked strategy    |
//! | `EXPRBENCH_MATMUL`     | 1000x2000x3000| `MxNxP`, or `off` to skip matmul      |
//! | `EXPRBENCH_MATMUL_TILE`| 64            | tile edge of the tiled kernel         |
//! | `EXPRBENCH_FORMAT`     | `text`        | `text` or `json`                      |
//! | `EXPRBENCH_LOG_LEVEL`  | `info`        | log4rs level for stderr/file          |
//! | `EXPRBENCH_LOG_FILE`   | none          | optional log file path                |

use crate::error::{HarnessError, Result};
use crate::matmul::{MatmulShape, DEFAULT_SHAPE, DEFAULT_TILE};
use crate::report::OutputFormat;
use crate::strategy::chunked::DEFAULT_BLOCK;
use exprbench_core::parse_level_filter;
use log::LevelFilter;
use std::path::PathBuf;

pub const DEFAULT_N: usize = 100_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub n: usize,
    /// `None` draws fresh, non-reproducible
    /// inputs; `Some` makes every run see the same dataset.
    pub seed: Option<u64>,
    /// Strategy keys to run besides the reference; `None` runs all.
    pub strategies: Option<Vec<String>>,
    pub block: usize,
    /// `None` skips the matrix-multiplication group.
    pub matmul: Option<MatmulShape>,
    pub matmul_tile: usize,
    pub format: OutputFormat,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            seed: None,
            strategies: None,
            block: DEFAULT_BLOCK,
            matmul: Some(DEFAULT_SHAPE),
            matmul_tile: DEFAULT_TILE,
            format: OutputFormat::Text,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl BenchConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self> {
        check_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            n: resolve_positive("EXPRBENCH_N", get("EXPRBENCH_N"), DEFAULT_N)?,
            seed: resolve_seed(get("EXPRBENCH_SEED"))?,
            strategies: resolve_strategies(get("EXPRBENCH_STRATEGIES")),
            block: resolve_positive("EXPRBENCH_BLOCK", get("EXPRBENCH_BLOCK"), DEFAULT_BLOCK)?,
            matmul: resolve_matmul(get("EXPRBENCH_MATMUL"))?,
            matmul_tile: resolve_positive(
                "EXPRBENCH_MATMUL_TILE",
                get("EXPRBENCH_MATMUL_TILE"),
                DEFAULT_TILE,
            )?,
            format: resolve_format(get("EXPRBENCH_FORMAT"))?,
            log_level: resolve_log_level(get("EXPRBENCH_LOG_LEVEL"))?,
            log_file: resolve_log_file(get("EXPRBENCH_LOG_FILE")),
        })
    }
}

/// A missing `.env` is fine; one that exists but cannot be read or parsed
/// is a configuration error.
fn check_dotenv(result: std::result::Result<PathBuf, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(path) => {
            log::debug!("loaded {}", path.display());
            Ok(())
        }
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(HarnessError::invalid_argument(format!(
            "cannot load .env: {err}"
        ))),
    }
}

fn resolve_positive(name: &str, value: Option<String>, default: usize) -> Result<usize> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.replace('_', "").parse::<usize>() {
        Ok(0) => Err(HarnessError::invalid_argument(format!(
            "{name} must be positive"
        ))),
        Ok(n) => Ok(n),
        Err(_) => Err(HarnessError::invalid_argument(format!(
            "{name} is not a number: '{value}'"
        ))),
    }
}

fn resolve_matmul(value: Option<String>) -> Result<Option<MatmulShape>> {
    match value {
        None => Ok(Some(DEFAULT_SHAPE)),
        Some(v) if v.eq_ignore_ascii_case("off") => Ok(None),
        Some(v) => MatmulShape::parse(&v).map(Some),
    }
}

fn resolve_seed(value: Option<String>) -> Result<Option<u64>> {
    value
        .map(|v| {
            v.parse::<u64>().map_err(|_| {
                HarnessError::invalid_argument(format!("EXPRBENCH_SEED is not a u64: '{v}'"))
            })
        })
        .transpose()
}

fn resolve_strategies(value: Option<String>) -> Option<Vec<String>> {
    value.map(|v| {
        v.split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    })
}

fn resolve_format(value: Option<String>) -> Result<OutputFormat> {
    match value {
        None => Ok(OutputFormat::Text),
        Some(v) => OutputFormat::parse(&v).ok_or_else(|| {
            HarnessError::invalid_argument(format!("EXPRBENCH_FORMAT must be text or json: '{v}'"))
        }),
    }
}

fn resolve_log_level(value: Option<String>) -> Result<LevelFilter> {
    match value {
        None => Ok(LevelFilter::Info),
        Some(v) => parse_level_filter(&v).ok_or_else(|| {
            HarnessError::invalid_argument(format!("EXPRBENCH_LOG_LEVEL is not a level: '{v}'"))
        }),
    }
}

fn resolve_log_file(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.eq_ignore_ascii_case("none"))
}
