//! Evaluation strategies and the common `Strategy` trait.
//!
//! Four implementations are provided:
//! - [`scalar::ScalarLoop`]: indexed `for` loop, used as the reference
//! - [`iterator::IteratorZip`]: `zip` + closure over input and output slices
//! - [`chunked::Chunked`]: fixed-size blocks via `chunks_exact`
//! - [`array::NdarrayZip`]: `ndarray::Zip` over array views

pub mod array;
pub mod chunked;
pub mod iterator;
pub mod scalar;

use crate::error::{HarnessError, Result};
use crate::expression::Expression;

/// One way of evaluating an [`Expression`] over whole arrays.
///
/// Implementations write `expr.apply(x[i], y[i])` into `out[i]` for every
/// `i`. They may not reorder or fuse the arithmetic inside `apply`, since
/// outputs are compared bit for bit against the reference.
pub trait Strategy {
    /// Human-readable name for banners and error messages.
    fn name(&self) -> &'static str;

    /// Short lowercase key used for selection from configuration.
    fn key(&self) -> &'static str;

    /// Name plus any tuning parameters, for logs.
    fn describe(&self) -> String {
        self.name().to_string()
    }

    fn evaluate(&self, expr: Expression, x: &[f64], y: &[f64], out: &mut [f64]) -> Result<()>;
}

/// Reject inputs whose lengths disagree with each other or with `out`.
pub fn check_lengths(
    strategy: &dyn Strategy,
    expr: Expression,
    x: &[f64],
    y: &[f64],
    out: &[f64],
) -> Result<()> {
    if x.len() == y.len() && x.len() == out.len() {
        return Ok(());
    }
    Err(HarnessError::Strategy {
        strategy: strategy.name().to_string(),
        expression: expr.name(),
        reason: format!(
            "length mismatch: x={}, y={}, out={}",
            x.len(),
            y.len(),
            out.len()
        ),
    })
}

/// All strategies with default tuning, reference first.
pub fn registry() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(scalar::ScalarLoop),
        Box::new(iterator::IteratorZip),
        Box::new(chunked::Chunked::default()),
        Box::new(array::NdarrayZip),
    ]
}

/// Same as [`registry`] with an explicit block size for [`chunked::Chunked`].
pub fn registry_with_block(block: usize) -> Result<Vec<Box<dyn Strategy>>> {
    Ok(vec![
        Box::new(scalar::ScalarLoop),
        Box::new(iterator::IteratorZip),
        Box::new(chunked::Chunked::new(block)?),
        Box::new(array::NdarrayZip),
    ])
}

/// Keys accepted by [`select`].
pub fn known_keys() -> Vec<&'static str> {
    registry().iter().map(|s| s.key()).collect()
}

/// The reference strategy followed by the requested alternatives, in
/// registry order. `None` selects everything.
pub fn select(keys: Option<&[String]>, block: usize) -> Result<Vec<Box<dyn Strategy>>> {
    let all = registry_with_block(block)?;
    let Some(keys) = keys else {
        return Ok(all);
    };

    let known = known_keys();
    if let Some(unknown) = keys.iter().find(|k| !known.contains(&k.as_str())) {
        return Err(HarnessError::invalid_argument(format!(
            "unknown strategy '{unknown}' (expected one of: {})",
            known.join(", ")
        )));
    }

    Ok(all
        .into_iter()
        .enumerate()
        .filter(|(i, s)| *i == 0 || keys.iter().any(|k| k == s.key()))
        .map(|(_, s)| s)
        .collect())
}
