//! Blocked evaluation: the arrays are walked in fixed-size chunks so each
//! block of inputs and outputs stays cache resident while it is processed.

use super::{check_lengths, Strategy};
use crate::error::{HarnessError, Result};
use crate::expression::Expression;

/// Elements per block (3 arrays x 4096 x 8 bytes = 96 KiB working set).
pub const DEFAULT_BLOCK: usize = 4096;

#[derive(Debug, Clone, Copy)]
pub struct Chunked {
    block: usize,
}

impl Chunked {
    pub fn new(block: usize) -> Result<Self> {
        if block == 0 {
            return Err(HarnessError::invalid_argument("block size must be positive"));
        }
        Ok(Self { block })
    }
}

impl Default for Chunked {
    fn default() -> Self {
        Self {
            block: DEFAULT_BLOCK,
        }
    }
}

#[inline(always)]
fn eval_block(expr: Expression, x: &[f64], y: &[f64], out: &mut [f64]) {
    for ((z, &x), &y) in out.iter_mut().zip(x).zip(y) {
        *z = expr.apply(x, y);
    }
}

impl Strategy for Chunked {
    fn name(&self) -> &'static str {
        "Chunked"
    }

    fn key(&self) -> &'static str {
        "chunked"
    }

    fn describe(&self) -> String {
        format!("Chunked (block {})", self.block)
    }

    fn evaluate(&self, expr: Expression, x: &[f64], y: &[f64], out: &mut [f64]) -> Result<()> {
        check_lengths(self, expr, x, y, out)?;

        let mut out_blocks = out.chunks_exact_mut(self.block);
        let mut x_blocks = x.chunks_exact(self.block);
        let mut y_blocks = y.chunks_exact(self.block);
        for ((zb, xb), yb) in (&mut out_blocks).zip(&mut x_blocks).zip(&mut y_blocks) {
            eval_block(expr, xb, yb, zb);
        }

        // Tail shorter than one block
        eval_block(
            expr,
            x_blocks.remainder(),
            y_blocks.remainder(),
            out_blocks.into_remainder(),
        );
        Ok(())
    }
}
