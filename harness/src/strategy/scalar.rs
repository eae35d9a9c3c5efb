//! Plain indexed loop. This is the reference every other strategy is
//! checked against.

use super::{check_lengths, Strategy};
use crate::error::Result;
use crate::expression::Expression;

#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarLoop;

impl Strategy for ScalarLoop {
    fn name(&self) -> &'static str {
        "Scalar loop"
    }

    fn key(&self) -> &'static str {
        "scalar"
    }

    fn evaluate(&self, expr: Expression, x: &[f64], y: &[f64], out: &mut [f64]) -> Result<()> {
        check_lengths(self, expr, x, y, out)?;
        #[allow(clippy::needless_range_loop)]
        for i in 0..out.len() {
            out[i] = expr.apply(x[i], y[i]);
        }
        Ok(())
    }
}
