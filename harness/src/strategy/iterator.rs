use super::{check_lengths, Strategy};
use crate::error::Result;
use crate::expression::Expression;

/// Zipped iterators over inputs and output, no bounds checks in the body.
#[derive(Debug, Default, Clone, Copy)]
pub struct IteratorZip;

impl Strategy for IteratorZip {
    fn name(&self) -> &'static str {
        "Iterator"
    }

    fn key(&self) -> &'static str {
        "iterator"
    }

    fn evaluate(&self, expr: Expression, x: &[f64], y: &[f64], out: &mut [f64]) -> Result<()> {
        check_lengths(self, expr, x, y, out)?;
        out.iter_mut()
            .zip(x.iter().zip(y))
            .for_each(|(z, (&x, &y))| *z = expr.apply(x, y));
        Ok(())
    }
}
