//! `ndarray` backend: borrows the slices as 1-D views and lets `Zip` drive
//! the elementwise loop.

use super::{check_lengths, Strategy};
use crate::error::Result;
use crate::expression::Expression;
use ndarray::{ArrayView1, ArrayViewMut1, Zip};

#[derive(Debug, Default, Clone, Copy)]
pub struct NdarrayZip;

impl Strategy for NdarrayZip {
    fn name(&self) -> &'static str {
        "ndarray"
    }

    fn key(&self) -> &'static str {
        "ndarray"
    }

    fn evaluate(&self, expr: Expression, x: &[f64], y: &[f64], out: &mut [f64]) -> Result<()> {
        check_lengths(self, expr, x, y, out)?;
        let x = ArrayView1::from(x);
        let y = ArrayView1::from(y);
        let out = ArrayViewMut1::from(out);
        Zip::from(out)
            .and(&x)
            .and(&y)
            .for_each(|z, &x, &y| *z = expr.apply(x, y));
        Ok(())
    }
}
