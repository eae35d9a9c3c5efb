use super::{check_shape, MatmulShape, MatmulStrategy};
use crate::error::{HarnessError, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct Naive;

impl MatmulStrategy for Naive {
    fn name(&self) -> &'static str {
        "Naive"
    }

    fn label(&self) -> &'static str {
        "naive matrix multiplication:"
    }

    fn multiply(&self, shape: MatmulShape, x: &[f64], y: &[f64], z: &mut [f64]) -> Result<()> {
        check_shape(self, shape, x, y, z)?;
        let MatmulShape { m, n, p } = shape;
        for i in 0..m {
            for j in 0..p {
                for k in 0..n {
                    z[i * p + j] += x[i * n + k] * y[k * p + j];
                }
            }
        }
        Ok(())
    }
}

/// `j` innermost: walks rows of `Y` and `Z` with unit stride.
#[derive(Debug, Default, Clone, Copy)]
pub struct Interchange;

impl MatmulStrategy for Interchange {
    fn name(&self) -> &'static str {
        "Loop interchange"
    }

    fn label(&self) -> &'static str {
        "naive with loop interchange:"
    }

    fn multiply(&self, shape: MatmulShape, x: &[f64], y: &[f64], z: &mut [f64]) -> Result<()> {
        check_shape(self, shape, x, y, z)?;
        let MatmulShape { n, p, .. } = shape;
        for (x_row, z_row) in x.chunks_exact(n).zip(z.chunks_exact_mut(p)) {
            for (&xik, y_row) in x_row.iter().zip(y.chunks_exact(p)) {
                for (zij, &ykj) in z_row.iter_mut().zip(y_row) {
                    *zij += xik * ykj;
                }
            }
        }
        Ok(())
    }
}

/// Interchanged loops over `tile × tile` blocks. The `K` blocks are visited
/// in increasing order so each sum keeps the naive accumulation order.
#[derive(Debug, Clone, Copy)]
pub struct Tiled {
    tile: usize,
}

impl Tiled {
    pub fn new(tile: usize) -> Result<Self> {
        if tile == 0 {
            return Err(HarnessError::invalid_argument("tile size must be positive"));
        }
        Ok(Self { tile })
    }
}

impl MatmulStrategy for Tiled {
    fn name(&self) -> &'static str {
        "Tiled"
    }

    fn label(&self) -> &'static str {
        "tiled matrix multiplication:"
    }

    fn multiply(&self, shape: MatmulShape, x: &[f64], y: &[f64], z: &mut [f64]) -> Result<()> {
        check_shape(self, shape, x, y, z)?;
        let MatmulShape { m, n, p } = shape;
        let s = self.tile;
        for ib in (0..m).step_by(s) {
            let i_end = m.min(ib + s);
            for kb in (0..n).step_by(s) {
                let k_end = n.min(kb + s);
                for jb in (0..p).step_by(s) {
                    let j_end = p.min(jb + s);
                    for i in ib..i_end {
                        let z_row = &mut z[i * p + jb..i * p + j_end];
                        for k in kb..k_end {
                            let xik = x[i * n + k];
                            let y_row = &y[k * p + jb..k * p + j_end];
                            for (zij, &ykj) in z_row.iter_mut().zip(y_row) {
                                *zij += xik * ykj;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
