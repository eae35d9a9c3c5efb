//! Dense matrix multiplication benchmark.
//!
//! `Z (m×p) = X (m×n) · Y (n×p)`, all row-major `f64`. Every kernel adds
//! the products for one `Z[i][j]` in increasing `k` order starting from
//! zero, so their outputs are bit-identical to the naive baseline.
//!
//! Three kernels are provided in [`kernels`]:
//! - [`kernels::Naive`]: `i, j, k` loop order, used as the reference
//! - [`kernels::Interchange`]: `i, k, j` loop order, unit stride over `Y`
//! - [`kernels::Tiled`]: `i, k, j` within square tiles

pub mod kernels;

use crate::dataset::{rng_for, sample_normals};
use crate::error::{HarnessError, Result};
use crate::measure::{gflops, MIN_ELAPSED};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_SHAPE: MatmulShape = MatmulShape {
    m: 1_000,
    n: 2_000,
    p: 3_000,
};

/// Tile edge for [`kernels::Tiled`].
pub const DEFAULT_TILE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatmulShape {
    pub m: usize,
    pub n: usize,
    pub p: usize,
}

impl MatmulShape {
    pub fn new(m: usize, n: usize, p: usize) -> Result<Self> {
        if m == 0 || n == 0 || p == 0 {
            return Err(HarnessError::invalid_argument(format!(
                "matrix dimensions must be positive, got {m}x{n}x{p}"
            )));
        }
        let fits = m.checked_mul(n).is_some()
            && n.checked_mul(p).is_some()
            && m.checked_mul(p).is_some();
        if !fits {
            return Err(HarnessError::invalid_argument(format!(
                "matrix shape {m}x{n}x{p} does not fit in memory"
            )));
        }
        Ok(Self { m, n, p })
    }

    /// Parse `MxNxP`, e.g. `1000x2000x3000`.
    pub fn parse(value: &str) -> Result<Self> {
        let dims: Vec<usize> = value
            .split(['x', 'X'])
            .map(|d| d.trim().replace('_', "").parse::<usize>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| {
                HarnessError::invalid_argument(format!("not a matrix shape (MxNxP): '{value}'"))
            })?;
        match dims[..] {
            [m, n, p] => Self::new(m, n, p),
            _ => Err(HarnessError::invalid_argument(format!(
                "not a matrix shape (MxNxP): '{value}'"
            ))),
        }
    }

    /// Floating-point operations of one product: one multiply and one add
    /// per `(i, j, k)`.
    pub fn flop(&self) -> f64 {
        2.0 * self.m as f64 * self.n as f64 * self.p as f64
    }

    pub fn x_len(&self) -> usize {
        self.m * self.n
    }

    pub fn y_len(&self) -> usize {
        self.n * self.p
    }

    pub fn z_len(&self) -> usize {
        self.m * self.p
    }
}

impl std::fmt::Display for MatmulShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.m, self.n, self.p)
    }
}

/// Immutable pair of standard-normal input matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrices {
    shape: MatmulShape,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Matrices {
    pub fn from_vecs(shape: MatmulShape, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != shape.x_len() || y.len() != shape.y_len() {
            return Err(HarnessError::invalid_argument(format!(
                "shape {shape} needs {} and {} elements, got {} and {}",
                shape.x_len(),
                shape.y_len(),
                x.len(),
                y.len()
            )));
        }
        Ok(Self { shape, x, y })
    }

    pub fn shape(&self) -> MatmulShape {
        self.shape
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }
}

/// Draw `X` then `Y` from the same generator the elementwise dataset uses.
pub fn generate_matrices(shape: MatmulShape, seed: Option<u64>) -> Matrices {
    let mut rng = rng_for(seed);
    let x = sample_normals(&mut rng, shape.x_len());
    let y = sample_normals(&mut rng, shape.y_len());
    log::debug!("generated {shape} matrices (seed={seed:?})");
    Matrices { shape, x, y }
}

/// One way of multiplying two row-major matrices.
pub trait MatmulStrategy {
    fn name(&self) -> &'static str;

    /// Report label, padded to the common width.
    fn label(&self) -> &'static str;

    /// Accumulate `x · y` into `z`, which the caller passes zeroed.
    fn multiply(&self, shape: MatmulShape, x: &[f64], y: &[f64], z: &mut [f64]) -> Result<()>;
}

/// Reject buffers whose lengths do not match `shape`.
pub fn check_shape(
    strategy: &dyn MatmulStrategy,
    shape: MatmulShape,
    x: &[f64],
    y: &[f64],
    z: &[f64],
) -> Result<()> {
    if x.len() == shape.x_len() && y.len() == shape.y_len() && z.len() == shape.z_len() {
        return Ok(());
    }
    Err(HarnessError::Strategy {
        strategy: strategy.name().to_string(),
        expression: "matmul",
        reason: format!(
            "buffers do not fit {shape}: x={}, y={}, z={}",
            x.len(),
            y.len(),
            z.len()
        ),
    })
}

/// All kernels, reference first.
pub fn registry(tile: usize) -> Result<Vec<Box<dyn MatmulStrategy>>> {
    Ok(vec![
        Box::new(kernels::Naive),
        Box::new(kernels::Interchange),
        Box::new(kernels::Tiled::new(tile)?),
    ])
}

/// Timing result for one matrix-multiplication kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatmulMeasurement {
    pub strategy: String,
    pub label: &'static str,
    pub shape: MatmulShape,
    pub elapsed_seconds: f64,
    pub gflop: f64,
    pub gflops: f64,
}

impl MatmulMeasurement {
    pub fn new(
        strategy: &dyn MatmulStrategy,
        shape: MatmulShape,
        elapsed: Duration,
    ) -> Result<Self> {
        let elapsed_seconds = elapsed.max(MIN_ELAPSED).as_secs_f64();
        Ok(Self {
            strategy: strategy.name().to_string(),
            label: strategy.label(),
            shape,
            elapsed_seconds,
            gflop: shape.flop() / 1e9,
            gflops: gflops(shape.flop(), elapsed_seconds)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shapes() {
        assert_eq!(
            MatmulShape::parse("1000x2_000X3000").unwrap(),
            MatmulShape {
                m: 1_000,
                n: 2_000,
                p: 3_000
            }
        );
        assert!(MatmulShape::parse("10x20").is_err());
        assert!(MatmulShape::parse("10x0x3").is_err());
        assert!(MatmulShape::parse("axbxc").is_err());
        assert!(MatmulShape::new(usize::MAX, 2, 1).is_err());
    }

    #[test]
    fn default_shape_is_twelve_gflop() {
        assert_eq!(DEFAULT_SHAPE.flop(), 12e9);
        assert_eq!(DEFAULT_SHAPE.to_string(), "1000x2000x3000");
    }

    #[test]
    fn same_seed_same_matrices() {
        let shape = MatmulShape::new(3, 4, 5).unwrap();
        let a = generate_matrices(shape, Some(42));
        let b = generate_matrices(shape, Some(42));
        assert_eq!(a, b);
        assert_eq!(a.x().len(), 12);
        assert_eq!(a.y().len(), 20);
    }

    #[test]
    fn from_vecs_checks_shape() {
        let shape = MatmulShape::new(2, 2, 2).unwrap();
        assert!(Matrices::from_vecs(shape, vec![0.0; 4], vec![0.0; 3]).is_err());
        assert_eq!(
            Matrices::from_vecs(shape, vec![0.0; 4], vec![0.0; 4])
                .unwrap()
                .shape(),
            shape
        );
    }

    #[test]
    fn labels_have_equal_width() {
        let kernels = registry(DEFAULT_TILE).unwrap();
        let width = kernels[0].label().len();
        assert!(kernels.iter().all(|k| k.label().len() == width));
    }

    #[test]
    fn measurement_counts_flops() {
        let shape = MatmulShape::new(10, 10, 10).unwrap();
        let m = MatmulMeasurement::new(&kernels::Naive, shape, Duration::from_millis(1)).unwrap();
        assert_eq!(m.gflop, 2e-6);
        assert!((m.gflops - 2e-3).abs() < 1e-12);
        assert_eq!(m.label, "naive matrix multiplication:");
    }
}
