//! Input generation: two independent standard-normal sequences.
//!
//! Seeded runs use ChaCha8 (`rand_chacha`) with `seed_from_u64` and
//! `rand_distr::StandardNormal`, both of which have a documented, stable
//! output stream, so a given `(n, seed)` produces the same dataset on every
//! platform. All of `x` is drawn before any of `y`.

use crate::error::{HarnessError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Immutable pair of equal-length input arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Vec<f64>,
    y: Vec<f64>,
    seed: Option<u64>,
}

impl Dataset {
    /// Wrap explicit inputs, e.g. hand-written test vectors.
    pub fn from_vecs(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.is_empty() {
            return Err(HarnessError::invalid_argument("dataset must not be empty"));
        }
        if x.len() != y.len() {
            return Err(HarnessError::invalid_argument(format!(
                "x has {} elements but y has {}",
                x.len(),
                y.len()
            )));
        }
        Ok(Self { x, y, seed: None })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Seed the data was drawn with; `None` for entropy-seeded or explicit data.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Generate `n` standard-normal pairs. `seed = None` draws fresh entropy, so
/// every run sees new data.
pub fn generate(n: usize, seed: Option<u64>) -> Result<Dataset> {
    if n == 0 {
        return Err(HarnessError::invalid_argument(
            "dataset size must be positive",
        ));
    }

    let mut rng = rng_for(seed);
    let x = sample_normals(&mut rng, n);
    let y = sample_normals(&mut rng, n);
    log::debug!("generated {n} x 2 standard-normal values (seed={seed:?})");

    Ok(Dataset { x, y, seed })
}

/// ChaCha8 seeded from `seed`, or from OS entropy when `None`.
pub(crate) fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

pub(crate) fn sample_normals<R: Rng>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect()
}
