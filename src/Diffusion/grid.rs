use super::analytic_model::ModelError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Uniformly spaced points from `a` to `b` inclusive
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![a];
    }
    let h = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + h * i as f64).collect()
}

/// Cell-edge and cell-center coordinates of a 1-D grid.
///
/// Invariants (checked by [`GridSpec::validate`]):
/// - edges strictly increasing, length N+1
/// - each center lies strictly between its adjacent edges
///
/// When `logx` is set the stored coordinates are logarithms of the physical
/// positions; the analytic model exponentiates them before evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSpec {
    /// Cell edges in the (possibly transformed) coordinate, length N+1
    pub x: Vec<f64>,
    /// Cell centers, length N
    pub xcenters: Vec<f64>,
    pub logx: bool,
}

impl GridSpec {
    /// Number of cells
    pub fn n(&self) -> usize {
        self.xcenters.len()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.x.len() != self.xcenters.len() + 1 {
            return Err(ModelError::MissingData(format!(
                "Grid has {} edges for {} centers",
                self.x.len(),
                self.xcenters.len()
            )));
        }
        for i in 0..self.xcenters.len() {
            if !(self.x[i] < self.x[i + 1]) {
                return Err(ModelError::DomainError(format!(
                    "Grid edges not strictly increasing at index {}",
                    i
                )));
            }
            if !(self.x[i] < self.xcenters[i] && self.xcenters[i] < self.x[i + 1]) {
                return Err(ModelError::DomainError(format!(
                    "Cell center {} outside its edges",
                    i
                )));
            }
        }
        Ok(())
    }
}

/// Generate a grid of `n` cells spanning `[x0, xend]`.
///
/// With `logx` the span is taken in ln-space (requires `x0 > 0`). With
/// `random` the interior edges are perturbed by at most a quarter of the
/// nominal spacing, which preserves the ordering invariant by construction;
/// the perturbation is drawn from a [`StdRng`] seeded with `seed` so that
/// repeated runs reproduce identical grids.
pub fn generate_grid(
    x0: f64,
    xend: f64,
    n: usize,
    logx: bool,
    random: bool,
    seed: u64,
) -> Result<GridSpec, ModelError> {
    if n < 1 {
        return Err(ModelError::DomainError(
            "Grid needs at least one cell".to_string(),
        ));
    }
    if !(x0 < xend) {
        return Err(ModelError::DomainError(format!(
            "Grid span requires x0 < xend, got [{}, {}]",
            x0, xend
        )));
    }
    let (a, b) = if logx {
        if !(x0 > 0.0) {
            return Err(ModelError::DomainError(format!(
                "Logarithmic grid requires x0 > 0, got {}",
                x0
            )));
        }
        (x0.ln(), xend.ln())
    } else {
        (x0, xend)
    };

    let mut edges = linspace(a, b, n + 1);
    if random {
        let dx = (b - a) / n as f64;
        let mut rng = StdRng::seed_from_u64(seed);
        for edge in edges.iter_mut().take(n).skip(1) {
            // |delta| <= dx/4, so adjacent edges keep a gap of at least dx/2
            *edge += (rng.r#gen::<f64>() - 0.5) * dx * 0.5;
        }
    }
    let xcenters: Vec<f64> = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();

    let grid = GridSpec {
        x: edges,
        xcenters,
        logx,
    };
    grid.validate()?;
    Ok(grid)
}
