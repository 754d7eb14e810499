use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Slope and intercept of a log-log linear fit over a prefix of an error
/// series. Consumed by the plotting layer and by order assertions in tests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitResult {
    pub slope: f64,
    pub intercept: f64,
    /// Number of leading points actually used
    pub n_used: usize,
}

impl FitResult {
    /// Empirical convergence order, the negative of the log-log slope
    pub fn order(&self) -> f64 {
        -self.slope
    }

    /// Fitted error value at resolution `n`
    pub fn predict(&self, n: f64) -> f64 {
        (self.slope * n.ln() + self.intercept).exp()
    }
}

/// Fit `log(err) = slope * log(N) + intercept` over the first `nfit` points.
///
/// Points with a non-finite or non-positive error are skipped. Returns
/// `None` when fewer than two usable points remain. The least-squares
/// problem is solved via SVD; the design matrix has two columns, so the
/// cost is negligible.
pub fn fit_loglog(ns: &[usize], errs: &[f64], nfit: usize) -> Option<FitResult> {
    let take = nfit.min(ns.len()).min(errs.len());
    let pts: Vec<(f64, f64)> = ns
        .iter()
        .zip(errs.iter())
        .take(take)
        .filter(|&(_, &e)| e.is_finite() && e > 0.0)
        .map(|(&n, &e)| ((n as f64).ln(), e.ln()))
        .collect();
    if pts.len() < 2 {
        return None;
    }

    let m = pts.len();
    let design = DMatrix::from_fn(m, 2, |i, j| if j == 0 { 1.0 } else { pts[i].0 });
    let rhs = DVector::from_fn(m, |i, _| pts[i].1);

    let svd = design.svd(true, true);
    let beta = svd.solve(&rhs, 1e-12).ok()?;
    if !beta.iter().all(|v| v.is_finite()) {
        return None;
    }
    Some(FitResult {
        slope: beta[1],
        intercept: beta[0],
        n_used: m,
    })
}
