use crate::Diffusion::analytic_model::ModelError;
use nalgebra::{DMatrix, DVector};

/// Spatially averaged RMSD between a simulated and a reference field,
/// one value per output time.
///
/// Both matrices are `time x cell`; a shape mismatch is a misconfiguration.
pub fn spat_ave_rmsd_vs_time(
    sim: &DMatrix<f64>,
    reference: &DMatrix<f64>,
) -> Result<DVector<f64>, ModelError> {
    if sim.shape() != reference.shape() {
        return Err(ModelError::MissingData(format!(
            "Field shapes differ: {:?} vs {:?}",
            sim.shape(),
            reference.shape()
        )));
    }
    let (nt, n) = sim.shape();
    if n == 0 {
        return Err(ModelError::MissingData("Empty field".to_string()));
    }
    let rmsd = DVector::from_fn(nt, |i, _| {
        let ss: f64 = (0..n)
            .map(|j| (sim[(i, j)] - reference[(i, j)]).powi(2))
            .sum();
        (ss / n as f64).sqrt()
    });
    Ok(rmsd)
}

/// Per-time RMSD divided by the absolute tolerance
pub fn rmsd_over_atol(
    sim: &DMatrix<f64>,
    reference: &DMatrix<f64>,
    atol: f64,
) -> Result<DVector<f64>, ModelError> {
    if !(atol > 0.0) {
        return Err(ModelError::DomainError(format!(
            "atol must be positive, got {}",
            atol
        )));
    }
    Ok(spat_ave_rmsd_vs_time(sim, reference)? / atol)
}

/// Time average of a per-time error series
pub fn time_average(series: &DVector<f64>) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    series.sum() / series.len() as f64
}
