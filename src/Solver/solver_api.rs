use super::rd_system::{IntegrationMethod, JacobianMode, RdSpec, SolverError};
use nalgebra::DMatrix;

/// Per-call statistics reported by the engine
#[derive(Debug, Clone, Default)]
pub struct SolverDiagnostics {
    pub success: bool,
    pub n_steps: usize,
    pub n_rhs_evals: usize,
    pub n_jac_evals: usize,
    pub n_rejected: usize,
    pub method: String,
}

/// Result of one integration: concentrations indexed by time, cell, species,
/// plus diagnostics.
#[derive(Debug, Clone)]
pub struct IntegrationOutput {
    pub tout: Vec<f64>,
    /// One `N x n_species` matrix per output time
    pub cout: Vec<DMatrix<f64>>,
    pub diagnostics: SolverDiagnostics,
}

impl IntegrationOutput {
    /// Extract a single species as a `time x cell` matrix
    pub fn species_field(&self, species: usize) -> DMatrix<f64> {
        let nt = self.cout.len();
        let n = if nt > 0 { self.cout[0].nrows() } else { 0 };
        DMatrix::from_fn(nt, n, |i, j| self.cout[i][(j, species)])
    }
}

/// External reaction-diffusion engine boundary.
///
/// Implementations perform the spatial discretization and the stiff time
/// integration. This crate only drives them and analyses their output.
pub trait ReactionDiffusionSolver {
    /// Integrate `spec` from the initial state `y0` (one row per cell, one
    /// column per species) over the output times `tout`.
    ///
    /// A failed integration is reported as [`SolverError::NonConvergence`];
    /// callers treat that as scoped to this single invocation.
    fn integrate(
        &self,
        spec: &RdSpec,
        y0: &DMatrix<f64>,
        tout: &[f64],
        atol: f64,
        rtol: f64,
        jacobian: JacobianMode,
        method: IntegrationMethod,
    ) -> Result<IntegrationOutput, SolverError>;
}
