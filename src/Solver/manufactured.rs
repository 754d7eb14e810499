use super::rd_system::{IntegrationMethod, JacobianMode, RdSpec, SolverError};
use super::solver_api::{IntegrationOutput, ReactionDiffusionSolver, SolverDiagnostics};
use crate::Diffusion::analytic_model::AnalyticSurfaceModel;
use nalgebra::DMatrix;
use std::collections::HashSet;
use std::f64::consts::PI;

/// Deterministic stand-in for the external engine.
///
/// Returns the analytic constant-surface-concentration field for the last
/// species plus a smooth manufactured truncation-error term whose amplitude
/// scales as `N^-(nstencil-1)`, i.e. second, fourth and sixth order for 3-,
/// 5- and 7-point stencils. An optional error floor mimics the saturation
/// caused by integration tolerances, and individual resolutions can be made
/// to fail to exercise the sweep's failure policy.
///
/// The source species (column 0 of `y0`) is passed through unchanged.
#[derive(Debug, Clone)]
pub struct ManufacturedSolver {
    /// Amplitude of the manufactured error term at N = 1
    pub err_amplitude: f64,
    /// Lower bound on the error amplitude (0.0 disables the floor)
    pub err_floor: f64,
    /// Surface concentration assumed for the analytic field
    pub surface_conc: f64,
    /// Grid sizes for which integrate reports non-convergence
    pub fail_at: HashSet<usize>,
}

impl Default for ManufacturedSolver {
    fn default() -> Self {
        Self {
            err_amplitude: 1e-3,
            err_floor: 0.0,
            surface_conc: 1.0,
            fail_at: HashSet::new(),
        }
    }
}

impl ManufacturedSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failures(mut self, ns: &[usize]) -> Self {
        self.fail_at.extend(ns.iter().copied());
        self
    }
}

impl ReactionDiffusionSolver for ManufacturedSolver {
    fn integrate(
        &self,
        spec: &RdSpec,
        y0: &DMatrix<f64>,
        tout: &[f64],
        atol: f64,
        rtol: f64,
        jacobian: JacobianMode,
        method: IntegrationMethod,
    ) -> Result<IntegrationOutput, SolverError> {
        spec.validate()?;
        let n = spec.n();
        if y0.nrows() != n || y0.ncols() != spec.n_species {
            return Err(SolverError::InvalidSpec(format!(
                "Initial state is {}x{}, expected {}x{}",
                y0.nrows(),
                y0.ncols(),
                n,
                spec.n_species
            )));
        }
        if !(atol > 0.0) || !(rtol > 0.0) {
            return Err(SolverError::InvalidSpec(
                "Tolerances must be positive".to_string(),
            ));
        }
        if self.fail_at.contains(&n) {
            return Err(SolverError::NonConvergence(format!(
                "Newton iteration diverged at N = {} (injected)",
                n
            )));
        }

        let target = spec.n_species - 1;
        let model = AnalyticSurfaceModel::new(spec.D[target], self.surface_conc, spec.logx);
        let reference = model
            .evaluate(&spec.grid.xcenters, tout)
            .map_err(|e| SolverError::NonConvergence(e.to_string()))?;

        let order = (spec.nstencil - 1) as f64;
        let amp = (self.err_amplitude * (n as f64).powf(-order)).max(self.err_floor);

        let cout: Vec<DMatrix<f64>> = (0..tout.len())
            .map(|ti| {
                DMatrix::from_fn(n, spec.n_species, |cell, species| {
                    if species == target {
                        let phase = PI * (cell as f64 + 0.5) / n as f64;
                        reference[(ti, cell)] + amp * phase.sin()
                    } else {
                        y0[(cell, species)]
                    }
                })
            })
            .collect();

        // Plausible, deterministic step statistics
        let n_steps = 17 * tout.len() + 3 * spec.nstencil;
        let diagnostics = SolverDiagnostics {
            success: true,
            n_steps,
            n_rhs_evals: 2 * n_steps + if jacobian == JacobianMode::Numerical {
                n_steps * spec.n_species
            } else {
                0
            },
            n_jac_evals: n_steps / 5,
            n_rejected: n_steps / 40,
            method: method.name().to_string(),
        };

        Ok(IntegrationOutput {
            tout: tout.to_vec(),
            cout,
            diagnostics,
        })
    }
}
