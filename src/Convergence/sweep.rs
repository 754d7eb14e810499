use super::error_metrics::{rmsd_over_atol, time_average};
use super::regression::{FitResult, fit_loglog};
use crate::Diffusion::analytic_model::{AnalyticSurfaceModel, Geometry, ModelError};
use crate::Diffusion::grid::{generate_grid, linspace};
use crate::Solver::rd_system::{
    IntegrationMethod, JacobianMode, RdSpec, SolverError, UnitScaling,
};
use crate::Solver::solver_api::{ReactionDiffusionSolver, SolverDiagnostics};
use log::{info, warn};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    /// Malformed sweep setup; aborts the run immediately
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Invalid mathematical input; aborts the run immediately
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Full configuration of a convergence sweep.
///
/// One sweep covers the cartesian product of geometries, reaction rates and
/// stencil widths; each combination is integrated at every resolution of the
/// ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct SweepConfig {
    pub geometries: Vec<Geometry>,
    /// First-order decay rates of the target species
    pub rates: Vec<f64>,
    /// Stencil widths, each 3, 5 or 7
    pub nstencils: Vec<usize>,
    /// Resolution ladder, strictly increasing
    pub resolutions: Vec<usize>,
    /// Leading points of the ladder used in the fit, one entry per stencil
    pub nfit: Vec<usize>,
    /// Diffusion coefficient of the target species
    pub D: f64,
    pub t0: f64,
    pub tend: f64,
    /// Number of output time points
    pub nt: usize,
    pub x0: f64,
    pub xend: f64,
    pub logx: bool,
    pub logy: bool,
    pub logt: bool,
    pub random_grid: bool,
    pub random_seed: u64,
    /// Boundary-strength parameter: the modulated source reaction runs at
    /// `factor * rate` and the tracer is loaded with `factor` in the first
    /// cell. Tunable, no physical meaning implied.
    pub factor: f64,
    pub surface_conc: f64,
    pub atol: f64,
    pub rtol: f64,
    pub jacobian: JacobianMode,
    pub method: IntegrationMethod,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            geometries: Geometry::all().to_vec(),
            rates: vec![0.0, 0.1],
            nstencils: vec![3, 5, 7],
            resolutions: (0..7).map(|i| 8usize << i).collect(),
            nfit: vec![7, 5, 4],
            D: 2e-3,
            t0: 1.0,
            tend: 13.0,
            nt: 42,
            x0: 1e-10,
            xend: 1.0,
            logx: false,
            logy: false,
            logt: false,
            random_grid: false,
            random_seed: 42,
            factor: 1e5,
            surface_conc: 1.0,
            atol: 1e-8,
            rtol: 1e-10,
            jacobian: JacobianMode::Analytic,
            method: IntegrationMethod::Bdf,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.geometries.is_empty() || self.rates.is_empty() || self.nstencils.is_empty() {
            return Err(SweepError::Configuration(
                "Sweep needs at least one geometry, rate and stencil".to_string(),
            ));
        }
        if self.nfit.len() != self.nstencils.len() {
            return Err(SweepError::Configuration(format!(
                "{} fit lengths for {} stencil widths",
                self.nfit.len(),
                self.nstencils.len()
            )));
        }
        for &s in &self.nstencils {
            if !matches!(s, 3 | 5 | 7) {
                return Err(SweepError::Configuration(format!(
                    "Stencil width must be 3, 5 or 7, got {}",
                    s
                )));
            }
        }
        if self.resolutions.is_empty() {
            return Err(SweepError::Configuration(
                "Empty resolution ladder".to_string(),
            ));
        }
        if !self.resolutions.windows(2).all(|w| w[0] < w[1]) {
            return Err(SweepError::Configuration(
                "Resolution ladder must be strictly increasing".to_string(),
            ));
        }
        if !(self.atol > 0.0) || !(self.rtol > 0.0) {
            return Err(SweepError::Configuration(format!(
                "Tolerances must be positive, got atol = {}, rtol = {}",
                self.atol, self.rtol
            )));
        }
        if self.nt < 2 {
            return Err(SweepError::Configuration(
                "At least two output times are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Fit length for the stencil at position `si` of `nstencils`
    pub fn nfit_for(&self, si: usize) -> usize {
        self.nfit[si]
    }
}

/// Ordered (N, error) pairs for one (geometry, rate, stencil) triple.
/// Only converged points are recorded, so N values are strictly increasing
/// but may skip failed rungs of the ladder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorSeries {
    pub entries: Vec<(usize, f64)>,
}

impl ErrorSeries {
    pub fn push(&mut self, n: usize, err: f64) {
        debug_assert!(
            self.entries.last().map(|&(last, _)| last < n).unwrap_or(true),
            "resolutions must be recorded in increasing order"
        );
        self.entries.push((n, err));
    }

    pub fn ns(&self) -> Vec<usize> {
        self.entries.iter().map(|&(n, _)| n).collect()
    }

    pub fn errs(&self) -> Vec<f64> {
        self.entries.iter().map(|&(_, e)| e).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One excluded sweep point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepFailure {
    pub n: usize,
    pub message: String,
}

/// Aggregate result for one (geometry, rate, stencil) triple
#[derive(Debug, Clone)]
pub struct TripleResult {
    pub geometry: Geometry,
    pub rate: f64,
    pub nstencil: usize,
    /// Time-averaged RMSD/atol per resolution
    pub series: ErrorSeries,
    /// The same errors kept per output time, for consumers that want the
    /// full time dependence
    pub series_vs_time: Vec<(usize, Vec<f64>)>,
    pub fit: Option<FitResult>,
    pub failures: Vec<SweepFailure>,
}

impl TripleResult {
    /// Empirical convergence order, when a fit exists
    pub fn order(&self) -> Option<f64> {
        self.fit.map(|f| f.order())
    }
}

/// Outcome of one converged sweep point
pub struct PointOutcome {
    pub err: f64,
    pub err_vs_time: Vec<f64>,
    pub diagnostics: SolverDiagnostics,
}

enum PointError {
    Model(ModelError),
    Solver(SolverError),
}

impl From<ModelError> for PointError {
    fn from(e: ModelError) -> Self {
        PointError::Model(e)
    }
}

impl From<SolverError> for PointError {
    fn from(e: SolverError) -> Self {
        PointError::Solver(e)
    }
}

/// Drives the external engine over the resolution ladder for every triple
/// and fits the observed convergence order.
///
/// Strictly sequential: each point is integrated after the previous one
/// finished, and the only state shared between points is the accumulating
/// result vector.
pub struct ConvergenceSweepRunner {
    pub config: SweepConfig,
}

impl ConvergenceSweepRunner {
    pub fn new(config: SweepConfig) -> Result<Self, SweepError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn run_sweep<S: ReactionDiffusionSolver>(
        &self,
        solver: &S,
    ) -> Result<Vec<TripleResult>, SweepError> {
        let cfg = &self.config;
        let mut results = Vec::new();

        for &geometry in &cfg.geometries {
            for &rate in &cfg.rates {
                for (si, &nstencil) in cfg.nstencils.iter().enumerate() {
                    info!("sweep: {} geometry, rate {}, {}-point stencil", geometry, rate, nstencil);
                    let mut series = ErrorSeries::default();
                    let mut series_vs_time = Vec::new();
                    let mut failures = Vec::new();

                    for &n in &cfg.resolutions {
                        match self.run_point(solver, geometry, rate, nstencil, n) {
                            Ok(outcome) => {
                                info!(
                                    "  N = {:>5}: RMSD/atol = {:.3e} ({} steps, {} rejected)",
                                    n,
                                    outcome.err,
                                    outcome.diagnostics.n_steps,
                                    outcome.diagnostics.n_rejected
                                );
                                series.push(n, outcome.err);
                                series_vs_time.push((n, outcome.err_vs_time));
                            }
                            Err(PointError::Solver(SolverError::NonConvergence(msg))) => {
                                warn!(
                                    "  N = {:>5}: excluded from fit, solver did not converge: {}",
                                    n, msg
                                );
                                failures.push(SweepFailure { n, message: msg });
                            }
                            Err(PointError::Solver(SolverError::InvalidSpec(msg))) => {
                                return Err(SweepError::Configuration(msg));
                            }
                            Err(PointError::Model(e)) => return Err(e.into()),
                        }
                    }

                    let fit = fit_loglog(&series.ns(), &series.errs(), cfg.nfit_for(si));
                    if let Some(f) = fit {
                        info!(
                            "  fitted order {:.2} over {} points",
                            f.order(),
                            f.n_used
                        );
                    }
                    results.push(TripleResult {
                        geometry,
                        rate,
                        nstencil,
                        series,
                        series_vs_time,
                        fit,
                        failures,
                    });
                }
            }
        }
        Ok(results)
    }

    /// Assemble and integrate one sweep point.
    ///
    /// The two-species network holds an inert tracer (species 0, D = 0) at a
    /// large concentration in the first cell; the modulated reactions convert
    /// it into the target species (species 1) only there, which drives the
    /// boundary concentration toward the surface value while the target
    /// diffuses with D and decays with the given rate.
    fn run_point<S: ReactionDiffusionSolver>(
        &self,
        solver: &S,
        geometry: Geometry,
        rate: f64,
        nstencil: usize,
        n: usize,
    ) -> Result<PointOutcome, PointError> {
        let cfg = &self.config;
        let grid = generate_grid(
            cfg.x0,
            cfg.xend,
            n,
            cfg.logx,
            cfg.random_grid,
            cfg.random_seed,
        )?;
        let tout = linspace(cfg.t0, cfg.tend, cfg.nt);

        let model = AnalyticSurfaceModel::new(cfg.D, cfg.surface_conc, cfg.logx);
        let reference = model.evaluate(&grid.xcenters, &tout)?;

        let modulation: Vec<f64> = (0..n).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        let spec = RdSpec {
            n_species: 2,
            stoich_reac: vec![vec![0], vec![1]],
            stoich_prod: vec![vec![1], vec![0]],
            k: vec![rate, cfg.factor * rate],
            D: vec![0.0, cfg.D],
            geometry,
            grid,
            logy: cfg.logy,
            logt: cfg.logt,
            logx: cfg.logx,
            nstencil,
            lrefl: true,
            rrefl: true,
            modulated_rxns: vec![0, 1],
            modulation: vec![modulation; 2],
            units: UnitScaling::default(),
        };

        // y0 = [tracer source | reference profile at t0]
        let y0 = DMatrix::from_fn(n, 2, |cell, species| match species {
            0 => {
                if cell == 0 {
                    cfg.factor
                } else {
                    0.0
                }
            }
            _ => reference[(0, cell)],
        });

        let output = solver.integrate(
            &spec,
            &y0,
            &tout,
            cfg.atol,
            cfg.rtol,
            cfg.jacobian,
            cfg.method,
        )?;

        let sim = output.species_field(1);
        let err_vs_time = rmsd_over_atol(&sim, &reference, cfg.atol)?;
        let err = time_average(&err_vs_time);
        Ok(PointOutcome {
            err,
            err_vs_time: err_vs_time.iter().copied().collect(),
            diagnostics: output.diagnostics,
        })
    }
}
