use super::ScenarioError;
use crate::Convergence::error_metrics::{rmsd_over_atol, time_average};
use crate::Diffusion::analytic_model::AnalyticSurfaceModel;
use crate::Diffusion::analytic_model::Geometry;
use crate::Diffusion::grid::{GridSpec, generate_grid, linspace};
use crate::Solver::rd_system::{
    IntegrationMethod, JacobianMode, RdSpec, SolverError, UnitScaling,
};
use crate::Solver::solver_api::{ReactionDiffusionSolver, SolverDiagnostics};
use log::info;
use nalgebra::DMatrix;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Single integration of diffusion from a constant-concentration surface,
/// compared cell by cell against the analytic solution.
///
/// The boundary is faked through the modulated-reaction mechanism: an inert
/// tracer loaded with `factor` in the first cell converts into the target
/// species only there, driving the boundary concentration to the surface
/// value. `factor` is a tunable boundary-strength parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct ConstSurfConcTask {
    pub problem_name: Option<String>,
    /// Diffusion coefficient of the target species (m²/s)
    pub D: f64,
    /// First output time (s); must be positive
    pub t0: f64,
    pub tend: f64,
    pub x0: f64,
    pub xend: f64,
    /// Number of grid cells
    pub N: usize,
    /// Number of output times
    pub nt: usize,
    /// First-order decay rate of the target species
    pub k: f64,
    pub nstencil: usize,
    pub logt: bool,
    pub logy: bool,
    pub logx: bool,
    /// Perturb the grid edges randomly (seeded)
    pub random: bool,
    pub random_seed: u64,
    /// Interpolating instead of reflecting boundaries
    pub linterpol: bool,
    pub rinterpol: bool,
    pub num_jacobian: bool,
    pub method: IntegrationMethod,
    pub atol: f64,
    pub rtol: f64,
    /// Boundary-strength parameter for the tracer source
    pub factor: f64,
    /// Amount-of-substance scaling; stored as `UnitScaling.amount = 1/scaling`
    pub scaling: f64,
    pub geometry: Geometry,
    pub surface_conc: f64,
    pub verbose: bool,
}

impl Default for ConstSurfConcTask {
    fn default() -> Self {
        Self {
            problem_name: None,
            D: 2e-3,
            t0: 1.0,
            tend: 13.0,
            x0: 1e-10,
            xend: 1.0,
            N: 64,
            nt: 42,
            k: 1.0,
            nstencil: 3,
            logt: false,
            logy: false,
            logx: false,
            random: false,
            random_seed: 42,
            linterpol: false,
            rinterpol: false,
            num_jacobian: false,
            method: IntegrationMethod::Bdf,
            atol: 1e-6,
            rtol: 1e-6,
            factor: 1e5,
            scaling: 1.0,
            geometry: Geometry::Planar,
            surface_conc: 1.0,
            verbose: false,
        }
    }
}

/// Everything a caller needs from one run: time points, output field,
/// diagnostics and the normalized error in both per-time and aggregate form.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub tout: Vec<f64>,
    /// One `N x n_species` matrix per output time
    pub cout: Vec<DMatrix<f64>>,
    /// Analytic reference, `time x cell`
    pub reference: DMatrix<f64>,
    pub grid: GridSpec,
    pub diagnostics: SolverDiagnostics,
    pub spat_ave_rmsd_over_atol: Vec<f64>,
    pub tot_ave_rmsd_over_atol: f64,
}

impl ConstSurfConcTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_problem_name(&mut self, name: &str) {
        self.problem_name = Some(name.to_string());
    }

    #[allow(non_snake_case)]
    pub fn set_grid(&mut self, x0: f64, xend: f64, N: usize) {
        self.x0 = x0;
        self.xend = xend;
        self.N = N;
    }

    pub fn set_times(&mut self, t0: f64, tend: f64, nt: usize) {
        self.t0 = t0;
        self.tend = tend;
        self.nt = nt;
    }

    pub fn set_tolerances(&mut self, atol: f64, rtol: f64) {
        self.atol = atol;
        self.rtol = rtol;
    }

    /// Validate the task before running.
    ///
    /// `t0 == 0` is rejected: the analytic profile at zero time is a Dirac
    /// delta and cannot serve as an initial condition.
    pub fn check_task(&self) -> Result<(), ScenarioError> {
        if !(self.t0 > 0.0) {
            return Err(ScenarioError::Domain(
                "t0 == 0 => Dirac delta function C0 profile".to_string(),
            ));
        }
        if !(self.tend > self.t0) {
            return Err(ScenarioError::Configuration(format!(
                "tend = {} must exceed t0 = {}",
                self.tend, self.t0
            )));
        }
        if self.nt < 2 {
            return Err(ScenarioError::Configuration(
                "At least two output times are required".to_string(),
            ));
        }
        if !matches!(self.nstencil, 3 | 5 | 7) {
            return Err(ScenarioError::Configuration(format!(
                "Stencil width must be 3, 5 or 7, got {}",
                self.nstencil
            )));
        }
        if self.N < self.nstencil {
            return Err(ScenarioError::Configuration(format!(
                "N = {} too small for a {}-point stencil",
                self.N, self.nstencil
            )));
        }
        if !(self.atol > 0.0) || !(self.rtol > 0.0) {
            return Err(ScenarioError::Configuration(
                "Tolerances must be positive".to_string(),
            ));
        }
        if !(self.scaling > 0.0) {
            return Err(ScenarioError::Configuration(format!(
                "scaling must be positive, got {}",
                self.scaling
            )));
        }
        Ok(())
    }

    /// Integrate the system and compare against the analytic solution
    pub fn run<S: ReactionDiffusionSolver>(&self, solver: &S) -> Result<RunReport, ScenarioError> {
        self.check_task()?;

        let grid = generate_grid(
            self.x0,
            self.xend,
            self.N,
            self.logx,
            self.random,
            self.random_seed,
        )?;
        let tout = linspace(self.t0, self.tend, self.nt);

        let model = AnalyticSurfaceModel::new(self.D, self.surface_conc, self.logx);
        let reference = model.evaluate(&grid.xcenters, &tout)?;

        let modulation: Vec<f64> = (0..self.N)
            .map(|i| if i == 0 { 1.0 } else { 0.0 })
            .collect();
        let spec = RdSpec {
            n_species: 2,
            stoich_reac: vec![vec![0], vec![1]],
            stoich_prod: vec![vec![1], vec![0]],
            k: vec![self.k, self.factor * self.k],
            D: vec![0.0, self.D],
            geometry: self.geometry,
            grid: grid.clone(),
            logy: self.logy,
            logt: self.logt,
            logx: self.logx,
            nstencil: self.nstencil,
            lrefl: !self.linterpol,
            rrefl: !self.rinterpol,
            modulated_rxns: vec![0, 1],
            modulation: vec![modulation; 2],
            units: UnitScaling {
                amount: 1.0 / self.scaling,
            },
        };

        let y0 = DMatrix::from_fn(self.N, 2, |cell, species| match species {
            0 => {
                if cell == 0 {
                    self.factor
                } else {
                    0.0
                }
            }
            _ => reference[(0, cell)],
        });

        let jacobian = if self.num_jacobian {
            JacobianMode::Numerical
        } else {
            JacobianMode::Analytic
        };
        let output = solver
            .integrate(&spec, &y0, &tout, self.atol, self.rtol, jacobian, self.method)
            .map_err(|e| match e {
                SolverError::InvalidSpec(msg) => ScenarioError::Configuration(msg),
                other => ScenarioError::Solver(other),
            })?;

        let sim = output.species_field(1);
        let err_vs_time = rmsd_over_atol(&sim, &reference, self.atol)?;
        let tot = time_average(&err_vs_time);
        info!(
            "const_surf_conc: N = {}, nstencil = {}, total RMSD/atol = {:.3e}",
            self.N, self.nstencil, tot
        );
        if self.verbose {
            self.print_diagnostics(&output.diagnostics, tot);
        }

        Ok(RunReport {
            tout,
            cout: output.cout,
            reference,
            grid,
            diagnostics: output.diagnostics,
            spat_ave_rmsd_over_atol: err_vs_time.iter().copied().collect(),
            tot_ave_rmsd_over_atol: tot,
        })
    }

    fn print_diagnostics(&self, diag: &SolverDiagnostics, tot: f64) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("N"),
            Cell::new("nstencil"),
            Cell::new("method"),
            Cell::new("steps"),
            Cell::new("rhs evals"),
            Cell::new("jac evals"),
            Cell::new("rejected"),
            Cell::new("RMSD/atol"),
        ]));
        table.add_row(Row::new(vec![
            Cell::new(&self.N.to_string()),
            Cell::new(&self.nstencil.to_string()),
            Cell::new(&diag.method),
            Cell::new(&diag.n_steps.to_string()),
            Cell::new(&diag.n_rhs_evals.to_string()),
            Cell::new(&diag.n_jac_evals.to_string()),
            Cell::new(&diag.n_rejected.to_string()),
            Cell::new(&format!("{:.3e}", tot)),
        ]));
        table.printstd();
    }

    /// Persist the task settings as JSON
    pub fn save_settings(&self, path: &Path) -> Result<(), ScenarioError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load task settings from a JSON file
    pub fn load_settings(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path)?;
        let task: Self = serde_json::from_str(&content)?;
        task.check_task()?;
        Ok(task)
    }
}
