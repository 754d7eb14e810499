use super::ScenarioError;
use crate::Convergence::sweep::{ConvergenceSweepRunner, SweepConfig, TripleResult};
use crate::Solver::solver_api::ReactionDiffusionSolver;
use crate::Utils::plotting::plot_error_scaling;
use log::info;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Error scaling vs. number of grid cells.
///
/// Runs the convergence sweep over all geometries, the requested reaction
/// rates and the stencil widths 3, 5 and 7, then reports the fitted orders
/// and optionally renders the log-log error-scaling figure
/// (expected slopes: N^-2, N^-4, N^-6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct NScalingTask {
    /// Number of resolution doublings starting at 8 cells; ignored when an
    /// explicit ladder is given
    pub nNs: usize,
    /// Explicit resolution ladder
    pub Ns: Option<Vec<usize>>,
    pub rates: Vec<f64>,
    /// Fit-prefix length per stencil width
    pub nfit: Vec<usize>,
    pub atol: f64,
    pub rtol: f64,
    pub plot: bool,
    /// Where to save the figure; `None` means display interactively
    pub savefig: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for NScalingTask {
    fn default() -> Self {
        Self {
            nNs: 7,
            Ns: None,
            rates: vec![0.0, 0.1],
            nfit: vec![7, 5, 4],
            atol: 1e-8,
            rtol: 1e-10,
            plot: false,
            savefig: None,
            verbose: false,
        }
    }
}

impl NScalingTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolution ladder: explicit list, or `8 * 2^i` doublings
    pub fn resolutions(&self) -> Vec<usize> {
        match &self.Ns {
            Some(ns) => ns.clone(),
            None => (0..self.nNs).map(|i| 8usize << i).collect(),
        }
    }

    pub fn to_sweep_config(&self) -> SweepConfig {
        SweepConfig {
            rates: self.rates.clone(),
            nfit: self.nfit.clone(),
            resolutions: self.resolutions(),
            atol: self.atol,
            rtol: self.rtol,
            ..SweepConfig::default()
        }
    }

    /// Run the sweep, print a summary and render the figure when requested
    pub fn run<S: ReactionDiffusionSolver>(
        &self,
        solver: &S,
    ) -> Result<Vec<TripleResult>, ScenarioError> {
        let runner = ConvergenceSweepRunner::new(self.to_sweep_config())?;
        let results = runner.run_sweep(solver)?;

        if self.verbose {
            print_summary(&results);
        }
        info!(
            "n_scaling: {} triples, {} with failures",
            results.len(),
            results.iter().filter(|r| !r.failures.is_empty()).count()
        );

        if self.plot {
            plot_error_scaling(&results, self.rates.len(), self.savefig.as_deref())?;
        }
        Ok(results)
    }
}

fn print_summary(results: &[TripleResult]) {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("geometry"),
        Cell::new("rate"),
        Cell::new("nstencil"),
        Cell::new("points"),
        Cell::new("failures"),
        Cell::new("order"),
    ]));
    for res in results {
        let order = res
            .order()
            .map(|o| format!("{:.2}", o))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(Row::new(vec![
            Cell::new(&res.geometry.to_string()),
            Cell::new(&format!("{}", res.rate)),
            Cell::new(&res.nstencil.to_string()),
            Cell::new(&res.series.len().to_string()),
            Cell::new(&res.failures.len().to_string()),
            Cell::new(&order),
        ]));
    }
    table.printstd();
}
