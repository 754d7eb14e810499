//! # Scenarios Module
//!
//! The two ready-made analyses built on the convergence machinery:
//!
//! - [`const_surf_conc`]: integrate diffusion from a constant-concentration
//!   surface once and report the normalized error against the analytic
//!   solution, optionally plotting the profiles.
//! - [`n_scaling`]: run the full error-scaling sweep over geometries,
//!   reaction rates and stencil widths and plot RMSD/atol against N on
//!   log-log axes together with the fitted convergence orders.

use crate::Convergence::sweep::SweepError;
use crate::Diffusion::analytic_model::ModelError;
use crate::Solver::rd_system::SolverError;
use crate::Utils::plotting::PlotError;
use thiserror::Error;

pub mod const_surf_conc;
pub mod n_scaling;
mod scenarios_tests;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Domain error: {0}")]
    Domain(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
