//! # Convergence Module
//!
//! Error metrics and convergence-order estimation for grid refinement
//! studies.
//!
//! The sweep runner drives the external engine over a ladder of grid
//! resolutions for every (geometry, reaction rate, stencil width)
//! combination. Each point yields the spatially averaged RMSD between the
//! simulated and the analytic field, normalized by the absolute tolerance.
//! A log-log linear fit over the first `nfit` resolutions of each series
//! estimates the empirical convergence order:
//!
//! ```text
//! log(err) = slope * log(N) + intercept,    order = -slope
//! ```
//!
//! Only a prefix of the ladder is fitted: high-order stencils hit the error
//! floor set by the integration tolerances after a few refinements, and
//! including the flat tail would bias the slope toward zero. Expected orders
//! are 2, 4 and 6 for stencil widths 3, 5 and 7.
//!
//! A non-converged integration is recorded for its (triple, N) point and
//! excluded from the series; the sweep continues over all remaining
//! combinations.

pub mod error_metrics;
pub mod regression;
pub mod sweep;
mod convergence_tests;
