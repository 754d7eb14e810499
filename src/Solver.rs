//! # Solver Module
//!
//! Contract for the external reaction-diffusion engine.
//!
//! The spatial discretization and stiff time integration are not implemented
//! in this crate; they are reached through the [`solver_api::ReactionDiffusionSolver`]
//! trait. [`rd_system::RdSpec`] carries everything the engine needs: species
//! and reactions, diffusion coefficients, the grid, transform flags, stencil
//! width, boundary reflection flags and the modulated-reaction mechanism.
//!
//! The modulated-reaction mechanism (a per-cell multiplier applied to
//! selected reaction rates) is how a Dirichlet-like boundary source is
//! expressed to an engine that has no native source-term support: an inert
//! tracer species with a large concentration in the first cell is converted
//! into the target species only there.
//!
//! [`manufactured::ManufacturedSolver`] is a deterministic stand-in used by
//! the CLI demos and the test suite: it returns the analytic field plus a
//! controlled truncation-error term, so the whole sweep pipeline can be
//! exercised without a numerical engine.

pub mod manufactured;
pub mod rd_system;
pub mod solver_api;
mod solver_tests;
