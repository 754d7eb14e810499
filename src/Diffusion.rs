//! # Diffusion Module
//!
//! Closed-form reference solutions and spatial grids for 1-D diffusion from a
//! constant-concentration surface.
//!
//! ## Mathematical Model
//!
//! A semi-infinite medium is kept at a fixed concentration `c_s` at the
//! boundary `x = 0`. The concentration field of the diffusing species is
//!
//! ```text
//! c(x, t) = c_s * erfc( x / (2*sqrt(D*t)) )
//! ```
//!
//! The functional form is the same in planar, cylindrical and spherical
//! geometry for this particular boundary condition; geometry enters only
//! through the coordinate transform (linear or logarithmic spatial
//! coordinate) and through the external solver's discretization.
//!
//! ### Nomenclature
//!
//! | Symbol | Description | Units |
//! |--------|-------------|-------|
//! | `D` | Diffusion coefficient | m²/s |
//! | `c_s` | Surface concentration | M |
//! | `x` | Spatial coordinate (or ln x when logx) | m |
//! | `t` | Time, strictly positive | s |
//!
//! `t = 0` is a singular condition (the profile degenerates to a Dirac
//! delta) and is rejected with a domain error instead of returning NaN.

pub mod analytic_model;
pub mod grid;
pub mod special;
