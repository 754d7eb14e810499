use super::special::erfc;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error types for the analytic reference model and grid generation
#[derive(Debug, Error)]
pub enum ModelError {
    /// Invalid mathematical input, e.g. a non-positive time point
    #[error("Domain error: {0}")]
    DomainError(String),
    #[error("Missing data: {0}")]
    MissingData(String),
}

/// Geometry of the 1-D domain. Selected once per sweep branch.
///
/// For the constant-surface-concentration boundary condition the analytic
/// formula is geometry-independent; geometry is forwarded to the external
/// solver, which discretizes the Laplacian accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Geometry {
    Planar,
    Cylindrical,
    Spherical,
}

impl Geometry {
    /// All geometries in sweep order
    pub fn all() -> [Geometry; 3] {
        [Geometry::Planar, Geometry::Cylindrical, Geometry::Spherical]
    }

    /// Parse from a full name or a one-letter symbol ("p", "c", "s")
    pub fn from_name(name: &str) -> Result<Self, ModelError> {
        match name.trim().to_lowercase().as_str() {
            "p" | "f" | "planar" | "flat" => Ok(Geometry::Planar),
            "c" | "cylindrical" => Ok(Geometry::Cylindrical),
            "s" | "spherical" => Ok(Geometry::Spherical),
            other => Err(ModelError::DomainError(format!(
                "Unknown geometry: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Geometry::Planar => "planar",
            Geometry::Cylindrical => "cylindrical",
            Geometry::Spherical => "spherical",
        };
        write!(f, "{}", name)
    }
}

/// Closed-form concentration field for diffusion from a surface held at
/// constant concentration:
///
/// ```text
/// c(x, t) = c_s * erfc( x / (2*sqrt(D*t)) )
/// ```
///
/// Pure function of its inputs; no side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct AnalyticSurfaceModel {
    /// Diffusion coefficient (m²/s), must be positive
    pub D: f64,
    /// Surface concentration c_s
    pub surface_conc: f64,
    /// When set, coordinates are interpreted as ln(x) and exponentiated
    /// before evaluation
    pub logx: bool,
}

impl AnalyticSurfaceModel {
    #[allow(non_snake_case)]
    pub fn new(D: f64, surface_conc: f64, logx: bool) -> Self {
        Self {
            D,
            surface_conc,
            logx,
        }
    }

    /// Evaluate the field at the given coordinates and time points.
    ///
    /// Returns a matrix with one row per time point and one column per
    /// coordinate. Fails with [`ModelError::DomainError`] when `D <= 0` or
    /// any `t <= 0` (a zero initial time corresponds to a Dirac delta
    /// profile, which cannot be represented on a grid).
    pub fn evaluate(&self, x: &[f64], t: &[f64]) -> Result<DMatrix<f64>, ModelError> {
        if !(self.D > 0.0) {
            return Err(ModelError::DomainError(format!(
                "Diffusion coefficient must be positive, got {}",
                self.D
            )));
        }
        if x.is_empty() || t.is_empty() {
            return Err(ModelError::MissingData(
                "Empty coordinate or time sequence".to_string(),
            ));
        }
        for &ti in t {
            if !(ti > 0.0) {
                return Err(ModelError::DomainError(format!(
                    "t == {} is not allowed: t0 == 0 gives a Dirac delta C0 profile",
                    ti
                )));
            }
        }

        let field = DMatrix::from_fn(t.len(), x.len(), |i, j| {
            let xj = if self.logx { x[j].exp() } else { x[j] };
            self.surface_conc * erfc(xj / (2.0 * (self.D * t[i]).sqrt()))
        });
        Ok(field)
    }
}
