use crate::Diffusion::analytic_model::Geometry;
use crate::Diffusion::grid::GridSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for the external solver boundary
#[derive(Debug, Error)]
pub enum SolverError {
    /// The integration did not converge for one sweep point. Scoped to that
    /// point: the sweep records it and continues.
    #[error("Solver failure: {0}")]
    NonConvergence(String),
    /// The system specification itself is malformed; aborts the run.
    #[error("Invalid solver specification: {0}")]
    InvalidSpec(String),
}

/// Explicit unit scaling configuration.
///
/// Replaces a default-dictionary unit mapping: only the recognized keys are
/// enumerated, each with a documented default of 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnitScaling {
    /// Scaling of the amount-of-substance unit
    pub amount: f64,
}

impl Default for UnitScaling {
    fn default() -> Self {
        Self { amount: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JacobianMode {
    Analytic,
    Numerical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationMethod {
    Bdf,
    Adams,
}

impl IntegrationMethod {
    pub fn from_name(name: &str) -> Result<Self, SolverError> {
        match name.trim().to_lowercase().as_str() {
            "bdf" => Ok(IntegrationMethod::Bdf),
            "adams" => Ok(IntegrationMethod::Adams),
            other => Err(SolverError::InvalidSpec(format!(
                "Unknown integration method: {}",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntegrationMethod::Bdf => "bdf",
            IntegrationMethod::Adams => "adams",
        }
    }
}

/// Full specification of a reaction-diffusion system handed to the external
/// engine.
///
/// Reactions are given by parallel stoichiometry lists: reaction `j` consumes
/// the species in `stoich_reac[j]` and produces those in `stoich_prod[j]`
/// with rate constant `k[j]`. Reactions listed in `modulated_rxns` have
/// their rate multiplied per cell by the matching row of `modulation`.
#[derive(Debug, Clone)]
#[allow(non_snake_case)]
pub struct RdSpec {
    pub n_species: usize,
    pub stoich_reac: Vec<Vec<usize>>,
    pub stoich_prod: Vec<Vec<usize>>,
    /// Rate constants, one per reaction
    pub k: Vec<f64>,
    /// Diffusion coefficients, one per species
    pub D: Vec<f64>,
    pub geometry: Geometry,
    pub grid: GridSpec,
    /// Integrate ln(c) instead of c
    pub logy: bool,
    /// Integrate in ln(t)
    pub logt: bool,
    /// Spatial coordinate is ln(x)
    pub logx: bool,
    /// Stencil width: 3, 5 or 7 grid points per derivative approximation
    pub nstencil: usize,
    /// Reflective left/right boundary (as opposed to interpolating)
    pub lrefl: bool,
    pub rrefl: bool,
    /// Indices into the reaction list of modulated reactions
    pub modulated_rxns: Vec<usize>,
    /// Per-cell multiplier for each modulated reaction, row length N
    pub modulation: Vec<Vec<f64>>,
    pub units: UnitScaling,
}

impl RdSpec {
    pub fn n(&self) -> usize {
        self.grid.n()
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if self.n_species == 0 {
            return Err(SolverError::InvalidSpec(
                "System needs at least one species".to_string(),
            ));
        }
        let n_rxn = self.k.len();
        if self.stoich_reac.len() != n_rxn || self.stoich_prod.len() != n_rxn {
            return Err(SolverError::InvalidSpec(format!(
                "Stoichiometry lists ({}, {}) do not match {} rate constants",
                self.stoich_reac.len(),
                self.stoich_prod.len(),
                n_rxn
            )));
        }
        if self.D.len() != self.n_species {
            return Err(SolverError::InvalidSpec(format!(
                "{} diffusion coefficients for {} species",
                self.D.len(),
                self.n_species
            )));
        }
        for row in self.stoich_reac.iter().chain(self.stoich_prod.iter()) {
            if row.iter().any(|&s| s >= self.n_species) {
                return Err(SolverError::InvalidSpec(
                    "Stoichiometry references unknown species".to_string(),
                ));
            }
        }
        if !matches!(self.nstencil, 3 | 5 | 7) {
            return Err(SolverError::InvalidSpec(format!(
                "Stencil width must be 3, 5 or 7, got {}",
                self.nstencil
            )));
        }
        if self.n() < self.nstencil {
            return Err(SolverError::InvalidSpec(format!(
                "Grid of {} cells too small for a {}-point stencil",
                self.n(),
                self.nstencil
            )));
        }
        if self.modulated_rxns.len() != self.modulation.len() {
            return Err(SolverError::InvalidSpec(format!(
                "{} modulated reactions with {} modulation rows",
                self.modulated_rxns.len(),
                self.modulation.len()
            )));
        }
        for (&rxn, row) in self.modulated_rxns.iter().zip(self.modulation.iter()) {
            if rxn >= n_rxn {
                return Err(SolverError::InvalidSpec(format!(
                    "Modulated reaction index {} out of range",
                    rxn
                )));
            }
            if row.len() != self.n() {
                return Err(SolverError::InvalidSpec(format!(
                    "Modulation row has {} entries for {} cells",
                    row.len(),
                    self.n()
                )));
            }
        }
        self.grid
            .validate()
            .map_err(|e| SolverError::InvalidSpec(e.to_string()))?;
        Ok(())
    }
}
