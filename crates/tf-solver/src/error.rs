//! Error types for network solving.

use tf_components::ComponentError;
use tf_core::error::TfError;
use tf_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while running `pipeflow`.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Pre-solve: missing junction references, malformed element rows, no junctions.
    #[error("Invalid topology: {what}")]
    InvalidTopology { what: String },

    /// Post connectivity-check: no reachable P-fixed node (or, in thermal
    /// mode, no reachable T-fixed node).
    #[error("No slack: {what}")]
    NoSlack { what: String },

    /// Hydraulic Newton iteration cap hit with residuals above tolerance.
    #[error("Hydraulic solve did not converge: residual norm {last_residual:e}")]
    NoConvergence { last_residual: f64 },

    /// Thermal Newton iteration cap hit with residuals above tolerance.
    #[error("Thermal solve did not converge: residual norm {last_residual:e}")]
    ThermalNoConvergence { last_residual: f64 },

    /// Zero mass flow on a thermally active branch under the strict policy.
    #[error("Thermal singularity on branch {branch}: |mdot| below tol_m")]
    ThermalSingularity { branch: String },

    /// NaN, singular factorization, or other unrecoverable numerical failure.
    #[error("Solver error: {what}")]
    SolverError { what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Graph error: {0}")]
    Graph(#[from] tf_graph::GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for TfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::InvalidTopology { .. } => TfError::InvalidArg {
                what: "invalid topology",
            },
            SolverError::NoSlack { .. } => TfError::InvalidArg { what: "no slack" },
            SolverError::NoConvergence { .. } => TfError::InvalidArg {
                what: "hydraulic convergence",
            },
            SolverError::ThermalNoConvergence { .. } => TfError::InvalidArg {
                what: "thermal convergence",
            },
            SolverError::ThermalSingularity { .. } => TfError::InvalidArg {
                what: "thermal singularity",
            },
            SolverError::SolverError { .. } => TfError::InvalidArg { what: "solver" },
            SolverError::Component(_) => TfError::InvalidArg { what: "component" },
            SolverError::Fluid(_) => TfError::InvalidArg { what: "fluid" },
            SolverError::Graph(_) => TfError::InvalidArg { what: "graph" },
        }
    }
}
