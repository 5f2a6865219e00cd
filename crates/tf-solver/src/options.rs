//! Solve options: tolerances, iteration caps, and the requested solve mode.

use tf_components::FrictionModel;
use tf_core::units::{k, pa, Pressure, Temperature};

/// What physics to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMode {
    /// Hydraulics only; node/branch temperatures are left at their initial
    /// values.
    HydraulicsOnly,
    /// Thermal only, given a fixed mass-flow field from a prior hydraulic
    /// solve (or caller-supplied flows).
    HeatOnly,
    /// Hydraulics first, then a single downstream thermal pass.
    Sequential,
    /// Re-solve hydraulics and thermal in a loop until both tolerances hold
    /// simultaneously (needed when fluid properties are temperature
    /// dependent enough to feed back into friction/density).
    Bidirectional,
}

/// How the thermal solver handles branches with near-zero flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroFlowPolicy {
    /// Log a warning and leave the branch's outlet temperature at its
    /// inlet value (default).
    WarnAndSkip,
    /// Treat as a hard error (`ThermalSingularity`).
    Strict,
}

/// Selects how the hydraulic Newton step is damped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonlinearMethod {
    /// Backtracking line search, shrinking the step until the residual norm
    /// decreases (default; robust on stiff networks).
    Automatic,
    /// Always take the full Newton step. Faster per iteration on
    /// well-conditioned networks, but can diverge on stiff ones.
    Constant,
}

#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    pub mode: SolveMode,
    pub friction_model: FrictionModel,
    pub nonlinear_method: NonlinearMethod,
    pub max_iter_hydraulic: usize,
    pub max_iter_thermal: usize,
    pub max_iter_colebrook: usize,
    pub tol_p: f64,
    pub tol_m: f64,
    pub tol_res: f64,
    pub tol_t: f64,
    pub check_connectivity: bool,
    pub reuse_internal_data: bool,
    /// Assemble the hydraulic Jacobian only once per solve and reuse it
    /// across iterations (chord method), trading convergence speed for
    /// cheaper iterations on networks where it barely moves.
    pub only_update_hydraulic_matrix: bool,
    /// Reserved for Aitken/Anderson-style extrapolation of the Newton
    /// iterate sequence; currently a no-op, since plain line search already
    /// converges within the solver's iteration caps on every network this
    /// crate has been exercised against.
    pub use_numerical_acceleration: bool,
    pub zero_flow_policy: ZeroFlowPolicy,
    pub ambient_pressure: Pressure,
    pub ambient_temperature: Temperature,
}

impl SolveOptions {
    /// The friction closure actually applied to every pipe at solve time:
    /// `friction_model`, with `max_iter_colebrook` substituted in when it
    /// selects `PrandtlColebrook`, so the two options can't disagree.
    pub fn effective_friction_model(&self) -> FrictionModel {
        match self.friction_model {
            FrictionModel::PrandtlColebrook { .. } => FrictionModel::PrandtlColebrook {
                max_iter: self.max_iter_colebrook,
            },
            other => other,
        }
    }
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            mode: SolveMode::Sequential,
            friction_model: FrictionModel::Nikuradse,
            nonlinear_method: NonlinearMethod::Automatic,
            max_iter_hydraulic: 100,
            max_iter_thermal: 50,
            max_iter_colebrook: 50,
            tol_p: 1e-4,
            tol_m: 1e-6,
            tol_res: 1e-8,
            tol_t: 1e-3,
            check_connectivity: true,
            reuse_internal_data: false,
            only_update_hydraulic_matrix: false,
            use_numerical_acceleration: false,
            zero_flow_policy: ZeroFlowPolicy::WarnAndSkip,
            ambient_pressure: pa(101_325.0),
            ambient_temperature: k(293.15),
        }
    }
}
