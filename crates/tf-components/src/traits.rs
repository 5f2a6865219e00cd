//! Core trait for branch component models.

use crate::error::ComponentResult;
use tf_core::units::{MassRate, Power, Pressure, Temperature};
use tf_fluids::FluidModel;
use uom::si::power::watt;

/// Inputs available to a branch's hydraulic residual law.
///
/// `p_from`/`p_to`/`mdot` are the Newton iterate's current guess for this
/// branch; `t_from` is the current estimate of the upstream temperature,
/// used only to evaluate fluid properties (density, viscosity) at the
/// right state, not as an unknown of the hydraulic system.
#[derive(Clone, Copy)]
pub struct HydraulicContext<'a> {
    pub p_from: Pressure,
    pub p_to: Pressure,
    pub mdot: MassRate,
    pub t_from: Temperature,
    pub height_from_m: f64,
    pub height_to_m: f64,
    pub fluid: &'a dyn FluidModel,
    pub ambient_pressure: Pressure,
    pub ambient_temperature: Temperature,
}

/// A branch's momentum-equation residual and its analytic derivatives
/// with respect to the three hydraulic unknowns it touches.
///
/// `value` is zero at a consistent state; units follow the component
/// (pressure-like for pipes/valves/pumps, but flow- or pressure-valued
/// for controllers that fix one of the unknowns directly).
#[derive(Debug, Clone, Copy, Default)]
pub struct HydraulicResidual {
    pub value: f64,
    pub d_p_from: f64,
    pub d_p_to: f64,
    pub d_mdot: f64,
}

/// Inputs available to a branch's thermal closure.
#[derive(Clone, Copy)]
pub struct ThermalContext<'a> {
    pub t_in: Temperature,
    pub mdot: MassRate,
    pub fluid: &'a dyn FluidModel,
    pub ambient_temperature: Temperature,
    pub avg_pressure: Pressure,
}

/// Trait implemented by every branch kind (pipe, valve, pump, compressor,
/// controller, heat exchanger, circulation pump).
///
/// The hydraulic solver calls `hydraulic_residual` once per Newton
/// iteration per branch and assembles the resulting derivatives into the
/// global Jacobian's branch rows. The thermal solver calls
/// `outlet_temperature`/`heat_rate` once branch flow directions are known.
pub trait BranchModel: Send + Sync {
    /// Component name for result tables and logging.
    fn name(&self) -> &str;

    /// Momentum-equation residual, zero at a hydraulically consistent state.
    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual>;

    /// Branch outlet temperature given its inlet temperature and flow.
    fn outlet_temperature(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Temperature>;

    /// Heat added to (positive) or removed from (negative) the fluid.
    /// Zero for components with no thermal exchange.
    fn heat_rate(&self, _ctx: &ThermalContext<'_>) -> ComponentResult<Power> {
        Ok(Power::new::<watt>(0.0))
    }

    /// Shaft power transfer: positive when power is added to the fluid
    /// (pump consuming shaft power), negative when extracted. Zero for
    /// components with no rotating machinery.
    fn shaft_power(&self, _ctx: &HydraulicContext<'_>) -> ComponentResult<Power> {
        Ok(Power::new::<watt>(0.0))
    }
}
