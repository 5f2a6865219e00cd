//! Circulation pumps: boundary sources that drive mass around a closed
//! loop (typically a heating network) rather than responding to a flow
//! characteristic curve.

use crate::error::ComponentResult;
use crate::traits::{BranchModel, HydraulicContext, HydraulicResidual, ThermalContext};
use tf_core::units::{MassRate, Pressure, Temperature};

/// Fixes the branch's mass flow to a target, like a `FlowController`, but
/// additionally injects fluid at a fixed supply temperature rather than
/// passing through the upstream temperature unchanged.
#[derive(Debug, Clone)]
pub struct CirculationPumpMass {
    name: String,
    pub target_mdot: MassRate,
    pub t_flow: Temperature,
}

impl CirculationPumpMass {
    pub fn new(name: impl Into<String>, target_mdot: MassRate, t_flow: Temperature) -> Self {
        Self {
            name: name.into(),
            target_mdot,
            t_flow,
        }
    }
}

impl BranchModel for CirculationPumpMass {
    fn name(&self) -> &str {
        &self.name
    }

    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual> {
        Ok(HydraulicResidual {
            value: ctx.mdot.value - self.target_mdot.value,
            d_p_from: 0.0,
            d_p_to: 0.0,
            d_mdot: 1.0,
        })
    }

    fn outlet_temperature(&self, _ctx: &ThermalContext<'_>) -> ComponentResult<Temperature> {
        Ok(self.t_flow)
    }
}

/// Fixed pressure lift between return and flow sides, independent of
/// flow rate (unlike `Pump`'s polynomial curve).
#[derive(Debug, Clone)]
pub struct CirculationPumpPressure {
    name: String,
    pub lift: Pressure,
    pub t_flow: Temperature,
}

impl CirculationPumpPressure {
    pub fn new(name: impl Into<String>, lift: Pressure, t_flow: Temperature) -> Self {
        Self {
            name: name.into(),
            lift,
            t_flow,
        }
    }
}

impl BranchModel for CirculationPumpPressure {
    fn name(&self) -> &str {
        &self.name
    }

    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual> {
        Ok(HydraulicResidual {
            value: ctx.p_to.value - ctx.p_from.value - self.lift.value,
            d_p_from: -1.0,
            d_p_to: 1.0,
            d_mdot: 0.0,
        })
    }

    fn outlet_temperature(&self, _ctx: &ThermalContext<'_>) -> ComponentResult<Temperature> {
        Ok(self.t_flow)
    }
}
