//! Pressure and flow controllers: branches that trade their own pressure
//! drop for a fixed target, letting the other hydraulic unknown float
//! free.

use crate::error::ComponentResult;
use crate::traits::{BranchModel, HydraulicContext, HydraulicResidual, ThermalContext};
use tf_core::units::{MassRate, Pressure, Temperature};

/// Fixes downstream (`to`-node) pressure to a target; the branch's own
/// pressure drop (and hence mdot) is the free variable.
#[derive(Debug, Clone)]
pub struct PressureController {
    name: String,
    pub target: Pressure,
}

impl PressureController {
    pub fn new(name: impl Into<String>, target: Pressure) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

impl BranchModel for PressureController {
    fn name(&self) -> &str {
        &self.name
    }

    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual> {
        Ok(HydraulicResidual {
            value: ctx.p_to.value - self.target.value,
            d_p_from: 0.0,
            d_p_to: 1.0,
            d_mdot: 0.0,
        })
    }

    fn outlet_temperature(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Temperature> {
        Ok(ctx.t_in)
    }
}

/// Fixes branch mass flow to a target; pressure drop across the branch is
/// the free variable.
#[derive(Debug, Clone)]
pub struct FlowController {
    name: String,
    pub target: MassRate,
}

impl FlowController {
    pub fn new(name: impl Into<String>, target: MassRate) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

impl BranchModel for FlowController {
    fn name(&self) -> &str {
        &self.name
    }

    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual> {
        Ok(HydraulicResidual {
            value: ctx.mdot.value - self.target.value,
            d_p_from: 0.0,
            d_p_to: 0.0,
            d_mdot: 1.0,
        })
    }

    fn outlet_temperature(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Temperature> {
        Ok(ctx.t_in)
    }
}
