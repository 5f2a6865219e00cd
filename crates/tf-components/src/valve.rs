//! Valve branch: ideal flow with an optional loss coefficient when open.
//!
//! A closed valve is represented by marking its branch out-of-service so
//! the connectivity check isolates whatever it disconnects, rather than by
//! a separate "closed" residual law.

use crate::common::EPSILON_MDOT;
use crate::error::ComponentResult;
use crate::traits::{BranchModel, HydraulicContext, HydraulicResidual, ThermalContext};
use tf_core::units::Temperature;
use tf_fluids::PtState;

#[derive(Debug, Clone)]
pub struct Valve {
    name: String,
    /// Loss coefficient (0 for an ideal, lossless open valve).
    pub loss_coefficient: f64,
}

impl Valve {
    pub fn new(name: impl Into<String>, loss_coefficient: f64) -> Self {
        Self {
            name: name.into(),
            loss_coefficient,
        }
    }
}

impl BranchModel for Valve {
    fn name(&self) -> &str {
        &self.name
    }

    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual> {
        if self.loss_coefficient.abs() < f64::EPSILON || ctx.mdot.value.abs() < EPSILON_MDOT {
            return Ok(HydraulicResidual {
                value: ctx.p_from.value - ctx.p_to.value,
                d_p_from: 1.0,
                d_p_to: -1.0,
                d_mdot: 0.0,
            });
        }

        let p_avg = tf_core::units::pa(0.5 * (ctx.p_from.value + ctx.p_to.value));
        let state = PtState::new(p_avg, ctx.t_from)?;
        let rho = ctx.fluid.density(state)?.value;

        // No geometry is carried on a valve beyond its loss coefficient, so
        // the loss term is expressed directly in terms of mdot rather than
        // a velocity through an explicit flow area.
        let coeff = self.loss_coefficient * rho.recip();
        let term = coeff * ctx.mdot.value * ctx.mdot.value.abs();
        let value = ctx.p_from.value - ctx.p_to.value - term;
        let d_mdot = -coeff * 2.0 * ctx.mdot.value.abs();

        Ok(HydraulicResidual {
            value,
            d_p_from: 1.0,
            d_p_to: -1.0,
            d_mdot,
        })
    }

    fn outlet_temperature(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Temperature> {
        // Valves do not adapt temperature by contract.
        Ok(ctx.t_in)
    }
}
