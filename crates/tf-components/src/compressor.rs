//! Compressor branch: fixed pressure ratio Π applied relative to ambient,
//! bypassed (no ratio applied) on reverse flow.

use crate::error::ComponentResult;
use crate::traits::{BranchModel, HydraulicContext, HydraulicResidual, ThermalContext};
use tf_core::units::Temperature;

#[derive(Debug, Clone)]
pub struct Compressor {
    name: String,
    /// Pressure ratio Π (outlet-to-inlet, both referenced to ambient).
    pub pressure_ratio: f64,
}

impl Compressor {
    pub fn new(name: impl Into<String>, pressure_ratio: f64) -> Self {
        Self {
            name: name.into(),
            pressure_ratio,
        }
    }
}

impl BranchModel for Compressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual> {
        let p_amb = ctx.ambient_pressure.value;

        if ctx.mdot.value > 0.0 {
            let value = ctx.p_to.value + p_amb - (ctx.p_from.value + p_amb) * self.pressure_ratio;
            Ok(HydraulicResidual {
                value,
                d_p_from: -self.pressure_ratio,
                d_p_to: 1.0,
                d_mdot: 0.0,
            })
        } else {
            Ok(HydraulicResidual {
                value: ctx.p_to.value - ctx.p_from.value,
                d_p_from: -1.0,
                d_p_to: 1.0,
                d_mdot: 0.0,
            })
        }
    }

    fn outlet_temperature(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Temperature> {
        Ok(ctx.t_in)
    }

    fn shaft_power(
        &self,
        ctx: &HydraulicContext<'_>,
    ) -> ComponentResult<tf_core::units::Power> {
        use uom::si::power::watt;
        if ctx.mdot.value <= 0.0 {
            return Ok(tf_core::units::Power::new::<watt>(0.0));
        }
        // Adiabatic ideal-gas compression power estimate:
        // P = mdot * cp * T_in * (Π^((γ-1)/γ) - 1); γ is approximated via
        // the fluid's compressibility factor-derived cp/cv is not modeled
        // here, so a representative γ=1.4 (diatomic ideal gas) is used,
        // matching typical natural-gas/air compressor estimates.
        const GAMMA: f64 = 1.4;
        let state = tf_fluids::PtState::new(ctx.p_from, ctx.t_from)?;
        let cp = ctx.fluid.heat_capacity(state)?;
        let exponent = (GAMMA - 1.0) / GAMMA;
        let power = ctx.mdot.value * cp * ctx.t_from.value * (self.pressure_ratio.powf(exponent) - 1.0);
        Ok(tf_core::units::Power::new::<watt>(power))
    }
}
