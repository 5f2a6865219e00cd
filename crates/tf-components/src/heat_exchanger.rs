//! Heat exchanger / heat consumer: a zero-length branch with an optional
//! loss coefficient and a thermal control mode — either a fixed heat
//! injection or a fixed outlet temperature setpoint.

use crate::common::EPSILON_MDOT;
use crate::error::ComponentResult;
use crate::traits::{BranchModel, HydraulicContext, HydraulicResidual, ThermalContext};
use tf_core::units::{k, Power, Temperature};
use tf_fluids::PtState;
use uom::si::power::watt;

/// How a heat exchanger's thermal behavior is controlled.
#[derive(Debug, Clone, Copy)]
pub enum ThermalControl {
    /// Fixed heat injection rate [W]; outlet temperature is derived from
    /// the energy balance `T_out = T_in + Q / (mdot * cp)`.
    HeatRate(f64),
    /// Fixed outlet temperature setpoint; `heat_rate` is derived from the
    /// same energy balance in reverse. The setpoint is always honored,
    /// independent of any stored heat-rate value.
    OutletTemperature(Temperature),
}

#[derive(Debug, Clone)]
pub struct HeatExchanger {
    name: String,
    pub loss_coefficient: f64,
    pub control: ThermalControl,
}

impl HeatExchanger {
    pub fn new(name: impl Into<String>, loss_coefficient: f64, control: ThermalControl) -> Self {
        Self {
            name: name.into(),
            loss_coefficient,
            control,
        }
    }
}

impl BranchModel for HeatExchanger {
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

        let coeff = self.loss_coefficient / rho;
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
        match self.control {
            ThermalControl::OutletTemperature(setpoint) => Ok(setpoint),
            ThermalControl::HeatRate(q_w) => {
                if ctx.mdot.value.abs() < EPSILON_MDOT {
                    return Ok(ctx.t_in);
                }
                let state = PtState::new(ctx.avg_pressure, ctx.t_in)?;
                let cp = ctx.fluid.heat_capacity(state)?;
                let delta_t = q_w / (ctx.mdot.value.abs() * cp);
                Ok(k(ctx.t_in.value + delta_t))
            }
        }
    }

    fn heat_rate(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Power> {
        match self.control {
            ThermalControl::HeatRate(q_w) => Ok(Power::new::<watt>(q_w)),
            ThermalControl::OutletTemperature(setpoint) => {
                if ctx.mdot.value.abs() < EPSILON_MDOT {
                    return Ok(Power::new::<watt>(0.0));
                }
                let state = PtState::new(ctx.avg_pressure, ctx.t_in)?;
                let cp = ctx.fluid.heat_capacity(state)?;
                let q_w = ctx.mdot.value.abs() * cp * (setpoint.value - ctx.t_in.value);
                Ok(Power::new::<watt>(q_w))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_core::units::{kgps, pa};
    use tf_fluids::ConstantFluid;

    fn water() -> ConstantFluid {
        ConstantFluid {
            name: "water".into(),
            rho_kg_m3: 1000.0,
            mu_pas: 1.0e-3,
            cp_j_per_kg_k: 4184.0,
            z: 1.0,
            molar_mass_kg_per_mol: 0.018,
            gas_mode: false,
        }
    }

    #[test]
    fn heat_rate_mode_raises_outlet_temperature() {
        let hx = HeatExchanger::new("hx1", 0.0, ThermalControl::HeatRate(100_000.0));
        let fluid = water();
        let ctx = ThermalContext {
            t_in: k(305.86),
            mdot: kgps(20.0),
            fluid: &fluid,
            ambient_temperature: k(293.15),
            avg_pressure: pa(5e5),
        };
        let t_out = hx.outlet_temperature(&ctx).unwrap();
        assert!(t_out.value > 305.86);
    }

    #[test]
    fn zero_heat_rate_does_not_override_temperature_setpoint() {
        let hx = HeatExchanger::new(
            "hx1",
            0.0,
            ThermalControl::OutletTemperature(k(310.0)),
        );
        let fluid = water();
        let ctx = ThermalContext {
            t_in: k(300.0),
            mdot: kgps(10.0),
            fluid: &fluid,
            ambient_temperature: k(293.15),
            avg_pressure: pa(5e5),
        };
        let t_out = hx.outlet_temperature(&ctx).unwrap();
        assert_eq!(t_out.value, 310.0);
    }
}
