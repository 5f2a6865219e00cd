//! Pump branch: polynomial pressure-lift curve, clipped to non-negative
//! lift and bypassed entirely outside its rated flow range.

use crate::error::{ComponentError, ComponentResult};
use crate::traits::{BranchModel, HydraulicContext, HydraulicResidual, ThermalContext};
use tf_core::units::{Power, Temperature};
use uom::si::power::watt;

/// Pressure lift Δp = poly(v), v in m/s, coefficients lowest-degree first.
#[derive(Debug, Clone)]
pub struct Pump {
    name: String,
    pub area_m2: f64,
    pub poly_coeffs: Vec<f64>,
    pub v_max_m_s: f64,
    pub eta: f64,
}

impl Pump {
    pub fn new(
        name: impl Into<String>,
        area_m2: f64,
        poly_coeffs: Vec<f64>,
        v_max_m_s: f64,
        eta: f64,
    ) -> ComponentResult<Self> {
        if area_m2 <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "pump flow area must be positive",
            });
        }
        if eta <= 0.0 || eta > 1.0 {
            return Err(ComponentError::InvalidArg {
                what: "pump efficiency must be in (0,1]",
            });
        }
        Ok(Self {
            name: name.into(),
            area_m2,
            poly_coeffs,
            v_max_m_s,
            eta,
        })
    }

    fn eval_poly(&self, v: f64) -> f64 {
        let mut acc = 0.0;
        for &c in self.poly_coeffs.iter().rev() {
            acc = acc * v + c;
        }
        acc
    }

    /// Pressure lift and its derivative w.r.t. velocity, with the
    /// bypass-to-zero rule applied for reverse or over-rated flow.
    fn lift_and_derivative(&self, v: f64) -> (f64, f64) {
        if v < 0.0 || v > self.v_max_m_s {
            return (0.0, 0.0);
        }
        let lift = self.eval_poly(v).max(0.0);
        if lift <= 0.0 {
            return (0.0, 0.0);
        }
        let mut d_acc = 0.0;
        for (degree, &c) in self.poly_coeffs.iter().enumerate().skip(1) {
            d_acc += degree as f64 * c * v.powi(degree as i32 - 1);
        }
        (lift, d_acc)
    }
}

impl BranchModel for Pump {
    fn name(&self) -> &str {
        &self.name
    }

    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual> {
        let v = ctx.mdot.value / self.area_m2;
        let (lift, d_lift_dv) = self.lift_and_derivative(v);
        let d_mdot = -d_lift_dv / self.area_m2;

        Ok(HydraulicResidual {
            value: ctx.p_to.value - ctx.p_from.value - lift,
            d_p_from: -1.0,
            d_p_to: 1.0,
            d_mdot,
        })
    }

    fn outlet_temperature(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Temperature> {
        // Zero-length branch: no thermal transit time, no compression
        // heating modeled for pumps handling incompressible liquids.
        Ok(ctx.t_in)
    }

    fn shaft_power(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<Power> {
        let v = ctx.mdot.value / self.area_m2;
        let (lift, _) = self.lift_and_derivative(v);
        if lift <= 0.0 {
            return Ok(Power::new::<watt>(0.0));
        }
        let rho = ctx.fluid.density(tf_fluids::PtState::new(ctx.p_from, ctx.t_from)?)?.value;
        let delta_h = lift / rho;
        Ok(Power::new::<watt>(ctx.mdot.value * delta_h / self.eta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_core::units::{k, kgps, pa};
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
    fn reverse_flow_has_zero_lift() {
        let pump = Pump::new("p1", 0.01, vec![200_000.0, -1000.0], 5.0, 0.8).unwrap();
        let fluid = water();
        let ctx = HydraulicContext {
            p_from: pa(2e5),
            p_to: pa(2e5),
            mdot: kgps(-1.0),
            t_from: k(300.0),
            height_from_m: 0.0,
            height_to_m: 0.0,
            fluid: &fluid,
            ambient_pressure: pa(101_325.0),
            ambient_temperature: k(293.15),
        };
        let residual = pump.hydraulic_residual(&ctx).unwrap();
        assert_eq!(residual.value, 0.0);
    }

    #[test]
    fn over_rated_flow_bypasses_to_zero_lift() {
        let pump = Pump::new("p1", 0.01, vec![200_000.0, -1000.0], 5.0, 0.8).unwrap();
        let fluid = water();
        let ctx = HydraulicContext {
            p_from: pa(2e5),
            p_to: pa(2e5),
            mdot: kgps(60.0), // v = 6000/... definitely over v_max
            t_from: k(300.0),
            height_from_m: 0.0,
            height_to_m: 0.0,
            fluid: &fluid,
            ambient_pressure: pa(101_325.0),
            ambient_temperature: k(293.15),
        };
        let residual = pump.hydraulic_residual(&ctx).unwrap();
        assert_eq!(residual.value, 0.0);
    }

    #[test]
    fn shaft_power_positive_for_forward_flow() {
        let pump = Pump::new("p1", 0.01, vec![200_000.0, -1000.0], 5.0, 0.8).unwrap();
        let fluid = water();
        let ctx = HydraulicContext {
            p_from: pa(2e5),
            p_to: pa(2e5),
            mdot: kgps(0.2),
            t_from: k(300.0),
            height_from_m: 0.0,
            height_to_m: 0.0,
            fluid: &fluid,
            ambient_pressure: pa(101_325.0),
            ambient_temperature: k(293.15),
        };
        let power = pump.shaft_power(&ctx).unwrap();
        assert!(power.value > 0.0);
    }
}
