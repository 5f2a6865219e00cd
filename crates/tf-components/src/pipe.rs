//! Pipe branch: Darcy-Weisbach pressure drop plus exponential thermal decay.

use crate::common::{check_finite, EPSILON_MDOT};
use crate::error::ComponentResult;
use crate::friction::FrictionModel;
use crate::traits::{BranchModel, HydraulicContext, HydraulicResidual, ThermalContext};
use tf_core::units::constants::G0_MPS2;
use tf_core::units::{k, Length, Temperature};
use tf_fluids::PtState;

/// A single pipe section (one row in the network's branch table — a
/// multi-section pipe is expanded into several of these before it ever
/// reaches the solver).
#[derive(Debug, Clone)]
pub struct Pipe {
    name: String,
    pub length: Length,
    pub diameter: Length,
    pub roughness: Length,
    pub k_minor: f64,
    pub friction: FrictionModel,
    /// Heat-transfer coefficient to ambient [W/(m^2*K)].
    pub heat_transfer_coeff: f64,
}

impl Pipe {
    pub fn new(
        name: impl Into<String>,
        length: Length,
        diameter: Length,
        roughness: Length,
        k_minor: f64,
        friction: FrictionModel,
        heat_transfer_coeff: f64,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            diameter,
            roughness,
            k_minor,
            friction,
            heat_transfer_coeff,
        }
    }

    fn area_m2(&self) -> f64 {
        std::f64::consts::PI * self.diameter.value.powi(2) / 4.0
    }
}

impl BranchModel for Pipe {
    fn name(&self) -> &str {
        &self.name
    }

    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual> {
        let area = self.area_m2();
        let mdot = ctx.mdot.value;

        // Evaluate density at the branch's average state; for incompressible
        // fluids this collapses to the inlet density, for gases it captures
        // most of the along-pipe compressibility effect without carrying a
        // separate reference-state unknown.
        let p_avg = tf_core::units::pa(0.5 * (ctx.p_from.value + ctx.p_to.value));
        let state = PtState::new(p_avg, ctx.t_from)?;
        let rho = ctx.fluid.density(state)?.value;
        check_finite(rho, "pipe density")?;

        let velocity = mdot / (rho * area);
        let reynolds = rho * velocity.abs() * self.diameter.value
            / ctx.fluid.viscosity(state)?.value;
        let relative_roughness = self.roughness.value / self.diameter.value;

        let lambda = if mdot.abs() < EPSILON_MDOT {
            0.0
        } else {
            self.friction.darcy_friction_factor(reynolds, relative_roughness)?
        };

        let dh = self.height_drop_m(ctx);
        let gravity_term = rho * G0_MPS2 * dh;

        let coeff = rho * (lambda * self.length.value / self.diameter.value + self.k_minor) / 2.0;
        let friction_term = coeff * velocity * velocity.abs();

        let value = ctx.p_from.value - ctx.p_to.value - gravity_term - friction_term;
        check_finite(value, "pipe hydraulic residual")?;

        // d(friction_term)/d(mdot): velocity = mdot/(rho*area), so
        // d(v*|v|)/dmdot = 2*|v|/(rho*area). Friction factor is held fixed
        // at its value for the current Newton iterate (frozen-lambda
        // linearization), matching how implicit-friction solvers in this
        // family avoid differentiating through the inner Colebrook loop.
        let d_mdot = -coeff * 2.0 * velocity.abs() / (rho * area);

        Ok(HydraulicResidual {
            value,
            d_p_from: 1.0,
            d_p_to: -1.0,
            d_mdot,
        })
    }

    fn outlet_temperature(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Temperature> {
        if ctx.mdot.value.abs() < EPSILON_MDOT {
            // Zero-flow thermal singularity: caller (thermal solver) is
            // responsible for detecting this and applying the warn-and-skip
            // policy; this still returns a well-defined value.
            return Ok(ctx.t_in);
        }

        let state = PtState::new(ctx.avg_pressure, ctx.t_in)?;
        let cp = ctx.fluid.heat_capacity(state)?;
        let perimeter = std::f64::consts::PI * self.diameter.value;
        let exponent = -self.heat_transfer_coeff * perimeter * self.length.value
            / (ctx.mdot.value.abs() * cp);

        let t_amb = ctx.ambient_temperature.value;
        let t_out = t_amb + (ctx.t_in.value - t_amb) * exponent.exp();
        Ok(k(t_out))
    }
}

impl Pipe {
    fn height_drop_m(&self, ctx: &HydraulicContext<'_>) -> f64 {
        ctx.height_to_m - ctx.height_from_m
    }
}
