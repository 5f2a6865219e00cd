//! Tagged-variant dispatch over the branch component kinds.
//!
//! The solver iterates over branches grouped by kind and calls into each
//! kind's residual/derivative law directly through this enum rather than
//! through a `dyn BranchModel` vtable, keeping assembly cache-friendly for
//! the dominant pipe case.

use crate::circulation_pump::{CirculationPumpMass, CirculationPumpPressure};
use crate::compressor::Compressor;
use crate::controller::{FlowController, PressureController};
use crate::error::ComponentResult;
use crate::heat_exchanger::HeatExchanger;
use crate::pipe::Pipe;
use crate::pump::Pump;
use crate::traits::{BranchModel, HydraulicContext, HydraulicResidual, ThermalContext};
use crate::valve::Valve;
use tf_core::units::{Power, Temperature};
use tf_graph::BranchKind;

/// Owns exactly one concrete component model per branch row.
#[derive(Debug, Clone)]
pub enum AnyBranchComponent {
    Pipe(Pipe),
    Valve(Valve),
    Pump(Pump),
    Compressor(Compressor),
    PressureController(PressureController),
    FlowController(FlowController),
    HeatExchanger(HeatExchanger),
    CirculationPumpMass(CirculationPumpMass),
    CirculationPumpPressure(CirculationPumpPressure),
}

impl AnyBranchComponent {
    pub fn kind(&self) -> BranchKind {
        match self {
            AnyBranchComponent::Pipe(_) => BranchKind::Pipe,
            AnyBranchComponent::Valve(_) => BranchKind::Valve,
            AnyBranchComponent::Pump(_) => BranchKind::Pump,
            AnyBranchComponent::Compressor(_) => BranchKind::Compressor,
            AnyBranchComponent::PressureController(_) => BranchKind::PressureController,
            AnyBranchComponent::FlowController(_) => BranchKind::FlowController,
            AnyBranchComponent::HeatExchanger(_) => BranchKind::HeatExchanger,
            AnyBranchComponent::CirculationPumpMass(_) => BranchKind::CirculationPumpMass,
            AnyBranchComponent::CirculationPumpPressure(_) => {
                BranchKind::CirculationPumpPressure
            }
        }
    }
}

impl BranchModel for AnyBranchComponent {
    fn name(&self) -> &str {
        match self {
            AnyBranchComponent::Pipe(c) => c.name(),
            AnyBranchComponent::Valve(c) => c.name(),
            AnyBranchComponent::Pump(c) => c.name(),
            AnyBranchComponent::Compressor(c) => c.name(),
            AnyBranchComponent::PressureController(c) => c.name(),
            AnyBranchComponent::FlowController(c) => c.name(),
            AnyBranchComponent::HeatExchanger(c) => c.name(),
            AnyBranchComponent::CirculationPumpMass(c) => c.name(),
            AnyBranchComponent::CirculationPumpPressure(c) => c.name(),
        }
    }

    fn hydraulic_residual(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<HydraulicResidual> {
        match self {
            AnyBranchComponent::Pipe(c) => c.hydraulic_residual(ctx),
            AnyBranchComponent::Valve(c) => c.hydraulic_residual(ctx),
            AnyBranchComponent::Pump(c) => c.hydraulic_residual(ctx),
            AnyBranchComponent::Compressor(c) => c.hydraulic_residual(ctx),
            AnyBranchComponent::PressureController(c) => c.hydraulic_residual(ctx),
            AnyBranchComponent::FlowController(c) => c.hydraulic_residual(ctx),
            AnyBranchComponent::HeatExchanger(c) => c.hydraulic_residual(ctx),
            AnyBranchComponent::CirculationPumpMass(c) => c.hydraulic_residual(ctx),
            AnyBranchComponent::CirculationPumpPressure(c) => c.hydraulic_residual(ctx),
        }
    }

    fn outlet_temperature(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Temperature> {
        match self {
            AnyBranchComponent::Pipe(c) => c.outlet_temperature(ctx),
            AnyBranchComponent::Valve(c) => c.outlet_temperature(ctx),
            AnyBranchComponent::Pump(c) => c.outlet_temperature(ctx),
            AnyBranchComponent::Compressor(c) => c.outlet_temperature(ctx),
            AnyBranchComponent::PressureController(c) => c.outlet_temperature(ctx),
            AnyBranchComponent::FlowController(c) => c.outlet_temperature(ctx),
            AnyBranchComponent::HeatExchanger(c) => c.outlet_temperature(ctx),
            AnyBranchComponent::CirculationPumpMass(c) => c.outlet_temperature(ctx),
            AnyBranchComponent::CirculationPumpPressure(c) => c.outlet_temperature(ctx),
        }
    }

    fn heat_rate(&self, ctx: &ThermalContext<'_>) -> ComponentResult<Power> {
        match self {
            AnyBranchComponent::HeatExchanger(c) => c.heat_rate(ctx),
            AnyBranchComponent::Pipe(c) => c.heat_rate(ctx),
            AnyBranchComponent::Valve(c) => c.heat_rate(ctx),
            AnyBranchComponent::Pump(c) => c.heat_rate(ctx),
            AnyBranchComponent::Compressor(c) => c.heat_rate(ctx),
            AnyBranchComponent::PressureController(c) => c.heat_rate(ctx),
            AnyBranchComponent::FlowController(c) => c.heat_rate(ctx),
            AnyBranchComponent::CirculationPumpMass(c) => c.heat_rate(ctx),
            AnyBranchComponent::CirculationPumpPressure(c) => c.heat_rate(ctx),
        }
    }

    fn shaft_power(&self, ctx: &HydraulicContext<'_>) -> ComponentResult<Power> {
        match self {
            AnyBranchComponent::Pump(c) => c.shaft_power(ctx),
            AnyBranchComponent::Compressor(c) => c.shaft_power(ctx),
            AnyBranchComponent::Pipe(c) => c.shaft_power(ctx),
            AnyBranchComponent::Valve(c) => c.shaft_power(ctx),
            AnyBranchComponent::PressureController(c) => c.shaft_power(ctx),
            AnyBranchComponent::FlowController(c) => c.shaft_power(ctx),
            AnyBranchComponent::HeatExchanger(c) => c.shaft_power(ctx),
            AnyBranchComponent::CirculationPumpMass(c) => c.shaft_power(ctx),
            AnyBranchComponent::CirculationPumpPressure(c) => c.shaft_power(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::friction::FrictionModel;
    use tf_core::units::m;

    #[test]
    fn kind_matches_variant() {
        let pipe = AnyBranchComponent::Pipe(Pipe::new(
            "p1",
            m(10.0),
            m(0.1),
            m(0.0002),
            0.0,
            FrictionModel::Nikuradse,
            0.0,
        ));
        assert_eq!(pipe.kind(), BranchKind::Pipe);
    }
}
