//! Thermodynamic state definitions.

use crate::error::{FluidError, FluidResult};
use tf_core::units::{Pressure, Temperature};

/// Specific heat capacity [J/(kg·K)]. Not part of uom's standard set, so we
/// use a plain f64 with clear documentation, matching the rest of the
/// solver's internal numerics.
pub type SpecHeatCapacity = f64;

/// A (pressure, temperature) state point at which fluid properties are
/// evaluated. The network has exactly one active fluid per solve (§3), so
/// there is no composition to carry here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PtState {
    p: Pressure,
    t: Temperature,
}

impl PtState {
    /// Create a state from pressure and temperature, validating both are
    /// positive and finite.
    pub fn new(p: Pressure, t: Temperature) -> FluidResult<Self> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(Self { p, t })
    }

    pub fn pressure(&self) -> Pressure {
        self.p
    }

    pub fn temperature(&self) -> Temperature {
        self.t
    }
}
