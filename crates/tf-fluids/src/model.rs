//! Fluid property model trait and validation helpers.

use crate::error::FluidResult;
use crate::state::{PtState, SpecHeatCapacity};
use tf_core::units::{DynVisc, Density, Pressure, Temperature};

/// Cached thermodynamic properties at a single (p, T) state.
///
/// Components that need several properties at the same state (density,
/// viscosity, cp) call `property_pack` once instead of three separate
/// backend queries.
#[derive(Clone, Copy, Debug)]
pub struct ThermoPropertyPack {
    pub p: Pressure,
    pub t: Temperature,
    pub rho: Density,
    pub mu: DynVisc,
    pub cp: SpecHeatCapacity,
    pub z: f64,
}

/// Trait for fluid property models.
///
/// Implementations supply density, dynamic viscosity, specific heat
/// capacity, compressibility factor and molar mass as functions of
/// pressure and temperature, plus a `gas_mode` flag distinguishing
/// compressible (gas) from incompressible (liquid) treatment in the
/// hydraulic solver.
pub trait FluidModel: Send + Sync {
    /// Model name (for result tables / logging).
    fn name(&self) -> &str;

    /// `true` if this fluid should be treated as compressible.
    fn gas_mode(&self) -> bool;

    /// Molar mass \[kg/mol\], assumed constant across the operating range.
    fn molar_mass(&self) -> f64;

    /// Density \[kg/m³\] at (p, T).
    fn density(&self, state: PtState) -> FluidResult<Density>;

    /// Dynamic viscosity \[Pa·s\] at (p, T).
    fn viscosity(&self, state: PtState) -> FluidResult<DynVisc>;

    /// Specific heat capacity at constant pressure \[J/(kg·K)\] at (p, T).
    fn heat_capacity(&self, state: PtState) -> FluidResult<SpecHeatCapacity>;

    /// Compressibility factor Z (dimensionless); 1.0 for an incompressible
    /// liquid or an ideal gas.
    fn compressibility(&self, state: PtState) -> FluidResult<f64>;

    /// Compute all properties at once (default: one call per property).
    fn property_pack(&self, state: PtState) -> FluidResult<ThermoPropertyPack> {
        Ok(ThermoPropertyPack {
            p: state.pressure(),
            t: state.temperature(),
            rho: self.density(state)?,
            mu: self.viscosity(state)?,
            cp: self.heat_capacity(state)?,
            z: self.compressibility(state)?,
        })
    }
}

/// Validation helpers shared by fluid model implementations.
pub(crate) mod validation {
    use super::*;
    use crate::error::FluidError;

    pub fn validate_density(rho: Density) -> FluidResult<()> {
        if !rho.value.is_finite() || rho.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    pub fn validate_viscosity(mu: DynVisc) -> FluidResult<()> {
        if !mu.value.is_finite() || mu.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "viscosity must be positive and finite",
            });
        }
        Ok(())
    }

    pub fn validate_cp(cp: f64) -> FluidResult<()> {
        if !cp.is_finite() || cp <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "cp must be positive and finite",
            });
        }
        Ok(())
    }

    pub fn validate_z(z: f64) -> FluidResult<()> {
        if !z.is_finite() || z <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "compressibility factor must be positive and finite",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use tf_core::units::Density;
    use uom::si::dynamic_viscosity::pascal_second;
    use uom::si::mass_density::kilogram_per_cubic_meter;

    #[test]
    fn validate_density_positive() {
        assert!(validate_density(Density::new::<kilogram_per_cubic_meter>(1000.0)).is_ok());
        assert!(validate_density(Density::new::<kilogram_per_cubic_meter>(-1.0)).is_err());
    }

    #[test]
    fn validate_viscosity_positive() {
        assert!(validate_viscosity(DynVisc::new::<pascal_second>(1e-3)).is_ok());
        assert!(validate_viscosity(DynVisc::new::<pascal_second>(0.0)).is_err());
    }

    #[test]
    fn validate_cp_and_z() {
        assert!(validate_cp(4184.0).is_ok());
        assert!(validate_cp(-1.0).is_err());
        assert!(validate_z(1.0).is_ok());
        assert!(validate_z(f64::NAN).is_err());
    }
}
