//! Concrete `FluidModel` implementations: constant, linear, tabulated and
//! polynomial closures of (p, T).

use crate::error::{FluidError, FluidResult};
use crate::model::{validation, FluidModel};
use crate::state::{PtState, SpecHeatCapacity};
use tf_core::units::{pa, Density, DynVisc};
use uom::si::dynamic_viscosity::pascal_second;
use uom::si::mass_density::kilogram_per_cubic_meter;

const GAS_CONSTANT_J_PER_MOL_K: f64 = 8.314_462_618;

/// A fluid whose density, viscosity, cp and compressibility are all
/// constant, independent of (p, T). The natural choice for incompressible
/// liquids evaluated near one operating point.
#[derive(Debug, Clone)]
pub struct ConstantFluid {
    pub name: String,
    pub rho_kg_m3: f64,
    pub mu_pas: f64,
    pub cp_j_per_kg_k: f64,
    pub z: f64,
    pub molar_mass_kg_per_mol: f64,
    pub gas_mode: bool,
}

impl FluidModel for ConstantFluid {
    fn name(&self) -> &str {
        &self.name
    }

    fn gas_mode(&self) -> bool {
        self.gas_mode
    }

    fn molar_mass(&self) -> f64 {
        self.molar_mass_kg_per_mol
    }

    fn density(&self, _state: PtState) -> FluidResult<Density> {
        let rho = Density::new::<kilogram_per_cubic_meter>(self.rho_kg_m3);
        validation::validate_density(rho)?;
        Ok(rho)
    }

    fn viscosity(&self, _state: PtState) -> FluidResult<DynVisc> {
        let mu = DynVisc::new::<pascal_second>(self.mu_pas);
        validation::validate_viscosity(mu)?;
        Ok(mu)
    }

    fn heat_capacity(&self, _state: PtState) -> FluidResult<SpecHeatCapacity> {
        validation::validate_cp(self.cp_j_per_kg_k)?;
        Ok(self.cp_j_per_kg_k)
    }

    fn compressibility(&self, _state: PtState) -> FluidResult<f64> {
        validation::validate_z(self.z)?;
        Ok(self.z)
    }
}

/// A fluid whose properties vary linearly with temperature about a
/// reference point; density and viscosity use independent slopes. Good
/// enough to capture thermal expansion/contraction in a heating loop
/// without a full equation of state.
#[derive(Debug, Clone)]
pub struct LinearFluid {
    pub name: String,
    pub t_ref_k: f64,
    pub rho_ref_kg_m3: f64,
    pub d_rho_d_t: f64,
    pub mu_ref_pas: f64,
    pub d_mu_d_t: f64,
    pub cp_j_per_kg_k: f64,
    pub z: f64,
    pub molar_mass_kg_per_mol: f64,
    pub gas_mode: bool,
}

impl FluidModel for LinearFluid {
    fn name(&self) -> &str {
        &self.name
    }

    fn gas_mode(&self) -> bool {
        self.gas_mode
    }

    fn molar_mass(&self) -> f64 {
        self.molar_mass_kg_per_mol
    }

    fn density(&self, state: PtState) -> FluidResult<Density> {
        let dt = state.temperature().value - self.t_ref_k;
        let rho_val = self.rho_ref_kg_m3 + self.d_rho_d_t * dt;
        let rho = Density::new::<kilogram_per_cubic_meter>(rho_val);
        validation::validate_density(rho)?;
        Ok(rho)
    }

    fn viscosity(&self, state: PtState) -> FluidResult<DynVisc> {
        let dt = state.temperature().value - self.t_ref_k;
        let mu_val = self.mu_ref_pas + self.d_mu_d_t * dt;
        let mu = DynVisc::new::<pascal_second>(mu_val);
        validation::validate_viscosity(mu)?;
        Ok(mu)
    }

    fn heat_capacity(&self, _state: PtState) -> FluidResult<SpecHeatCapacity> {
        validation::validate_cp(self.cp_j_per_kg_k)?;
        Ok(self.cp_j_per_kg_k)
    }

    fn compressibility(&self, _state: PtState) -> FluidResult<f64> {
        validation::validate_z(self.z)?;
        Ok(self.z)
    }
}

/// A fluid whose density/viscosity/cp are linearly interpolated from a
/// temperature table at a fixed reference pressure.
#[derive(Debug, Clone)]
pub struct TableFluid {
    pub name: String,
    /// Strictly increasing temperatures [K].
    pub temps_k: Vec<f64>,
    pub rho_kg_m3: Vec<f64>,
    pub mu_pas: Vec<f64>,
    pub cp_j_per_kg_k: Vec<f64>,
    pub z: f64,
    pub molar_mass_kg_per_mol: f64,
    pub gas_mode: bool,
}

impl TableFluid {
    fn interp(&self, t_k: f64, column: &[f64]) -> FluidResult<f64> {
        let temps = &self.temps_k;
        if temps.len() < 2 || column.len() != temps.len() {
            return Err(FluidError::InvalidArg {
                what: "table fluid requires at least two matching rows",
            });
        }
        if t_k < temps[0] || t_k > *temps.last().unwrap() {
            return Err(FluidError::OutOfRange {
                what: "temperature outside fluid table range",
            });
        }
        let idx = temps
            .windows(2)
            .position(|w| t_k >= w[0] && t_k <= w[1])
            .ok_or(FluidError::OutOfRange {
                what: "temperature outside fluid table range",
            })?;
        let (t0, t1) = (temps[idx], temps[idx + 1]);
        let (v0, v1) = (column[idx], column[idx + 1]);
        let frac = if (t1 - t0).abs() < f64::EPSILON {
            0.0
        } else {
            (t_k - t0) / (t1 - t0)
        };
        Ok(v0 + frac * (v1 - v0))
    }
}

impl FluidModel for TableFluid {
    fn name(&self) -> &str {
        &self.name
    }

    fn gas_mode(&self) -> bool {
        self.gas_mode
    }

    fn molar_mass(&self) -> f64 {
        self.molar_mass_kg_per_mol
    }

    fn density(&self, state: PtState) -> FluidResult<Density> {
        let rho_val = self.interp(state.temperature().value, &self.rho_kg_m3)?;
        let rho = Density::new::<kilogram_per_cubic_meter>(rho_val);
        validation::validate_density(rho)?;
        Ok(rho)
    }

    fn viscosity(&self, state: PtState) -> FluidResult<DynVisc> {
        let mu_val = self.interp(state.temperature().value, &self.mu_pas)?;
        let mu = DynVisc::new::<pascal_second>(mu_val);
        validation::validate_viscosity(mu)?;
        Ok(mu)
    }

    fn heat_capacity(&self, state: PtState) -> FluidResult<SpecHeatCapacity> {
        let cp = self.interp(state.temperature().value, &self.cp_j_per_kg_k)?;
        validation::validate_cp(cp)?;
        Ok(cp)
    }

    fn compressibility(&self, _state: PtState) -> FluidResult<f64> {
        validation::validate_z(self.z)?;
        Ok(self.z)
    }
}

/// A compressible-gas model: density follows the real-gas law
/// `rho = p * M / (Z(T) * R * T)` with a polynomial compressibility
/// factor in T; viscosity and cp are also polynomials in T.
#[derive(Debug, Clone)]
pub struct PolynomialFluid {
    pub name: String,
    /// Compressibility-factor polynomial coefficients, lowest degree first.
    pub z_coeffs: Vec<f64>,
    /// Viscosity polynomial coefficients [Pa·s], lowest degree first.
    pub mu_coeffs: Vec<f64>,
    /// Specific heat capacity polynomial coefficients [J/(kg·K)], lowest degree first.
    pub cp_coeffs: Vec<f64>,
    pub molar_mass_kg_per_mol: f64,
    pub gas_mode: bool,
}

fn eval_poly(coeffs: &[f64], x: f64) -> f64 {
    let mut acc = 0.0;
    for &c in coeffs.iter().rev() {
        acc = acc * x + c;
    }
    acc
}

impl FluidModel for PolynomialFluid {
    fn name(&self) -> &str {
        &self.name
    }

    fn gas_mode(&self) -> bool {
        self.gas_mode
    }

    fn molar_mass(&self) -> f64 {
        self.molar_mass_kg_per_mol
    }

    fn density(&self, state: PtState) -> FluidResult<Density> {
        let t = state.temperature().value;
        let z = eval_poly(&self.z_coeffs, t);
        validation::validate_z(z)?;
        let p = state.pressure().value;
        let rho_val =
            p * self.molar_mass_kg_per_mol / (z * GAS_CONSTANT_J_PER_MOL_K * t);
        let rho = Density::new::<kilogram_per_cubic_meter>(rho_val);
        validation::validate_density(rho)?;
        Ok(rho)
    }

    fn viscosity(&self, state: PtState) -> FluidResult<DynVisc> {
        let mu_val = eval_poly(&self.mu_coeffs, state.temperature().value);
        let mu = DynVisc::new::<pascal_second>(mu_val);
        validation::validate_viscosity(mu)?;
        Ok(mu)
    }

    fn heat_capacity(&self, state: PtState) -> FluidResult<SpecHeatCapacity> {
        let cp = eval_poly(&self.cp_coeffs, state.temperature().value);
        validation::validate_cp(cp)?;
        Ok(cp)
    }

    fn compressibility(&self, state: PtState) -> FluidResult<f64> {
        let z = eval_poly(&self.z_coeffs, state.temperature().value);
        validation::validate_z(z)?;
        Ok(z)
    }
}

/// Convenience: a `ConstantFluid` at a single reference pressure/temperature
/// built from molar mass and ideal-gas law, useful for quick gas setups
/// without hand-rolling a `PolynomialFluid`.
pub fn ideal_gas_density_kg_m3(p_pa: f64, t_k: f64, molar_mass_kg_per_mol: f64, z: f64) -> f64 {
    p_pa * molar_mass_kg_per_mol / (z * GAS_CONSTANT_J_PER_MOL_K * t_k)
}
