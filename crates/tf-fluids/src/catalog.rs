//! Constructors for commonly used named fluids.

use crate::fluids::{PolynomialFluid, TableFluid};
use crate::model::FluidModel;

/// Liquid water, density and viscosity tabulated over 0-100 °C at
/// atmospheric pressure.
pub fn water() -> Box<dyn FluidModel> {
    Box::new(TableFluid {
        name: "water".to_string(),
        temps_k: vec![273.15, 283.15, 293.15, 303.15, 313.15, 333.15, 353.15, 373.15],
        rho_kg_m3: vec![999.8, 999.7, 998.2, 995.6, 992.2, 983.2, 971.8, 958.4],
        mu_pas: vec![
            1.787e-3, 1.307e-3, 1.002e-3, 0.797e-3, 0.653e-3, 0.467e-3, 0.355e-3, 0.282e-3,
        ],
        cp_j_per_kg_k: vec![4217.0, 4193.0, 4184.0, 4180.0, 4179.0, 4185.0, 4196.0, 4217.0],
        z: 1.0,
        molar_mass_kg_per_mol: 0.018_015,
        gas_mode: false,
    })
}

/// Dry air, modeled as an ideal gas with weakly temperature-dependent
/// viscosity and heat capacity (Sutherland-like polynomial fits).
pub fn air() -> Box<dyn FluidModel> {
    Box::new(PolynomialFluid {
        name: "air".to_string(),
        z_coeffs: vec![1.0],
        mu_coeffs: vec![4.11e-6, 4.96e-8],
        cp_coeffs: vec![1006.0, 0.01],
        molar_mass_kg_per_mol: 0.028_97,
        gas_mode: true,
    })
}

/// Pipeline-quality natural gas (approximated as methane), ideal-gas
/// density with constant viscosity and heat capacity.
pub fn natural_gas() -> Box<dyn FluidModel> {
    Box::new(PolynomialFluid {
        name: "natural_gas".to_string(),
        z_coeffs: vec![1.0],
        mu_coeffs: vec![1.1e-5],
        cp_coeffs: vec![2220.0],
        molar_mass_kg_per_mol: 0.016_04,
        gas_mode: true,
    })
}
