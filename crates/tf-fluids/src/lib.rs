//! tf-fluids: fluid property calculations for thermoflow.
//!
//! Provides:
//! - Thermodynamic (pressure, temperature) state representation
//! - `FluidModel` trait for property calculations
//! - Constant, linear, tabulated and polynomial fluid closures
//! - A small catalog of named fluids (water, air, natural gas)
//!
//! # Architecture
//!
//! A network has exactly one active fluid per solve, so this crate has no
//! composition/mixture concept: a `FluidModel` is a self-contained closure
//! of (pressure, temperature) onto density, viscosity, heat capacity and
//! compressibility factor.
//!
//! # Example
//!
//! ```
//! use tf_fluids::{catalog, FluidModel, PtState};
//! use tf_core::units::{pa, k};
//!
//! let water = catalog::water();
//! let state = PtState::new(pa(101_325.0), k(300.0)).unwrap();
//! let rho = water.density(state).unwrap();
//! println!("Density: {} kg/m³", rho.value);
//! ```

pub mod catalog;
pub mod error;
pub mod fluids;
pub mod model;
pub mod state;

pub use error::{FluidError, FluidResult};
pub use fluids::{ConstantFluid, LinearFluid, PolynomialFluid, TableFluid};
pub use model::{FluidModel, ThermoPropertyPack};
pub use state::{PtState, SpecHeatCapacity};
