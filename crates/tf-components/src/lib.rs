//! tf-components: branch component library for the pipeflow solver.
//!
//! Every branch kind (pipe, valve, pump, compressor, controllers, heat
//! exchanger, circulation pumps) implements [`BranchModel`], supplying an
//! analytic hydraulic residual plus its derivatives w.r.t. the branch's
//! three Newton unknowns (`p_from`, `p_to`, `mdot`) and a thermal closure.
//! [`AnyBranchComponent`] gives the solver a single tagged-variant type to
//! dispatch over without paying for a `dyn` vtable on the hot path.
//!
//! # Example
//!
//! ```
//! use tf_components::{BranchModel, FrictionModel, HydraulicContext, Pipe};
//! use tf_core::units::{k, kgps, m, pa};
//! use tf_fluids::ConstantFluid;
//!
//! let pipe = Pipe::new("p1", m(100.0), m(0.1), m(0.0002), 0.5, FrictionModel::Nikuradse, 0.0);
//! let water = ConstantFluid {
//!     name: "water".into(), rho_kg_m3: 1000.0, mu_pas: 1.0e-3, cp_j_per_kg_k: 4184.0,
//!     z: 1.0, molar_mass_kg_per_mol: 0.018, gas_mode: false,
//! };
//! let ctx = HydraulicContext {
//!     p_from: pa(5e5), p_to: pa(4.9e5), mdot: kgps(1.0), t_from: k(293.15),
//!     height_from_m: 0.0, height_to_m: 0.0, fluid: &water,
//!     ambient_pressure: pa(101_325.0), ambient_temperature: k(293.15),
//! };
//! let residual = pipe.hydraulic_residual(&ctx).unwrap();
//! println!("residual: {} Pa", residual.value);
//! ```

pub mod circulation_pump;
pub mod common;
pub mod compressor;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod friction;
pub mod heat_exchanger;
pub mod pipe;
pub mod pump;
pub mod traits;
pub mod valve;

pub use circulation_pump::{CirculationPumpMass, CirculationPumpPressure};
pub use compressor::Compressor;
pub use controller::{FlowController, PressureController};
pub use dispatch::AnyBranchComponent;
pub use error::{ComponentError, ComponentResult};
pub use friction::FrictionModel;
pub use heat_exchanger::{HeatExchanger, ThermalControl};
pub use pipe::Pipe;
pub use pump::Pump;
pub use traits::{BranchModel, HydraulicContext, HydraulicResidual, ThermalContext};
pub use valve::Valve;
