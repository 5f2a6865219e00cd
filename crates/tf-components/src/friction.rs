//! Darcy friction factor closures.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};

/// User-selectable closure mapping Reynolds number and relative roughness
/// to the Darcy friction factor λ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrictionModel {
    /// Explicit formula valid across laminar and turbulent regimes alike.
    Nikuradse,
    /// Explicit turbulent approximation to Colebrook-White; laminar flow
    /// still uses 64/Re.
    SwameeJain,
    /// Implicit Colebrook-White solved by fixed-point inner iteration,
    /// capped at `max_iter`.
    PrandtlColebrook { max_iter: usize },
}

impl FrictionModel {
    /// Darcy friction factor λ for the given Reynolds number and relative
    /// roughness (roughness / diameter).
    pub fn darcy_friction_factor(&self, reynolds: f64, relative_roughness: f64) -> ComponentResult<f64> {
        check_finite(reynolds, "Reynolds number")?;
        let re = reynolds.abs().max(1e-6);

        match self {
            FrictionModel::Nikuradse => Ok(nikuradse(re, relative_roughness)),
            FrictionModel::SwameeJain => {
                if re < 2300.0 {
                    Ok(64.0 / re)
                } else {
                    Ok(swamee_jain(re, relative_roughness))
                }
            }
            FrictionModel::PrandtlColebrook { max_iter } => {
                if re < 2300.0 {
                    Ok(64.0 / re)
                } else {
                    colebrook_white(re, relative_roughness, *max_iter)
                }
            }
        }
    }
}

/// Nikuradse-type explicit closure, valid across laminar and turbulent
/// flow by construction (no regime switch).
fn nikuradse(re: f64, relative_roughness: f64) -> f64 {
    let laminar = 64.0 / re;
    let turbulent = 1.0 / (-2.0 * (relative_roughness / 3.71).log10()).powi(2);
    // Blend smoothly around the transition so the closure stays a single
    // explicit formula rather than a hard regime switch.
    let weight = (re / 2300.0).clamp(0.0, 1.0);
    laminar * (1.0 - weight) + turbulent * weight
}

fn swamee_jain(re: f64, relative_roughness: f64) -> f64 {
    let a = relative_roughness / 3.7;
    let b = 5.74 / re.powf(0.9);
    (0.25 / (a + b).log10().powi(2)).max(1e-5)
}

/// Colebrook-White, solved by fixed-point iteration seeded with the
/// Swamee-Jain estimate.
fn colebrook_white(re: f64, relative_roughness: f64, max_iter: usize) -> ComponentResult<f64> {
    let mut f = swamee_jain(re, relative_roughness);
    const TOL: f64 = 1e-10;

    for _ in 0..max_iter {
        let rhs = -2.0
            * (relative_roughness / 3.7 + 2.51 / (re * f.sqrt())).log10();
        let f_next = 1.0 / rhs.powi(2);
        if (f_next - f).abs() < TOL {
            return Ok(f_next.max(1e-5));
        }
        f = f_next;
    }

    Err(ComponentError::ConvergenceFailed {
        what: "Colebrook-White friction factor inner iteration",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laminar_matches_sixty_four_over_re() {
        let f = FrictionModel::SwameeJain
            .darcy_friction_factor(1000.0, 0.0002)
            .unwrap();
        assert!((f - 64.0 / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn turbulent_closures_agree_roughly() {
        let re = 1.0e5;
        let rr = 0.0002;
        let sj = FrictionModel::SwameeJain.darcy_friction_factor(re, rr).unwrap();
        let cb = FrictionModel::PrandtlColebrook { max_iter: 50 }
            .darcy_friction_factor(re, rr)
            .unwrap();
        assert!((sj - cb).abs() / cb < 0.02);
    }

    #[test]
    fn nikuradse_is_single_formula_across_regimes() {
        let laminar = FrictionModel::Nikuradse.darcy_friction_factor(1000.0, 0.0002).unwrap();
        let turbulent = FrictionModel::Nikuradse.darcy_friction_factor(1e5, 0.0002).unwrap();
        assert!(laminar > turbulent);
    }

    #[test]
    fn colebrook_caps_iterations() {
        let result = FrictionModel::PrandtlColebrook { max_iter: 0 }
            .darcy_friction_factor(1e5, 0.0002);
        assert!(result.is_err());
    }
}
