//! Hydraulic Newton-Raphson kernel.
//!
//! Unknowns are concatenated, not interleaved: `x = [p_1..p_N, mdot_1..mdot_B]`
//! over the active (in-service, reachable) node/branch subset. Node rows
//! are a mass balance (or, for a pressure slack, `p - p_fixed = 0`); branch
//! rows are each component's analytic `hydraulic_residual`. The Jacobian is
//! assembled directly from the derivatives components hand back — no
//! finite differences on the hydraulic side.

use nalgebra::{DMatrix, DVector};
use tf_components::HydraulicContext;
use tf_core::units::pa;

use crate::error::{SolverError, SolverResult};
use crate::newton::{newton_solve_with_validator, NewtonConfig};
use crate::options::{NonlinearMethod, SolveOptions};
use crate::pit::NetworkPit;
use crate::reducer::ActivePit;

fn unpack(x: &DVector<f64>, n_nodes: usize) -> (&[f64], &[f64]) {
    let data = x.as_slice();
    (&data[..n_nodes], &data[n_nodes..])
}

fn assemble_residual(
    x: &DVector<f64>,
    pit: &NetworkPit,
    active: &ActivePit,
    ambient_pressure: f64,
    ambient_temperature: f64,
) -> SolverResult<DVector<f64>> {
    let n_nodes = active.node_count();
    let n_branches = active.branch_count();
    let (p, mdot) = unpack(x, n_nodes);

    let mut r = DVector::from_element(n_nodes + n_branches, 0.0);

    for (a, &full) in active.node_full.iter().enumerate() {
        let junction = &pit.graph.junctions()[full];
        if let Some(p_fixed) = junction.pressure_bc {
            r[a] = p[a] - p_fixed.value;
        } else {
            r[a] = junction.mass_injection_kgps;
        }
    }

    for (b, branch) in active.branches.iter().enumerate() {
        let node_from_full = active.node_full[branch.from_active];
        if pit.graph.junctions()[node_from_full].pressure_bc.is_none() {
            r[branch.from_active] -= mdot[b];
        }
        let node_to_full = active.node_full[branch.to_active];
        if pit.graph.junctions()[node_to_full].pressure_bc.is_none() {
            r[branch.to_active] += mdot[b];
        }
    }

    for (b, branch) in active.branches.iter().enumerate() {
        let component = &pit.components[branch.full_idx];
        let from_j = &pit.graph.junctions()[active.node_full[branch.from_active]];
        let to_j = &pit.graph.junctions()[active.node_full[branch.to_active]];
        let t_from = pit.t_node[active.node_full[branch.from_active]];
        let ctx = HydraulicContext {
            p_from: pa(p[branch.from_active]),
            p_to: pa(p[branch.to_active]),
            mdot: tf_core::units::kgps(mdot[b]),
            t_from: tf_core::units::k(t_from),
            height_from_m: from_j.height_m,
            height_to_m: to_j.height_m,
            fluid: pit.fluid.as_ref(),
            ambient_pressure: pa(ambient_pressure),
            ambient_temperature: tf_core::units::k(ambient_temperature),
        };
        let residual = component
            .hydraulic_residual(&ctx)
            .map_err(SolverError::Component)?;
        r[n_nodes + b] = residual.value;
    }

    Ok(r)
}

fn assemble_jacobian(
    x: &DVector<f64>,
    pit: &NetworkPit,
    active: &ActivePit,
    ambient_pressure: f64,
    ambient_temperature: f64,
) -> SolverResult<DMatrix<f64>> {
    let n_nodes = active.node_count();
    let n_branches = active.branch_count();
    let (p, mdot) = unpack(x, n_nodes);
    let dim = n_nodes + n_branches;
    let mut j = DMatrix::from_element(dim, dim, 0.0);

    for (a, &full) in active.node_full.iter().enumerate() {
        let junction = &pit.graph.junctions()[full];
        if junction.pressure_bc.is_some() {
            j[(a, a)] = 1.0;
        }
    }

    for (b, branch) in active.branches.iter().enumerate() {
        let from_full = active.node_full[branch.from_active];
        let to_full = active.node_full[branch.to_active];
        if pit.graph.junctions()[from_full].pressure_bc.is_none() {
            j[(branch.from_active, n_nodes + b)] -= 1.0;
        }
        if pit.graph.junctions()[to_full].pressure_bc.is_none() {
            j[(branch.to_active, n_nodes + b)] += 1.0;
        }
    }

    for (b, branch) in active.branches.iter().enumerate() {
        let component = &pit.components[branch.full_idx];
        let from_j = &pit.graph.junctions()[active.node_full[branch.from_active]];
        let to_j = &pit.graph.junctions()[active.node_full[branch.to_active]];
        let t_from = pit.t_node[active.node_full[branch.from_active]];
        let ctx = HydraulicContext {
            p_from: pa(p[branch.from_active]),
            p_to: pa(p[branch.to_active]),
            mdot: tf_core::units::kgps(mdot[b]),
            t_from: tf_core::units::k(t_from),
            height_from_m: from_j.height_m,
            height_to_m: to_j.height_m,
            fluid: pit.fluid.as_ref(),
            ambient_pressure: pa(ambient_pressure),
            ambient_temperature: tf_core::units::k(ambient_temperature),
        };
        let residual = component
            .hydraulic_residual(&ctx)
            .map_err(SolverError::Component)?;
        let row = n_nodes + b;
        j[(row, branch.from_active)] = residual.d_p_from;
        j[(row, branch.to_active)] = residual.d_p_to;
        j[(row, n_nodes + b)] = residual.d_mdot;
    }

    Ok(j)
}

/// Solve the hydraulic network in place, writing the converged pressures
/// and mass flows back into `pit` via `active`.
pub fn solve(pit: &mut NetworkPit, active: &ActivePit, options: &SolveOptions) -> SolverResult<f64> {
    let n_nodes = active.node_count();
    let n_branches = active.branch_count();

    let mut x0 = DVector::from_element(n_nodes + n_branches, 0.0);
    for (a, &full) in active.node_full.iter().enumerate() {
        x0[a] = pit.p[full];
    }
    for (b, branch) in active.branches.iter().enumerate() {
        x0[n_nodes + b] = pit.mdot[branch.full_idx];
    }

    let ambient_pressure = options.ambient_pressure.value;
    let ambient_temperature = options.ambient_temperature.value;

    let residual_fn = |x: &DVector<f64>| {
        assemble_residual(x, pit, active, ambient_pressure, ambient_temperature)
    };
    let jacobian_fn = |x: &DVector<f64>| {
        assemble_jacobian(x, pit, active, ambient_pressure, ambient_temperature)
    };
    let state_validator = |x: &DVector<f64>| x.iter().take(n_nodes).all(|&p| p > 0.0);

    let max_line_search_iters = match options.nonlinear_method {
        NonlinearMethod::Automatic => NewtonConfig::default().max_line_search_iters,
        // Mostly take the full Newton step; one backtrack still guards
        // against an outright divergent first step.
        NonlinearMethod::Constant => 1,
    };
    let config = NewtonConfig {
        max_iterations: options.max_iter_hydraulic,
        abs_tol: options.tol_res,
        rel_tol: options.tol_res,
        max_line_search_iters,
        freeze_jacobian: options.only_update_hydraulic_matrix,
        ..NewtonConfig::default()
    };

    let result = newton_solve_with_validator(
        x0,
        residual_fn,
        jacobian_fn,
        &config,
        Some(state_validator),
        None::<fn(&DVector<f64>, &DVector<f64>) -> bool>,
        None::<fn(&DVector<f64>, &DVector<f64>) -> DVector<f64>>,
        None,
    )?;

    if !result.converged {
        return Err(SolverError::NoConvergence {
            last_residual: result.residual_norm,
        });
    }

    let (p_active, mdot_active) = unpack(&result.x, n_nodes);
    active.scatter_pressure(pit, p_active);
    active.scatter_mdot(pit, mdot_active);

    for &v in result.x.iter() {
        if !v.is_finite() {
            return Err(SolverError::SolverError {
                what: "hydraulic solution contains a non-finite value".into(),
            });
        }
    }

    Ok(result.residual_norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_components::{AnyBranchComponent, FrictionModel, Pipe};
    use tf_core::units::{k, m, pa};
    use tf_fluids::catalog;
    use tf_graph::{BranchKind, GraphBuilder};

    #[test]
    fn two_node_pipe_converges_with_slack_pressure_satisfied() {
        let mut b = GraphBuilder::new();
        let n1 = b.add_junction("n1", 0.0, pa(5e5), k(293.15));
        let n2 = b.add_junction("n2", 0.0, pa(4.9e5), k(293.15));
        b.set_pressure_bc(n1, pa(5e5));
        b.set_mass_injection(n2, -1.0);
        b.add_branch("p1", n1, n2, BranchKind::Pipe);
        let graph = b.build().unwrap();
        let components = vec![AnyBranchComponent::Pipe(Pipe::new(
            "p1",
            m(100.0),
            m(0.1),
            m(0.0002),
            0.0,
            FrictionModel::Nikuradse,
            0.0,
        ))];
        let fluid = catalog::water();
        let mut pit = NetworkPit::build(graph, components, fluid, None).unwrap();
        let active = ActivePit::build(&pit);
        let options = SolveOptions::default();

        let residual_norm = solve(&mut pit, &active, &options).unwrap();
        assert!(residual_norm < 1e-3);
        assert!((pit.p[n1.index() as usize] - 5e5).abs() < 1e-6);
        assert!(pit.mdot[0] > 0.0);
    }
}
