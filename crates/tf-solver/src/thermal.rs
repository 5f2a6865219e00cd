//! Thermal solve: per-node mixing plus per-branch outlet-temperature laws.
//!
//! Node temperatures and branch outlet temperatures are mutually
//! dependent (a node's temperature is the flow-weighted mean of its
//! inflows' outlet temperatures; a branch's outlet temperature depends on
//! its inlet node's temperature), so this relaxes both to a fixed point
//! rather than solving a single linear pass. Acyclic networks typically
//! converge in one or two sweeps; networks with circulation loops need
//! more. `hydraulic::solve` already fixed `mdot` for this pass — flow
//! direction and magnitude are read-only here.

use tf_components::ThermalContext;
use tf_core::units::k;

use crate::error::{SolverError, SolverResult};
use crate::options::{SolveOptions, ZeroFlowPolicy};
use crate::pit::NetworkPit;
use crate::reducer::ActivePit;

/// Run the thermal relaxation in place over `pit`'s node/branch temperature
/// arrays, restricted to `active`. Returns the final max node-temperature
/// change (useful for a caller driving a bidirectional hydraulic/thermal
/// loop to its own convergence check).
pub fn solve(pit: &mut NetworkPit, active: &ActivePit, options: &SolveOptions) -> SolverResult<f64> {
    let n_nodes = active.node_count();
    if n_nodes == 0 {
        return Ok(0.0);
    }

    let mut max_delta = f64::INFINITY;
    let mut iterations = 0;

    for iter in 0..options.max_iter_thermal {
        iterations = iter + 1;
        max_delta = 0.0;

        // Inflow-weighted node temperatures, computed from the *previous*
        // iteration's branch outlet temperatures so the sweep order doesn't
        // bias the mix.
        let mut weighted_sum = vec![0.0_f64; n_nodes];
        let mut weight = vec![0.0_f64; n_nodes];

        for branch in &active.branches {
            let mdot = pit.mdot[branch.full_idx];
            let t_out = pit.t_out[branch.full_idx];
            let w = mdot.abs();
            if mdot >= 0.0 {
                weighted_sum[branch.to_active] += w * t_out;
                weight[branch.to_active] += w;
            } else {
                weighted_sum[branch.from_active] += w * t_out;
                weight[branch.from_active] += w;
            }
        }

        for (a, &full) in active.node_full.iter().enumerate() {
            let junction = &pit.graph.junctions()[full];
            let new_t = if let Some(t_fixed) = junction.temperature_bc {
                t_fixed.value
            } else if weight[a] > 0.0 {
                weighted_sum[a] / weight[a]
            } else {
                pit.t_node[full]
            };
            let delta = (new_t - pit.t_node[full]).abs();
            if delta > max_delta {
                max_delta = delta;
            }
            pit.t_node[full] = new_t;
        }

        for branch in &active.branches {
            let mdot = pit.mdot[branch.full_idx];
            let (upstream_active, downstream_active) = if mdot >= 0.0 {
                (branch.from_active, branch.to_active)
            } else {
                (branch.to_active, branch.from_active)
            };
            let upstream_full = active.node_full[upstream_active];
            let downstream_full = active.node_full[downstream_active];
            let t_in = pit.t_node[upstream_full];
            pit.t_in[branch.full_idx] = t_in;
            let prev_t_out = pit.t_out[branch.full_idx];

            if mdot.abs() < options.tol_m {
                match options.zero_flow_policy {
                    ZeroFlowPolicy::WarnAndSkip => {
                        tracing::warn!(
                            branch = pit.graph.branches()[branch.full_idx].name.as_str(),
                            "near-zero mass flow on thermally active branch; leaving outlet \
                             temperature unchanged"
                        );
                        pit.t_out[branch.full_idx] = t_in;
                        continue;
                    }
                    ZeroFlowPolicy::Strict => {
                        return Err(SolverError::ThermalSingularity {
                            branch: pit.graph.branches()[branch.full_idx].name.clone(),
                        });
                    }
                }
            }

            let avg_pressure = tf_core::units::pa(0.5 * (pit.p[upstream_full] + pit.p[downstream_full]));
            let ctx = ThermalContext {
                t_in: k(t_in),
                mdot: tf_core::units::kgps(mdot.abs()),
                fluid: pit.fluid.as_ref(),
                ambient_temperature: options.ambient_temperature,
                avg_pressure,
            };
            let component = &pit.components[branch.full_idx];
            let t_out = component
                .outlet_temperature(&ctx)
                .map_err(SolverError::Component)?;
            pit.t_out[branch.full_idx] = t_out.value;

            let branch_delta = (t_out.value - prev_t_out).abs();
            if branch_delta > max_delta {
                max_delta = branch_delta;
            }
        }

        if max_delta < options.tol_t {
            break;
        }
    }

    if max_delta >= options.tol_t {
        return Err(SolverError::ThermalNoConvergence {
            last_residual: max_delta,
        });
    }

    tracing::debug!(iterations, max_delta, "thermal relaxation converged");
    Ok(max_delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_components::{AnyBranchComponent, FrictionModel, Pipe};
    use tf_core::units::{k, m, pa};
    use tf_fluids::catalog;
    use tf_graph::{BranchKind, GraphBuilder};

    #[test]
    fn pipe_cools_toward_ambient_downstream() {
        let mut b = GraphBuilder::new();
        let n1 = b.add_junction("n1", 0.0, pa(5e5), k(308.15));
        let n2 = b.add_junction("n2", 0.0, pa(4.9e5), k(308.15));
        b.set_pressure_bc(n1, pa(5e5));
        b.set_temperature_bc(n1, k(308.15));
        b.add_branch("p1", n1, n2, BranchKind::Pipe);
        let graph = b.build().unwrap();
        let components = vec![AnyBranchComponent::Pipe(Pipe::new(
            "p1",
            m(500.0),
            m(0.15),
            m(0.0002),
            0.0,
            FrictionModel::Nikuradse,
            0.8,
        ))];
        let fluid = catalog::water();
        let mut pit = NetworkPit::build(graph, components, fluid, None).unwrap();
        pit.mdot[0] = 20.0;
        let active = ActivePit::build(&pit);
        let mut options = SolveOptions::default();
        options.ambient_temperature = k(283.15);

        solve(&mut pit, &active, &options).unwrap();

        assert!(pit.t_node[n2.index() as usize] < 308.15);
        assert!(pit.t_node[n2.index() as usize] > 283.15);
    }

    #[test]
    fn strict_policy_rejects_zero_flow_thermal_branch() {
        let mut b = GraphBuilder::new();
        let n1 = b.add_junction("n1", 0.0, pa(5e5), k(308.15));
        let n2 = b.add_junction("n2", 0.0, pa(5e5), k(308.15));
        b.set_pressure_bc(n1, pa(5e5));
        b.set_temperature_bc(n1, k(308.15));
        b.add_branch("p1", n1, n2, BranchKind::Pipe);
        let graph = b.build().unwrap();
        let components = vec![AnyBranchComponent::Pipe(Pipe::new(
            "p1",
            m(500.0),
            m(0.15),
            m(0.0002),
            0.0,
            FrictionModel::Nikuradse,
            0.8,
        ))];
        let fluid = catalog::water();
        let mut pit = NetworkPit::build(graph, components, fluid, None).unwrap();
        let active = ActivePit::build(&pit);
        let mut options = SolveOptions::default();
        options.zero_flow_policy = ZeroFlowPolicy::Strict;

        let err = solve(&mut pit, &active, &options).unwrap_err();
        assert!(matches!(err, SolverError::ThermalSingularity { .. }));
    }
}
