//! Result extraction: turns a solved network's dense state arrays back
//! into per-element-kind result tables.

use tf_components::{AnyBranchComponent, BranchModel, HydraulicContext, ThermalContext};
use tf_core::units::{k, kgps, pa, Pressure, Temperature};
use tf_fluids::FluidModel;
use tf_graph::{BranchKind, Graph};

use crate::types::{
    CompressorResult, ControllerResult, ExtGridResult, HeatExchangerResult, JunctionResult,
    NetworkResults, PipeResult, PumpResult, ValveResult,
};

/// Everything the extractor needs to read back from a solved network, kept
/// by reference so the caller's own state arrays stay the source of truth.
pub struct SolvedNetwork<'a> {
    pub graph: &'a Graph,
    pub components: &'a [AnyBranchComponent],
    pub fluid: &'a dyn FluidModel,
    pub p: &'a [f64],
    pub t_node: &'a [f64],
    pub mdot: &'a [f64],
    pub t_in: &'a [f64],
    pub t_out: &'a [f64],
    pub node_in_service: &'a [bool],
    pub branch_in_service: &'a [bool],
    pub ambient_pressure: Pressure,
    pub ambient_temperature: Temperature,
}

pub fn extract(net: &SolvedNetwork<'_>) -> NetworkResults {
    let mut results = NetworkResults::default();

    for (i, junction) in net.graph.junctions().iter().enumerate() {
        let in_service = net.node_in_service[i];
        results.junctions.push(JunctionResult {
            name: junction.name.clone(),
            p_pa: if in_service { net.p[i] } else { f64::NAN },
            t_k: if in_service { net.t_node[i] } else { f64::NAN },
            in_service,
        });

        if let Some(p_fixed) = junction.pressure_bc {
            let (p_pa, t_k, mdot_kg_s) = if in_service {
                let mut net_mdot = 0.0;
                for &(branch_id, orientation) in net.graph.node_branches(junction.id) {
                    let idx = branch_id.index() as usize;
                    if !net.branch_in_service[idx] {
                        continue;
                    }
                    let signed = net.mdot[idx];
                    net_mdot += match orientation {
                        tf_graph::Orientation::From => signed,
                        tf_graph::Orientation::To => -signed,
                    };
                }
                (p_fixed.value, net.t_node[i], net_mdot)
            } else {
                (f64::NAN, f64::NAN, f64::NAN)
            };
            results.ext_grids.push(ExtGridResult {
                junction_name: junction.name.clone(),
                p_pa,
                t_k,
                mdot_kg_s,
            });
        }
    }

    for (b_idx, branch) in net.graph.branches().iter().enumerate() {
        if !net.branch_in_service[b_idx] {
            push_nan_row(&mut results, branch);
            continue;
        }

        let from_idx = branch.from.index() as usize;
        let to_idx = branch.to.index() as usize;
        let component = &net.components[b_idx];
        let mdot = net.mdot[b_idx];

        let hctx = HydraulicContext {
            p_from: pa(net.p[from_idx]),
            p_to: pa(net.p[to_idx]),
            mdot: kgps(mdot),
            t_from: k(net.t_node[from_idx]),
            height_from_m: net.graph.junctions()[from_idx].height_m,
            height_to_m: net.graph.junctions()[to_idx].height_m,
            fluid: net.fluid,
            ambient_pressure: net.ambient_pressure,
            ambient_temperature: net.ambient_temperature,
        };
        let tctx = ThermalContext {
            t_in: k(net.t_in[b_idx]),
            mdot: kgps(mdot.abs()),
            fluid: net.fluid,
            ambient_temperature: net.ambient_temperature,
            avg_pressure: pa(0.5 * (net.p[from_idx] + net.p[to_idx])),
        };
        let shaft_power_w = component.shaft_power(&hctx).map(|p| p.value).unwrap_or(0.0);
        let heat_rate_w = component.heat_rate(&tctx).map(|q| q.value).unwrap_or(0.0);
        let delta_p_pa = net.p[from_idx] - net.p[to_idx];

        match branch.kind {
            BranchKind::Pipe => {
                let (velocity_m_s, vdot_m3_s, reynolds, lambda) =
                    if let AnyBranchComponent::Pipe(p) = component {
                        let p_avg = pa(0.5 * (net.p[from_idx] + net.p[to_idx]));
                        let state = tf_fluids::PtState::new(p_avg, hctx.t_from).ok();
                        let rho = state.and_then(|s| net.fluid.density(s).ok()).map(|d| d.value);
                        let mu = state.and_then(|s| net.fluid.viscosity(s).ok()).map(|m| m.value);
                        match (rho, mu) {
                            (Some(rho), Some(mu)) if rho > 0.0 => {
                                let area = std::f64::consts::PI * p.diameter.value.powi(2) / 4.0;
                                let v = mdot / (rho * area);
                                let re = rho * v.abs() * p.diameter.value / mu;
                                let relative_roughness = p.roughness.value / p.diameter.value;
                                let lambda = if mdot.abs() < tf_components::common::EPSILON_MDOT {
                                    0.0
                                } else {
                                    p.friction
                                        .darcy_friction_factor(re, relative_roughness)
                                        .unwrap_or(0.0)
                                };
                                (v, mdot / rho, re, lambda)
                            }
                            _ => (0.0, 0.0, 0.0, 0.0),
                        }
                    } else {
                        (0.0, 0.0, 0.0, 0.0)
                    };
                results.pipes.push(PipeResult {
                    name: branch.name.clone(),
                    mdot_from_kg_s: mdot,
                    mdot_to_kg_s: mdot,
                    velocity_m_s,
                    vdot_m3_s,
                    reynolds,
                    lambda,
                    p_from_pa: net.p[from_idx],
                    p_to_pa: net.p[to_idx],
                    t_from_k: net.t_node[from_idx],
                    t_to_k: net.t_node[to_idx],
                    t_outlet_k: net.t_out[b_idx],
                });
            }
            BranchKind::Valve => results.valves.push(ValveResult {
                name: branch.name.clone(),
                mdot_kg_s: mdot,
                delta_p_pa,
            }),
            BranchKind::Pump => results.pumps.push(PumpResult {
                name: branch.name.clone(),
                mdot_kg_s: mdot,
                delta_p_pa: -delta_p_pa,
                shaft_power_w,
            }),
            BranchKind::Compressor => results.compressors.push(CompressorResult {
                name: branch.name.clone(),
                mdot_kg_s: mdot,
                delta_p_pa: -delta_p_pa,
                shaft_power_w,
            }),
            BranchKind::FlowController | BranchKind::PressureController => {
                results.controllers.push(ControllerResult {
                    name: branch.name.clone(),
                    mdot_kg_s: mdot,
                    delta_p_pa,
                })
            }
            BranchKind::HeatExchanger => results.heat_exchangers.push(HeatExchangerResult {
                name: branch.name.clone(),
                mdot_kg_s: mdot,
                heat_rate_w,
                t_from_k: net.t_node[from_idx],
                t_to_k: net.t_out[b_idx],
            }),
            BranchKind::CirculationPumpMass | BranchKind::CirculationPumpPressure => {
                results.pumps.push(PumpResult {
                    name: branch.name.clone(),
                    mdot_kg_s: mdot,
                    delta_p_pa: -delta_p_pa,
                    shaft_power_w,
                })
            }
        }
    }

    results
}

/// Pushes a NaN-valued row for an out-of-service branch into its matching
/// result table, so downstream tooling always finds one row per element
/// regardless of topology changes from the connectivity check.
fn push_nan_row(results: &mut NetworkResults, branch: &tf_graph::Branch) {
    const NAN: f64 = f64::NAN;
    match branch.kind {
        BranchKind::Pipe => results.pipes.push(PipeResult {
            name: branch.name.clone(),
            mdot_from_kg_s: NAN,
            mdot_to_kg_s: NAN,
            velocity_m_s: NAN,
            vdot_m3_s: NAN,
            reynolds: NAN,
            lambda: NAN,
            p_from_pa: NAN,
            p_to_pa: NAN,
            t_from_k: NAN,
            t_to_k: NAN,
            t_outlet_k: NAN,
        }),
        BranchKind::Valve => results.valves.push(ValveResult {
            name: branch.name.clone(),
            mdot_kg_s: NAN,
            delta_p_pa: NAN,
        }),
        BranchKind::Pump | BranchKind::CirculationPumpMass | BranchKind::CirculationPumpPressure => {
            results.pumps.push(PumpResult {
                name: branch.name.clone(),
                mdot_kg_s: NAN,
                delta_p_pa: NAN,
                shaft_power_w: NAN,
            })
        }
        BranchKind::Compressor => results.compressors.push(CompressorResult {
            name: branch.name.clone(),
            mdot_kg_s: NAN,
            delta_p_pa: NAN,
            shaft_power_w: NAN,
        }),
        BranchKind::FlowController | BranchKind::PressureController => {
            results.controllers.push(ControllerResult {
                name: branch.name.clone(),
                mdot_kg_s: NAN,
                delta_p_pa: NAN,
            })
        }
        BranchKind::HeatExchanger => results.heat_exchangers.push(HeatExchangerResult {
            name: branch.name.clone(),
            mdot_kg_s: NAN,
            heat_rate_w: NAN,
            t_from_k: NAN,
            t_to_k: NAN,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_components::{FrictionModel, Pipe};
    use tf_core::units::m;
    use tf_graph::GraphBuilder;

    #[test]
    fn extracts_ext_grid_and_pipe_rows() {
        let mut b = GraphBuilder::new();
        let n1 = b.add_junction("n1", 0.0, pa(5e5), k(293.15));
        let n2 = b.add_junction("n2", 0.0, pa(4.9e5), k(293.15));
        b.set_pressure_bc(n1, pa(5e5));
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
        let fluid = tf_fluids::catalog::water();

        let p = [5e5, 4.9e5];
        let t_node = [293.15, 293.15];
        let mdot = [2.0];
        let t_in = [293.15];
        let t_out = [292.9];
        let node_in_service = [true, true];
        let branch_in_service = [true];

        let net = SolvedNetwork {
            graph: &graph,
            components: &components,
            fluid: fluid.as_ref(),
            p: &p,
            t_node: &t_node,
            mdot: &mdot,
            t_in: &t_in,
            t_out: &t_out,
            node_in_service: &node_in_service,
            branch_in_service: &branch_in_service,
            ambient_pressure: pa(101_325.0),
            ambient_temperature: k(283.15),
        };

        let results = extract(&net);
        assert_eq!(results.junctions.len(), 2);
        assert_eq!(results.ext_grids.len(), 1);
        assert_eq!(results.ext_grids[0].mdot_kg_s, 2.0);
        assert_eq!(results.pipes.len(), 1);
        assert!(results.pipes[0].velocity_m_s > 0.0);
        assert!(results.pipes[0].lambda > 0.0);
        assert_eq!(results.pipes[0].mdot_from_kg_s, results.pipes[0].mdot_to_kg_s);
        assert_eq!(results.pipes[0].t_to_k, 293.15);
        assert_eq!(results.pipes[0].t_outlet_k, 292.9);
    }

    #[test]
    fn closed_valve_produces_nan_row() {
        let mut b = GraphBuilder::new();
        let n1 = b.add_junction("n1", 0.0, pa(5e5), k(293.15));
        let n2 = b.add_junction("n2", 0.0, pa(5e5), k(293.15));
        let valve = b.add_branch("v1", n1, n2, BranchKind::Valve);
        b.set_branch_in_service(valve, false);
        let graph = b.build().unwrap();
        let components = vec![AnyBranchComponent::Valve(tf_components::Valve::new("v1", 1.0))];
        let fluid = tf_fluids::catalog::water();

        let p = [5e5, 5e5];
        let t_node = [293.15, 293.15];
        let mdot = [0.0];
        let t_in = [293.15];
        let t_out = [293.15];
        let node_in_service = [true, true];
        let branch_in_service = [false];

        let net = SolvedNetwork {
            graph: &graph,
            components: &components,
            fluid: fluid.as_ref(),
            p: &p,
            t_node: &t_node,
            mdot: &mdot,
            t_in: &t_in,
            t_out: &t_out,
            node_in_service: &node_in_service,
            branch_in_service: &branch_in_service,
            ambient_pressure: pa(101_325.0),
            ambient_temperature: k(283.15),
        };

        let results = extract(&net);
        assert_eq!(results.valves.len(), 1);
        assert!(results.valves[0].mdot_kg_s.is_nan());
    }
}
