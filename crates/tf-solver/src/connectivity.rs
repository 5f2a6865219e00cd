//! Reachability check from pressure (and, in thermal mode, temperature)
//! slack junctions.
//!
//! Branches/junctions unreachable from any slack are marked out of service
//! for this solve only; the PIT's `node_in_service`/`branch_in_service`
//! flags already track the element's *original* service state, so this
//! module only ever turns flags off, never back on.

use std::collections::VecDeque;

use crate::error::{SolverError, SolverResult};
use crate::pit::NetworkPit;

/// Runs a BFS over in-service branches starting from in-service, reachable
/// pressure-slack junctions, then (if `require_thermal_slack`) from
/// temperature-slack junctions too. Marks everything else out of service
/// in place on `pit`.
pub fn check(pit: &mut NetworkPit, require_thermal_slack: bool) -> SolverResult<()> {
    let n_nodes = pit.node_count();
    let slack_nodes: Vec<usize> = pit
        .graph
        .junctions()
        .iter()
        .enumerate()
        .filter(|(i, j)| pit.node_in_service[*i] && j.is_pressure_slack())
        .map(|(i, _)| i)
        .collect();

    if slack_nodes.is_empty() {
        return Err(SolverError::NoSlack {
            what: "no in-service junction has a fixed-pressure boundary condition".into(),
        });
    }

    if require_thermal_slack {
        let has_thermal_slack = pit
            .graph
            .junctions()
            .iter()
            .enumerate()
            .any(|(i, j)| pit.node_in_service[i] && j.is_temperature_slack());
        if !has_thermal_slack {
            return Err(SolverError::NoSlack {
                what: "no in-service junction has a fixed-temperature boundary condition".into(),
            });
        }
    }

    let mut reachable = vec![false; n_nodes];
    let mut queue = VecDeque::new();
    for &s in &slack_nodes {
        if !reachable[s] {
            reachable[s] = true;
            queue.push_back(s);
        }
    }

    while let Some(node_idx) = queue.pop_front() {
        let node_id = pit.graph.junctions()[node_idx].id;
        for &(branch_id, _orientation) in pit.graph.node_branches(node_id) {
            let b_idx = branch_id.index() as usize;
            if !pit.branch_in_service[b_idx] {
                continue;
            }
            let branch = pit.graph.branch(branch_id).unwrap();
            for &other in &[branch.from, branch.to] {
                let other_idx = other.index() as usize;
                if pit.node_in_service[other_idx] && !reachable[other_idx] {
                    reachable[other_idx] = true;
                    queue.push_back(other_idx);
                }
            }
        }
    }

    for i in 0..n_nodes {
        if !reachable[i] {
            pit.node_in_service[i] = false;
        }
    }
    for (b_idx, branch) in pit.graph.branches().iter().enumerate() {
        if !pit.branch_in_service[b_idx] {
            continue;
        }
        let from_ok = pit.node_in_service[branch.from.index() as usize];
        let to_ok = pit.node_in_service[branch.to.index() as usize];
        if !from_ok || !to_ok {
            pit.branch_in_service[b_idx] = false;
        }
    }

    Ok(())
}
