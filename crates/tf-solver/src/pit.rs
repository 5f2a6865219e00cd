//! Process-internal tables: dense, solver-facing network state.
//!
//! `tf-graph`'s `Graph` already assigns junctions and branches contiguous
//! 0-based indices (`NodeId`/`BranchId` via `Id::index()`), so the "full
//! PIT" here is mostly the graph itself plus the per-branch component
//! model and the current (or flat-start) hydraulic/thermal solution
//! arrays, indexed the same way.

use tf_components::AnyBranchComponent;
use tf_fluids::FluidModel;
use tf_graph::Graph;

use crate::error::{SolverError, SolverResult};

/// Dense network state plus the static topology/component data needed to
/// assemble residuals against it.
pub struct NetworkPit {
    pub graph: Graph,
    /// One component model per branch, in `graph.branches()` order.
    pub components: Vec<AnyBranchComponent>,
    pub fluid: Box<dyn FluidModel>,

    /// Current node pressure \[Pa\], one per junction.
    pub p: Vec<f64>,
    /// Current node temperature \[K\], one per junction.
    pub t_node: Vec<f64>,
    /// Current branch mass flow \[kg/s\], one per branch, `from -> to`
    /// positive.
    pub mdot: Vec<f64>,
    /// Branch inlet temperature \[K\] (the upstream node's current temperature).
    pub t_in: Vec<f64>,
    /// Branch outlet temperature \[K\], from the component's thermal law.
    pub t_out: Vec<f64>,

    /// Per-node in-service flag, reset fresh for every solve by
    /// `connectivity::check` (junction-level `in_service` plus
    /// reachability).
    pub node_in_service: Vec<bool>,
    /// Per-branch in-service flag, same lifecycle as `node_in_service`.
    pub branch_in_service: Vec<bool>,
}

impl NetworkPit {
    /// Build a fresh PIT from a validated graph and its component models.
    ///
    /// `previous` lets a caller reuse the prior solve's pressures/flows as
    /// the initial guess (spec's `reuse_internal_data` option); without it
    /// every node starts at its nominal pressure/temperature and every
    /// branch starts at zero flow.
    pub fn build(
        graph: Graph,
        components: Vec<AnyBranchComponent>,
        fluid: Box<dyn FluidModel>,
        previous: Option<&NetworkPit>,
    ) -> SolverResult<Self> {
        if components.len() != graph.branches().len() {
            return Err(SolverError::InvalidTopology {
                what: format!(
                    "{} components supplied for {} branches",
                    components.len(),
                    graph.branches().len()
                ),
            });
        }
        if graph.junctions().is_empty() {
            return Err(SolverError::InvalidTopology {
                what: "network has no junctions".into(),
            });
        }

        let n_nodes = graph.junctions().len();
        let n_branches = graph.branches().len();

        let (p, t_node) = match previous {
            Some(prev) if prev.p.len() == n_nodes && prev.t_node.len() == n_nodes => {
                (prev.p.clone(), prev.t_node.clone())
            }
            _ => {
                let p = graph.junctions().iter().map(|j| j.nominal_pressure.value).collect();
                let t_node = graph
                    .junctions()
                    .iter()
                    .map(|j| j.initial_temperature.value)
                    .collect();
                (p, t_node)
            }
        };

        let mdot = match previous {
            Some(prev) if prev.mdot.len() == n_branches => prev.mdot.clone(),
            _ => vec![0.0; n_branches],
        };

        let t_in = t_node.clone();
        let t_out = t_node.clone();

        let node_in_service = graph.junctions().iter().map(|j| j.in_service).collect();
        let branch_in_service = graph.branches().iter().map(|b| b.in_service).collect();

        Ok(Self {
            graph,
            components,
            fluid,
            p,
            t_node,
            mdot,
            t_in,
            t_out,
            node_in_service,
            branch_in_service,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.junctions().len()
    }

    pub fn branch_count(&self) -> usize {
        self.graph.branches().len()
    }

    /// Overrides every pipe's friction closure with the solve-level
    /// `SolveOptions::friction_model`, substituting `max_iter` for
    /// `PrandtlColebrook` so `max_iter_colebrook` takes effect too.
    /// Per-pipe `FrictionModel` choices set at construction time are a
    /// flat start only; the solve-level option always wins.
    pub fn apply_friction_model(&mut self, model: tf_components::FrictionModel) {
        for component in &mut self.components {
            if let AnyBranchComponent::Pipe(pipe) = component {
                pipe.friction = model;
            }
        }
    }
}
