//! Persistent per-network solve workspace.
//!
//! [`pipeflow`](crate::pipeflow) is stateless: every call rebuilds the PIT
//! from scratch. `Network` wraps that same solve behind a workspace that
//! survives across calls, so `SolveOptions::reuse_internal_data` can warm-
//! start the next solve from the last one's pressures/flows instead of a
//! flat start, and so a `converged`/`last_error` pair is available without
//! threading the `Result` back through the caller.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tf_components::AnyBranchComponent;
use tf_fluids::FluidModel;
use tf_graph::Graph;
use tf_results::NetworkResults;

use crate::error::SolverResult;
use crate::options::SolveOptions;
use crate::pit::NetworkPit;
use crate::{build_results, run_solve};

/// A network's solve workspace, reused across repeated [`solve`](Network::solve)
/// calls when the topology hasn't changed.
#[derive(Default)]
pub struct Network {
    pit: Option<NetworkPit>,
    topology_hash: Option<u64>,
    /// Whether the most recent `solve()` call converged.
    pub converged: bool,
    /// The error from the most recent `solve()` call, if any.
    pub last_error: Option<String>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached internal state from the most recent solve, if one has
    /// run.
    pub fn pit(&self) -> Option<&NetworkPit> {
        self.pit.as_ref()
    }

    /// Solve `graph`/`components`/`fluid` against this workspace.
    ///
    /// When `options.reuse_internal_data` is set and the topology hash
    /// matches the last call's, the new PIT warm-starts from the cached
    /// one's pressures, temperatures, and flows instead of a flat start.
    /// Any topology change (different junction/branch count, endpoints, or
    /// kinds) invalidates the cache and forces a flat start regardless of
    /// the option.
    pub fn solve(
        &mut self,
        graph: Graph,
        components: Vec<AnyBranchComponent>,
        fluid: Box<dyn FluidModel>,
        options: &SolveOptions,
    ) -> SolverResult<NetworkResults> {
        let hash = topology_hash(&graph, &components);
        let warm_start = options.reuse_internal_data && self.topology_hash == Some(hash);
        let previous = if warm_start { self.pit.as_ref() } else { None };

        let mut pit = NetworkPit::build(graph, components, fluid, previous)?;
        let outcome = run_solve(&mut pit, options);

        match &outcome {
            Ok(()) => {
                self.converged = true;
                self.last_error = None;
            }
            Err(err) => {
                self.converged = false;
                self.last_error = Some(err.to_string());
            }
        }

        let results = build_results(&pit, options);
        self.topology_hash = Some(hash);
        self.pit = Some(pit);

        outcome?;
        Ok(results)
    }
}

/// A structural fingerprint of the topology: junction/branch counts plus
/// each branch's endpoints and kind, in graph order. Two graphs with the
/// same hash have the same shape, so a prior solve's state arrays can be
/// reused index-for-index as a warm start.
fn topology_hash(graph: &Graph, components: &[AnyBranchComponent]) -> u64 {
    let mut hasher = DefaultHasher::new();
    graph.junctions().len().hash(&mut hasher);
    graph.branches().len().hash(&mut hasher);
    for branch in graph.branches() {
        branch.from.index().hash(&mut hasher);
        branch.to.index().hash(&mut hasher);
        branch.kind.as_str().hash(&mut hasher);
    }
    components.len().hash(&mut hasher);
    hasher.finish()
}
