//! Stable indexing for solver integration.
//!
//! Provides bidirectional mappings between domain IDs (NodeId, BranchId)
//! and contiguous solver indices (0..N). This is the full-pit index space;
//! the solver's reducer (`tf-solver::reduce`) builds a second translation
//! table on top of this one for the active pit.

use tf_core::{BranchId, NodeId, TfResult};

use crate::error::GraphError;
use crate::graph::Graph;

/// Index map providing stable, contiguous indices for graph objects.
#[derive(Debug, Clone)]
pub struct IndexMap {
    node_ids: Vec<NodeId>,
    branch_ids: Vec<BranchId>,
    node_to_idx: Vec<Option<usize>>,
    branch_to_idx: Vec<Option<usize>>,
}

impl IndexMap {
    /// Build an index map from a graph.
    pub fn from_graph(graph: &Graph) -> Self {
        let node_ids: Vec<NodeId> = graph.junctions().iter().map(|j| j.id).collect();
        let branch_ids: Vec<BranchId> = graph.branches().iter().map(|b| b.id).collect();

        let max_node_idx = node_ids.iter().map(|id| id.index() as usize).max().unwrap_or(0);
        let max_branch_idx = branch_ids
            .iter()
            .map(|id| id.index() as usize)
            .max()
            .unwrap_or(0);

        let mut node_to_idx = vec![None; max_node_idx + 1];
        let mut branch_to_idx = vec![None; max_branch_idx + 1];

        for (i, &id) in node_ids.iter().enumerate() {
            node_to_idx[id.index() as usize] = Some(i);
        }
        for (i, &id) in branch_ids.iter().enumerate() {
            branch_to_idx[id.index() as usize] = Some(i);
        }

        Self {
            node_ids,
            branch_ids,
            node_to_idx,
            branch_to_idx,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn branch_count(&self) -> usize {
        self.branch_ids.len()
    }

    pub fn node_idx(&self, id: NodeId) -> TfResult<usize> {
        let idx = id.index() as usize;
        self.node_to_idx
            .get(idx)
            .and_then(|&opt| opt)
            .ok_or_else(|| GraphError::IdNotFound { what: "NodeId" }.into())
    }

    pub fn branch_idx(&self, id: BranchId) -> TfResult<usize> {
        let idx = id.index() as usize;
        self.branch_to_idx
            .get(idx)
            .and_then(|&opt| opt)
            .ok_or_else(|| GraphError::IdNotFound { what: "BranchId" }.into())
    }

    pub fn node_id(&self, i: usize) -> NodeId {
        self.node_ids[i]
    }

    pub fn branch_id(&self, i: usize) -> BranchId {
        self.branch_ids[i]
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    pub fn branch_ids(&self) -> &[BranchId] {
        &self.branch_ids
    }
}
