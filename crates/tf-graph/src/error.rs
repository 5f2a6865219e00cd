//! Graph-specific error types.

use tf_core::{BranchId, NodeId, TfError};

/// Graph construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A branch refers to a junction that doesn't exist.
    InvalidNodeRef { branch: BranchId, node: NodeId },

    /// A branch connects a junction to itself.
    SelfLoop { branch: BranchId, node: NodeId },

    /// Adjacency list is inconsistent.
    InconsistentAdjacency { branch: BranchId, node: NodeId },

    /// ID not found in index map.
    IdNotFound { what: &'static str },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidNodeRef { branch, node } => {
                write!(f, "Branch {} refers to non-existent junction {}", branch, node)
            }
            GraphError::SelfLoop { branch, node } => {
                write!(f, "Branch {} connects junction {} to itself", branch, node)
            }
            GraphError::InconsistentAdjacency { branch, node } => {
                write!(
                    f,
                    "Branch {} in junction {}'s adjacency list but doesn't reference it",
                    branch, node
                )
            }
            GraphError::IdNotFound { what } => {
                write!(f, "{} not found in index map", what)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for TfError {
    fn from(err: GraphError) -> Self {
        TfError::Invariant {
            what: Box::leak(err.to_string().into_boxed_str()),
        }
    }
}
