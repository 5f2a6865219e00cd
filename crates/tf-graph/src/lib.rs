//! tf-graph: element registry and topology layer for thermoflow.
//!
//! Provides:
//! - Core topology data structures (`Junction`, `Branch`, `Graph`)
//! - Incremental graph builder with pipe-section expansion
//! - Stable indexing for solver integration
//!
//! # Example
//!
//! ```
//! use tf_graph::GraphBuilder;
//! use tf_graph::BranchKind;
//! use tf_core::units::{k, pa};
//!
//! let mut builder = GraphBuilder::new();
//! let j0 = builder.add_junction("j0", 0.0, pa(5e5), k(293.15));
//! let j1 = builder.add_junction("j1", 0.0, pa(5e5), k(293.15));
//! builder.add_branch("pipe0", j0, j1, BranchKind::Pipe);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.junctions().len(), 2);
//! assert_eq!(graph.branches().len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

pub use builder::GraphBuilder;
pub use error::GraphError;
pub use graph::{Branch, BranchKind, Graph, Junction, Orientation, PipeSection};
pub use indexing::IndexMap;
