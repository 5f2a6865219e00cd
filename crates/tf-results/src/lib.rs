//! tf-results: in-memory result tables for a solved pipeflow network.

pub mod extract;
pub mod types;

pub use extract::{extract, SolvedNetwork};
pub use types::*;
