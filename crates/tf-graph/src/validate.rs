//! Graph validation logic.

use tf_core::TfResult;

use crate::error::GraphError;
use crate::graph::{Branch, Junction};

/// Validate that every branch references junctions that exist.
pub(crate) fn validate_structure(junctions: &[Junction], branches: &[Branch]) -> TfResult<()> {
    for branch in branches {
        if branch.from.index() as usize >= junctions.len() {
            return Err(GraphError::InvalidNodeRef {
                branch: branch.id,
                node: branch.from,
            }
            .into());
        }
        if branch.to.index() as usize >= junctions.len() {
            return Err(GraphError::InvalidNodeRef {
                branch: branch.id,
                node: branch.to,
            }
            .into());
        }
        if branch.from == branch.to {
            return Err(GraphError::SelfLoop {
                branch: branch.id,
                node: branch.from,
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BranchKind;
    use tf_core::units::{k, pa};
    use tf_core::Id;

    fn junction(id: u32) -> Junction {
        Junction {
            id: Id::from_index(id),
            name: format!("j{id}"),
            height_m: 0.0,
            nominal_pressure: pa(5e5),
            initial_temperature: k(293.15),
            in_service: true,
            pressure_bc: None,
            temperature_bc: None,
            mass_injection_kgps: 0.0,
        }
    }

    #[test]
    fn validate_empty_graph() {
        assert!(validate_structure(&[], &[]).is_ok());
    }

    #[test]
    fn validate_invalid_node_ref() {
        let junctions = vec![junction(0)];
        let branches = vec![Branch {
            id: Id::from_index(0),
            name: "b0".into(),
            from: Id::from_index(0),
            to: Id::from_index(99),
            kind: BranchKind::Pipe,
            in_service: true,
            section: None,
        }];
        let result = validate_structure(&junctions, &branches);
        assert!(result.is_err());
    }

    #[test]
    fn validate_self_loop() {
        let junctions = vec![junction(0)];
        let branches = vec![Branch {
            id: Id::from_index(0),
            name: "b0".into(),
            from: Id::from_index(0),
            to: Id::from_index(0),
            kind: BranchKind::Pipe,
            in_service: true,
            section: None,
        }];
        let result = validate_structure(&junctions, &branches);
        assert!(result.is_err());
    }
}
