//! Core graph data structures: junctions and branches.

use tf_core::units::{Pressure, Temperature};
use tf_core::{BranchId, NodeId};

/// Kind tag for a branch, used to group BranchPIT rows contiguously by
/// component kind (design note: tagged-variant dispatch over flat arrays).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    Pipe,
    Valve,
    Pump,
    Compressor,
    HeatExchanger,
    FlowController,
    PressureController,
    CirculationPumpMass,
    CirculationPumpPressure,
}

impl BranchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchKind::Pipe => "pipe",
            BranchKind::Valve => "valve",
            BranchKind::Pump => "pump",
            BranchKind::Compressor => "compressor",
            BranchKind::HeatExchanger => "heat_exchanger",
            BranchKind::FlowController => "flow_controller",
            BranchKind::PressureController => "pressure_controller",
            BranchKind::CirculationPumpMass => "circ_pump_mass",
            BranchKind::CirculationPumpPressure => "circ_pump_pressure",
        }
    }
}

/// A junction (node) in the network.
///
/// Pipes with `sections > 1` introduce additional internal junctions
/// between the external from/to junctions; those are plain junctions with
/// no boundary conditions attached.
#[derive(Debug, Clone)]
pub struct Junction {
    pub id: NodeId,
    pub name: String,
    pub height_m: f64,
    pub nominal_pressure: Pressure,
    pub initial_temperature: Temperature,
    pub in_service: bool,
    /// Fixed pressure boundary condition (ext-grid `p`/`pt` type). `None` = free.
    pub pressure_bc: Option<Pressure>,
    /// Fixed temperature boundary condition (ext-grid `t`/`pt` type). `None` = free.
    pub temperature_bc: Option<Temperature>,
    /// Net external mass injection at this junction (source positive, sink
    /// negative), e.g. from a sink/source element attached to the junction.
    pub mass_injection_kgps: f64,
}

impl Junction {
    /// `true` if this junction is a hydraulic slack (fixed pressure).
    pub fn is_pressure_slack(&self) -> bool {
        self.pressure_bc.is_some()
    }

    /// `true` if this junction is a thermal slack (fixed temperature).
    pub fn is_temperature_slack(&self) -> bool {
        self.temperature_bc.is_some()
    }
}

/// A branch connecting two junctions.
///
/// Topology only: from/to junction references, kind tag, in-service flag.
/// Component-specific parameters (diameter, friction, pump curve, ...) live
/// in `tf-components`, keyed by the same `BranchId`.
#[derive(Debug, Clone)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub from: NodeId,
    pub to: NodeId,
    pub kind: BranchKind,
    pub in_service: bool,
    /// Set when this branch is one row of a multi-section pipe built by
    /// `GraphBuilder::add_pipe_sections`, so result extraction can address
    /// it by (pipe, section) instead of only by branch name.
    pub section: Option<PipeSection>,
}

/// Addresses one row of a sectioned pipe: which logical pipe it belongs to
/// (assigned in `add_pipe_sections` call order) and its position along it,
/// `from -> to`, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeSection {
    pub pipe_index: u32,
    pub section_index: u32,
}

/// Orientation of a branch relative to one of its incident junctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The junction is this branch's `from` endpoint.
    From,
    /// The junction is this branch's `to` endpoint.
    To,
}

/// The graph: a validated, immutable collection of junctions and branches.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) junctions: Vec<Junction>,
    pub(crate) branches: Vec<Branch>,

    /// Offsets for node->branch adjacency, analogous to the teacher's
    /// node/port adjacency: junction i's incident branches are in
    /// `node_branches[node_branch_offsets[i]..node_branch_offsets[i+1]]`.
    pub(crate) node_branch_offsets: Vec<usize>,
    pub(crate) node_branches: Vec<(BranchId, Orientation)>,
}

impl Graph {
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn junction(&self, id: NodeId) -> Option<&Junction> {
        self.junctions.get(id.index() as usize)
    }

    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id.index() as usize)
    }

    /// All (branch, orientation) pairs incident to a junction.
    pub fn node_branches(&self, node_id: NodeId) -> &[(BranchId, Orientation)] {
        let idx = node_id.index() as usize;
        if idx >= self.junctions.len() {
            return &[];
        }
        let start = self.node_branch_offsets[idx];
        let end = self.node_branch_offsets[idx + 1];
        &self.node_branches[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_core::Id;

    #[test]
    fn branch_kind_strings_are_distinct() {
        let kinds = [
            BranchKind::Pipe,
            BranchKind::Valve,
            BranchKind::Pump,
            BranchKind::Compressor,
            BranchKind::HeatExchanger,
            BranchKind::FlowController,
            BranchKind::PressureController,
            BranchKind::CirculationPumpMass,
            BranchKind::CirculationPumpPressure,
        ];
        let mut seen = std::collections::HashSet::new();
        for k in kinds {
            assert!(seen.insert(k.as_str()));
        }
    }

    #[test]
    fn junction_slack_flags() {
        let j = Junction {
            id: Id::from_index(0),
            name: "j0".into(),
            height_m: 0.0,
            nominal_pressure: tf_core::units::pa(5e5),
            initial_temperature: tf_core::units::k(293.15),
            in_service: true,
            pressure_bc: Some(tf_core::units::pa(5e5)),
            temperature_bc: None,
            mass_injection_kgps: 0.0,
        };
        assert!(j.is_pressure_slack());
        assert!(!j.is_temperature_slack());
    }
}
