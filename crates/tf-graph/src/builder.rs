//! Incremental graph builder.

use std::collections::HashMap;
use tf_core::units::{Pressure, Temperature};
use tf_core::{BranchId, NodeId, TfResult};

use crate::graph::{Branch, BranchKind, Graph, Junction, Orientation, PipeSection};
use crate::validate;

/// Builder for constructing a graph incrementally.
///
/// Use `add_junction` and `add_branch` to build up the graph, then call
/// `build()` to validate and freeze it into an immutable `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    junctions: Vec<Junction>,
    branches: Vec<Branch>,
    next_node_id: u32,
    next_branch_id: u32,
    next_pipe_index: u32,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a junction and return its ID.
    pub fn add_junction(
        &mut self,
        name: impl Into<String>,
        height_m: f64,
        nominal_pressure: Pressure,
        initial_temperature: Temperature,
    ) -> NodeId {
        let id = NodeId::from_index(self.next_node_id);
        self.next_node_id += 1;
        self.junctions.push(Junction {
            id,
            name: name.into(),
            height_m,
            nominal_pressure,
            initial_temperature,
            in_service: true,
            pressure_bc: None,
            temperature_bc: None,
            mass_injection_kgps: 0.0,
        });
        id
    }

    pub fn set_pressure_bc(&mut self, node: NodeId, p: Pressure) {
        if let Some(j) = self.junctions.get_mut(node.index() as usize) {
            j.pressure_bc = Some(p);
        }
    }

    pub fn set_temperature_bc(&mut self, node: NodeId, t: Temperature) {
        if let Some(j) = self.junctions.get_mut(node.index() as usize) {
            j.temperature_bc = Some(t);
        }
    }

    pub fn set_mass_injection(&mut self, node: NodeId, kgps: f64) {
        if let Some(j) = self.junctions.get_mut(node.index() as usize) {
            j.mass_injection_kgps = kgps;
        }
    }

    pub fn set_junction_in_service(&mut self, node: NodeId, in_service: bool) {
        if let Some(j) = self.junctions.get_mut(node.index() as usize) {
            j.in_service = in_service;
        }
    }

    /// Add a single branch connecting two junctions. Returns the branch ID.
    pub fn add_branch(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        kind: BranchKind,
    ) -> BranchId {
        self.add_branch_with_section(name, from, to, kind, None)
    }

    fn add_branch_with_section(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        kind: BranchKind,
        section: Option<PipeSection>,
    ) -> BranchId {
        let id = BranchId::from_index(self.next_branch_id);
        self.next_branch_id += 1;
        self.branches.push(Branch {
            id,
            name: name.into(),
            from,
            to,
            kind,
            in_service: true,
            section,
        });
        id
    }

    pub fn set_branch_in_service(&mut self, branch: BranchId, in_service: bool) {
        if let Some(b) = self.branches.get_mut(branch.index() as usize) {
            b.in_service = in_service;
        }
    }

    /// Add a pipe subdivided into `sections` branch rows, creating
    /// `sections - 1` internal junctions between `from` and `to`.
    ///
    /// The internal junctions inherit `to`'s nominal pressure/temperature as
    /// an initial guess and sit at linearly interpolated height between
    /// `from` and `to`. Returns the branch IDs in `from -> to` order. Each
    /// row is tagged with a `PipeSection{pipe_index, section_index}` so the
    /// result extractor can address it by (pipe, section) rather than only
    /// by its generated name.
    pub fn add_pipe_sections(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        sections: usize,
    ) -> Vec<BranchId> {
        assert!(sections >= 1, "a pipe must have at least one section");
        let name = name.into();
        let pipe_index = self.next_pipe_index;
        self.next_pipe_index += 1;

        if sections == 1 {
            let section = Some(PipeSection {
                pipe_index,
                section_index: 0,
            });
            return vec![self.add_branch_with_section(name, from, to, BranchKind::Pipe, section)];
        }

        let from_j = self.junctions[from.index() as usize].clone();
        let to_j = self.junctions[to.index() as usize].clone();

        let mut internal_nodes = Vec::with_capacity(sections - 1);
        for s in 1..sections {
            let frac = s as f64 / sections as f64;
            let height = from_j.height_m + frac * (to_j.height_m - from_j.height_m);
            let node = self.add_junction(
                format!("{name}_section{s}"),
                height,
                to_j.nominal_pressure,
                to_j.initial_temperature,
            );
            internal_nodes.push(node);
        }

        let mut endpoints = Vec::with_capacity(sections + 1);
        endpoints.push(from);
        endpoints.extend(internal_nodes);
        endpoints.push(to);

        let mut ids = Vec::with_capacity(sections);
        for i in 0..sections {
            let branch_name = format!("{name}_section{i}");
            let section = Some(PipeSection {
                pipe_index,
                section_index: i as u32,
            });
            ids.push(self.add_branch_with_section(
                branch_name,
                endpoints[i],
                endpoints[i + 1],
                BranchKind::Pipe,
                section,
            ));
        }
        ids
    }

    /// Build and validate the graph, returning an immutable `Graph`.
    pub fn build(self) -> TfResult<Graph> {
        validate::validate_structure(&self.junctions, &self.branches)?;

        let (node_branch_offsets, node_branches) =
            Self::build_adjacency(&self.junctions, &self.branches);

        Ok(Graph {
            junctions: self.junctions,
            branches: self.branches,
            node_branch_offsets,
            node_branches,
        })
    }

    fn build_adjacency(
        junctions: &[Junction],
        branches: &[Branch],
    ) -> (Vec<usize>, Vec<(BranchId, Orientation)>) {
        let mut node_to_branches: HashMap<NodeId, Vec<(BranchId, Orientation)>> = HashMap::new();
        for branch in branches {
            node_to_branches
                .entry(branch.from)
                .or_default()
                .push((branch.id, Orientation::From));
            node_to_branches
                .entry(branch.to)
                .or_default()
                .push((branch.id, Orientation::To));
        }
        for list in node_to_branches.values_mut() {
            list.sort_by_key(|(id, _)| id.index());
        }

        let mut offsets = Vec::with_capacity(junctions.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0);
        for j in junctions {
            if let Some(list) = node_to_branches.get(&j.id) {
                flat.extend_from_slice(list);
            }
            offsets.push(flat.len());
        }
        (offsets, flat)
    }
}
