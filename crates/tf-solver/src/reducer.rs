//! Projects the full PIT down to its in-service, reachable subset.
//!
//! The hydraulic/thermal Newton kernels only ever see this reduced index
//! space; `scatter_*` puts results back into the full PIT's arrays so
//! out-of-service elements keep their last (or flat-start) values in the
//! result tables rather than being silently dropped.

use crate::pit::NetworkPit;

/// One reduced branch row: active-space endpoints plus the full-PIT index
/// needed to look up the component model and write results back.
#[derive(Debug, Clone, Copy)]
pub struct ActiveBranch {
    pub full_idx: usize,
    pub from_active: usize,
    pub to_active: usize,
}

/// Active-subset index translation, built fresh for every solve.
pub struct ActivePit {
    /// Active node index -> full node index.
    pub node_full: Vec<usize>,
    /// Full node index -> active node index, `None` if out of service.
    pub node_active: Vec<Option<usize>>,
    pub branches: Vec<ActiveBranch>,
    /// Full branch index -> position in `branches`, `None` if out of service.
    pub branch_active: Vec<Option<usize>>,
}

impl ActivePit {
    pub fn build(pit: &NetworkPit) -> Self {
        let mut node_full = Vec::new();
        let mut node_active = vec![None; pit.node_count()];
        for (i, &in_service) in pit.node_in_service.iter().enumerate() {
            if in_service {
                node_active[i] = Some(node_full.len());
                node_full.push(i);
            }
        }

        let mut branches = Vec::new();
        let mut branch_active = vec![None; pit.branch_count()];
        for (b_idx, branch) in pit.graph.branches().iter().enumerate() {
            if !pit.branch_in_service[b_idx] {
                continue;
            }
            let from_active = match node_active[branch.from.index() as usize] {
                Some(a) => a,
                None => continue,
            };
            let to_active = match node_active[branch.to.index() as usize] {
                Some(a) => a,
                None => continue,
            };
            branch_active[b_idx] = Some(branches.len());
            branches.push(ActiveBranch {
                full_idx: b_idx,
                from_active,
                to_active,
            });
        }

        Self {
            node_full,
            node_active,
            branches,
            branch_active,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_full.len()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Scatter a reduced pressure vector back into the full PIT.
    pub fn scatter_pressure(&self, pit: &mut NetworkPit, p_active: &[f64]) {
        for (a, &full) in self.node_full.iter().enumerate() {
            pit.p[full] = p_active[a];
        }
    }

    /// Scatter a reduced mass-flow vector back into the full PIT.
    pub fn scatter_mdot(&self, pit: &mut NetworkPit, mdot_active: &[f64]) {
        for (a, branch) in self.branches.iter().enumerate() {
            pit.mdot[branch.full_idx] = mdot_active[a];
        }
    }
}
