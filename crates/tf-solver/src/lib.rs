//! tf-solver: steady-state hydraulic and thermal network solver.
//!
//! [`pipeflow`] is the single entry point: build a process-internal table
//! from a topology + component set + fluid, run a connectivity check,
//! reduce to the in-service subset, solve hydraulics and/or thermal per
//! [`SolveOptions::mode`], then extract result tables.

pub mod connectivity;
pub mod error;
pub mod hydraulic;
pub mod network;
pub mod newton;
pub mod options;
pub mod pit;
pub mod reducer;
pub mod thermal;

pub use error::{SolverError, SolverResult};
pub use network::Network;
pub use newton::{NewtonConfig, NewtonResult};
pub use options::{SolveMode, SolveOptions, ZeroFlowPolicy};
pub use pit::NetworkPit;
pub use reducer::ActivePit;

use tf_components::AnyBranchComponent;
use tf_fluids::FluidModel;
use tf_graph::Graph;
use tf_results::NetworkResults;

/// Maximum number of hydraulic/thermal coupling passes in `Bidirectional`
/// mode. Each pass already runs hydraulics and thermal to their own
/// tolerances; this cap bounds how many times they re-solve each other
/// when temperature-dependent fluid properties couple the two.
const MAX_COUPLING_PASSES: usize = 10;

/// Solve a steady-state network and return both the final internal state
/// and its extracted result tables.
pub fn pipeflow(
    graph: Graph,
    components: Vec<AnyBranchComponent>,
    fluid: Box<dyn FluidModel>,
    options: &SolveOptions,
) -> SolverResult<(NetworkPit, NetworkResults)> {
    let mut pit = NetworkPit::build(graph, components, fluid, None)?;
    run_solve(&mut pit, options)?;
    let results = build_results(&pit, options);
    Ok((pit, results))
}

/// Applies the solve-level friction override, checks connectivity, reduces
/// to the active subset, and runs whichever physics `options.mode` asks
/// for. Shared by the one-shot [`pipeflow`] entry point and [`Network`]'s
/// persistent workspace.
pub(crate) fn run_solve(pit: &mut NetworkPit, options: &SolveOptions) -> SolverResult<()> {
    pit.apply_friction_model(options.effective_friction_model());

    let require_thermal_slack = matches!(
        options.mode,
        SolveMode::HeatOnly | SolveMode::Sequential | SolveMode::Bidirectional
    );
    if options.check_connectivity {
        connectivity::check(pit, require_thermal_slack)?;
    }

    let active = ActivePit::build(pit);

    match options.mode {
        SolveMode::HydraulicsOnly => {
            hydraulic::solve(pit, &active, options)?;
        }
        SolveMode::HeatOnly => {
            thermal::solve(pit, &active, options)?;
        }
        SolveMode::Sequential => {
            hydraulic::solve(pit, &active, options)?;
            thermal::solve(pit, &active, options)?;
        }
        SolveMode::Bidirectional => {
            solve_bidirectional(pit, &active, options)?;
        }
    }

    Ok(())
}

/// Re-solves hydraulics and thermal against each other until both node
/// pressures and node temperatures stop moving (within `tol_p`/`tol_t`) or
/// the coupling-pass cap is hit.
fn solve_bidirectional(
    pit: &mut NetworkPit,
    active: &ActivePit,
    options: &SolveOptions,
) -> SolverResult<()> {
    let mut prev_p = pit.p.clone();
    let mut prev_t = pit.t_node.clone();
    let mut max_dp = f64::INFINITY;
    let mut max_dt = f64::INFINITY;

    for _ in 0..MAX_COUPLING_PASSES {
        hydraulic::solve(pit, active, options)?;
        thermal::solve(pit, active, options)?;

        max_dp = pit
            .p
            .iter()
            .zip(&prev_p)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        max_dt = pit
            .t_node
            .iter()
            .zip(&prev_t)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        prev_p.copy_from_slice(&pit.p);
        prev_t.copy_from_slice(&pit.t_node);

        if max_dp < options.tol_p && max_dt < options.tol_t {
            return Ok(());
        }
    }

    Err(SolverError::NoConvergence {
        last_residual: max_dp.max(max_dt),
    })
}

pub(crate) fn build_results(pit: &NetworkPit, options: &SolveOptions) -> NetworkResults {
    let net = tf_results::SolvedNetwork {
        graph: &pit.graph,
        components: &pit.components,
        fluid: pit.fluid.as_ref(),
        p: &pit.p,
        t_node: &pit.t_node,
        mdot: &pit.mdot,
        t_in: &pit.t_in,
        t_out: &pit.t_out,
        node_in_service: &pit.node_in_service,
        branch_in_service: &pit.branch_in_service,
        ambient_pressure: options.ambient_pressure,
        ambient_temperature: options.ambient_temperature,
    };
    tf_results::extract(&net)
}
