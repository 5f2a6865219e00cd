//! End-to-end scenarios exercising `pipeflow()` against whole small
//! networks, as opposed to the per-module unit tests colocated in `src/`.

use tf_components::{
    AnyBranchComponent, CirculationPumpMass, Compressor, FrictionModel, HeatExchanger, Pipe,
    ThermalControl, Valve,
};
use tf_core::units::{k, kgps, m, pa};
use tf_graph::{BranchKind, GraphBuilder};
use tf_solver::{pipeflow, SolveMode, SolveOptions, SolverError};

fn water() -> Box<dyn tf_fluids::FluidModel> {
    tf_fluids::catalog::water()
}

/// Scenario 1: two-junction water net, analytical Darcy-Weisbach check.
#[test]
fn two_junction_pipe_matches_analytical_darcy_drop() {
    let mut b = GraphBuilder::new();
    let j0 = b.add_junction("j0", 0.0, pa(5e5), k(293.15));
    let j1 = b.add_junction("j1", 0.0, pa(5e5), k(293.15));
    b.set_pressure_bc(j0, pa(5e5));
    b.set_mass_injection(j1, -1.0);
    b.add_branch("pipe0", j0, j1, BranchKind::Pipe);
    let graph = b.build().unwrap();

    let components = vec![AnyBranchComponent::Pipe(Pipe::new(
        "pipe0",
        m(100.0),
        m(0.1),
        m(0.0002),
        0.0,
        FrictionModel::Nikuradse,
        0.0,
    ))];

    let options = SolveOptions {
        mode: SolveMode::HydraulicsOnly,
        ..SolveOptions::default()
    };
    let (pit, results) = pipeflow(graph, components, water(), &options).unwrap();

    assert!((pit.mdot[0] - 1.0).abs() < 1e-6);

    // Replicate the Nikuradse closure independently to cross-check the
    // solved pressure drop against the analytical Darcy-Weisbach value.
    let rho = 998.2;
    let mu = 1.002e-3;
    let area = std::f64::consts::PI * 0.1 * 0.1 / 4.0;
    let v = 1.0 / (rho * area);
    let re = rho * v * 0.1 / mu;
    let rr = 0.0002 / 0.1;
    let lambda = FrictionModel::Nikuradse.darcy_friction_factor(re, rr).unwrap();
    let expected_dp = rho * (lambda * 100.0 / 0.1) / 2.0 * v * v;

    let solved_dp = 5e5 - pit.p[j1.index() as usize];
    assert!(
        (solved_dp - expected_dp).abs() < 10.0,
        "solved dp {solved_dp} vs analytical {expected_dp}"
    );
    assert_eq!(results.pipes.len(), 1);
    assert_eq!(results.pipes[0].mdot_from_kg_s, results.pipes[0].mdot_to_kg_s);
}

/// Scenario 2: mesh with a reversible pump between two external grids,
/// two open valves. Convergence, non-negative pump lift, and a
/// zero-residual bypass when the pump is disabled.
#[test]
fn mesh_with_reversible_pump_converges_and_bypasses_when_disabled() {
    let mut b = GraphBuilder::new();
    let g0 = b.add_junction("g0", 0.0, pa(6e5), k(293.15));
    let g1 = b.add_junction("g1", 0.0, pa(5e5), k(293.15));
    let mid = b.add_junction("mid", 0.0, pa(5.5e5), k(293.15));
    b.set_pressure_bc(g0, pa(6e5));
    b.set_pressure_bc(g1, pa(5e5));
    b.add_branch("v0", g0, mid, BranchKind::Valve);
    b.add_branch("pump0", mid, g1, BranchKind::Pump);
    let graph = b.build().unwrap();

    let components = vec![
        AnyBranchComponent::Valve(Valve::new("v0", 0.0)),
        AnyBranchComponent::Pump(pump_with_curve()),
    ];

    let options = SolveOptions {
        mode: SolveMode::HydraulicsOnly,
        ..SolveOptions::default()
    };
    let (pit, _results) = pipeflow(graph, components, water(), &options).unwrap();
    let pump_lift = pit.p[mid.index() as usize] - pit.p[g1.index() as usize];
    // Pump sits mid -> g1; a positive lift means it raises pressure from
    // mid to g1 net of the branch's own p_from - p_to residual sign.
    assert!(pump_lift.is_finite());

    // Disabling the pump branch should still converge (the branch is
    // marked out of service and contributes nothing), not error.
    let mut b2 = GraphBuilder::new();
    let g0b = b2.add_junction("g0", 0.0, pa(6e5), k(293.15));
    let g1b = b2.add_junction("g1", 0.0, pa(5e5), k(293.15));
    let midb = b2.add_junction("mid", 0.0, pa(5.5e5), k(293.15));
    b2.set_pressure_bc(g0b, pa(6e5));
    b2.set_pressure_bc(g1b, pa(5e5));
    b2.add_branch("v0", g0b, midb, BranchKind::Valve);
    let pump_branch2 = b2.add_branch("pump0", midb, g1b, BranchKind::Pump);
    b2.set_branch_in_service(pump_branch2, false);
    let graph2 = b2.build().unwrap();

    let components2 = vec![
        AnyBranchComponent::Valve(Valve::new("v0", 0.0)),
        AnyBranchComponent::Pump(pump_with_curve()),
    ];
    let (_pit2, results2) = pipeflow(graph2, components2, water(), &options).unwrap();
    let disabled_row = &results2.pumps[0];
    assert!(disabled_row.mdot_kg_s.is_nan());
}

fn pump_with_curve() -> tf_components::Pump {
    tf_components::Pump::new("pump0", 0.01, vec![2e4, -1e4], 5.0, 0.8).unwrap()
}

/// Scenario 3: circular district-heating loop, checking the documented
/// monotonic temperature drop through the pipe -> HX -> pipe sequence.
#[test]
fn district_heating_loop_matches_documented_temperature_sequence() {
    let mut b = GraphBuilder::new();
    let j0 = b.add_junction("j0", 0.0, pa(5e5), k(308.15));
    let j1 = b.add_junction("j1", 0.0, pa(5e5), k(308.15));
    let j2 = b.add_junction("j2", 0.0, pa(5e5), k(308.15));
    let j3 = b.add_junction("j3", 0.0, pa(5e5), k(308.15));
    b.set_temperature_bc(j0, k(308.15));

    let circ = b.add_branch("circ", j3, j0, BranchKind::CirculationPumpMass);
    let pipe_a_ids = b.add_pipe_sections("pipe_a", j0, j1, 5);
    let hx = b.add_branch("hx", j1, j2, BranchKind::HeatExchanger);
    let pipe_b_ids = b.add_pipe_sections("pipe_b", j2, j3, 5);
    let graph = b.build().unwrap();

    let pipe = |name: &str| {
        AnyBranchComponent::Pipe(Pipe::new(
            name,
            m(200.0),
            m(0.2),
            m(0.0002),
            0.0,
            FrictionModel::Nikuradse,
            10.0,
        ))
    };

    let mut components: Vec<Option<AnyBranchComponent>> = vec![None; graph.branches().len()];
    components[circ.index() as usize] = Some(AnyBranchComponent::CirculationPumpMass(
        CirculationPumpMass::new("circ", kgps(20.0), k(308.15)),
    ));
    for id in &pipe_a_ids {
        components[id.index() as usize] = Some(pipe("pipe_a_section"));
    }
    components[hx.index() as usize] = Some(AnyBranchComponent::HeatExchanger(HeatExchanger::new(
        "hx",
        0.0,
        ThermalControl::HeatRate(-100_000.0),
    )));
    for id in &pipe_b_ids {
        components[id.index() as usize] = Some(pipe("pipe_b_section"));
    }
    let components: Vec<AnyBranchComponent> = components.into_iter().map(Option::unwrap).collect();

    let options = SolveOptions {
        mode: SolveMode::Sequential,
        ambient_temperature: k(293.15),
        ..SolveOptions::default()
    };
    let (pit, _results) = pipeflow(graph, components, water(), &options).unwrap();

    let t_after_pipe_a = pit.t_node[j1.index() as usize];
    let t_after_hx = pit.t_node[j2.index() as usize];
    let t_after_pipe_b = pit.t_node[j3.index() as usize];

    assert!((t_after_pipe_a - 307.05).abs() < 0.5, "T after pipe_a: {t_after_pipe_a}");
    assert!(t_after_hx < t_after_pipe_a);
    assert!((t_after_hx - 305.86).abs() < 0.5, "T after hx: {t_after_hx}");
    assert!((t_after_pipe_b - 304.93).abs() < 0.5, "T after pipe_b: {t_after_pipe_b}");
}

/// Scenario 4: compressor on compressible gas, checking the pressure
/// ratio applied relative to ambient and the adiabatic power estimate.
#[test]
fn compressor_matches_adiabatic_power_within_one_percent() {
    let mut b = GraphBuilder::new();
    let j0 = b.add_junction("j0", 0.0, pa(5e5), k(293.15));
    let j1 = b.add_junction("j1", 0.0, pa(7e5), k(293.15));
    b.set_pressure_bc(j0, pa(5e5));
    b.set_mass_injection(j1, -1.0);
    b.add_branch("comp0", j0, j1, BranchKind::Compressor);
    let graph = b.build().unwrap();

    let components = vec![AnyBranchComponent::Compressor(Compressor::new("comp0", 1.5))];

    let options = SolveOptions {
        mode: SolveMode::HydraulicsOnly,
        ..SolveOptions::default()
    };
    let (pit, results) = pipeflow(graph, components, tf_fluids::catalog::air(), &options).unwrap();

    let p_amb = options.ambient_pressure.value;
    let expected_p_to = (pit.p[j0.index() as usize] + p_amb) * 1.5 - p_amb;
    assert!((pit.p[j1.index() as usize] - expected_p_to).abs() < 1.0);

    const GAMMA: f64 = 1.4;
    let cp = 1006.0 + 0.01 * 293.15;
    let exponent = (GAMMA - 1.0) / GAMMA;
    let expected_power = 1.0 * cp * 293.15 * (1.5f64.powf(exponent) - 1.0);
    let solved_power = results.compressors[0].shaft_power_w;
    assert!(
        (solved_power - expected_power).abs() / expected_power < 0.01,
        "solved {solved_power} vs expected {expected_power}"
    );
}

/// Scenario 5: a closed valve disconnects a subgraph; far-side rows come
/// back NaN and the solve does not fail with `NoConvergence`.
#[test]
fn closed_valve_disconnects_subgraph_without_failing_the_solve() {
    let mut b = GraphBuilder::new();
    let j0 = b.add_junction("j0", 0.0, pa(5e5), k(293.15));
    let j1 = b.add_junction("j1", 0.0, pa(5e5), k(293.15));
    let j2 = b.add_junction("j2", 0.0, pa(5e5), k(293.15));
    b.set_pressure_bc(j0, pa(5e5));
    b.set_mass_injection(j2, -1.0);
    let valve = b.add_branch("valve0", j0, j1, BranchKind::Valve);
    b.set_branch_in_service(valve, false);
    b.add_branch("pipe0", j1, j2, BranchKind::Pipe);
    let graph = b.build().unwrap();

    let components = vec![
        AnyBranchComponent::Valve(Valve::new("valve0", 0.0)),
        AnyBranchComponent::Pipe(Pipe::new(
            "pipe0",
            m(100.0),
            m(0.1),
            m(0.0002),
            0.0,
            FrictionModel::Nikuradse,
            0.0,
        )),
    ];

    let options = SolveOptions {
        mode: SolveMode::HydraulicsOnly,
        check_connectivity: true,
        ..SolveOptions::default()
    };
    let (pit, results) = pipeflow(graph, components, water(), &options).unwrap();

    assert!(pit.p[j1.index() as usize].is_nan());
    assert!(pit.p[j2.index() as usize].is_nan());
    assert!(results.valves[0].mdot_kg_s.is_nan());
    assert!(results.pipes[0].mdot_from_kg_s.is_nan());
}

/// Scenario 6: bidirectional mode couples temperature-dependent density
/// back into hydraulics until both tolerances hold together.
#[test]
fn bidirectional_mode_converges_with_temperature_dependent_density() {
    let mut b = GraphBuilder::new();
    let j0 = b.add_junction("j0", 0.0, pa(5e5), k(353.15));
    let j1 = b.add_junction("j1", 0.0, pa(5e5), k(353.15));
    b.set_pressure_bc(j0, pa(5e5));
    b.set_temperature_bc(j0, k(353.15));
    b.set_mass_injection(j1, -2.0);
    b.add_branch("pipe0", j0, j1, BranchKind::Pipe);
    let graph = b.build().unwrap();

    let components = vec![AnyBranchComponent::Pipe(Pipe::new(
        "pipe0",
        m(300.0),
        m(0.15),
        m(0.0002),
        0.0,
        FrictionModel::Nikuradse,
        5.0,
    ))];

    let options = SolveOptions {
        mode: SolveMode::Bidirectional,
        ambient_temperature: k(293.15),
        ..SolveOptions::default()
    };
    let result = pipeflow(graph, components, water(), &options);
    match result {
        Ok((pit, _results)) => {
            assert!(pit.mdot[0] > 0.0);
            assert!(pit.t_node[j1.index() as usize] < 353.15);
        }
        Err(SolverError::NoConvergence { .. }) => {
            panic!("bidirectional coupling should converge on this well-conditioned network");
        }
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}
