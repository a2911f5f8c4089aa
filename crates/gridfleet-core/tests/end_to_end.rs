//! End-to-end runs: config, fleet construction, driver, detection, and
//! arbitration working together.

#![allow(clippy::unwrap_used)]

use gridfleet_agents::StrategyKind;
use gridfleet_core::{
    FleetConfig, NoOpCallback, Simulation, SimulationEndReason, StopSignal, generate_fleet,
    run_simulation,
};
use gridfleet_types::{Agent, AgentId, GridPos, Waypoint};
use gridfleet_world::{MemoryFrameSink, OccupancyGrid, render_text};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn agent(id: &str, x: i64, y: i64, path: &[(i64, i64)]) -> Agent {
    Agent::new(
        AgentId::new(id),
        GridPos::new(x, y),
        path.iter().map(|&(px, py)| Waypoint::new(px, py, 0.0)),
    )
}

fn build(agents: Vec<Agent>, max_ticks: u64) -> Simulation<MemoryFrameSink> {
    Simulation::new(
        agents,
        OccupancyGrid::new(20, 20).unwrap(),
        MemoryFrameSink::new(),
        StopSignal::new(),
    )
    .with_max_ticks(max_ticks)
}

#[test]
fn cautious_run_completes_every_path() {
    let agents = vec![
        agent("a", 0, 0, &[(8, 0)]),
        agent("b", 8, 0, &[(0, 0), (0, 5)]),
        agent("c", 4, 4, &[(4, 8)]),
    ];
    let mut sim = build(agents, 20);
    let mut strategy = StrategyKind::Cautious.build();
    let result = run_simulation(&mut sim, strategy.as_mut(), &mut NoOpCallback);

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert!(result.total_collisions >= 1);
    assert!(sim.agents().iter().all(|a| a.is_idle() && !a.paused));
    assert_eq!(sim.agents()[0].position, GridPos::new(8, 0));
    assert_eq!(sim.agents()[1].position, GridPos::new(0, 5));
    assert_eq!(sim.agents()[2].position, GridPos::new(4, 8));

    // Drain frames come on top of the one-per-tick frames.
    assert!(sim.sink().frames().len() > 20);
}

#[test]
fn aggressive_run_leaves_out_of_bounds_agent_paused() {
    let agents = vec![agent("runaway", 18, 18, &[(25, 25)]), agent("home", 0, 0, &[(3, 3)])];
    let mut sim = build(agents, 10);
    let mut strategy = StrategyKind::Aggressive.build();
    run_simulation(&mut sim, strategy.as_mut(), &mut NoOpCallback);

    // Resumed every tick, re-paused by every rebuild, until its path ends
    // outside the grid.
    let runaway = &sim.agents()[0];
    assert!(runaway.paused);
    assert!(runaway.is_idle());
    assert_eq!(runaway.position, GridPos::new(25, 25));
    assert!(sim.agents()[1].is_idle());

    let last = sim.sink().last().unwrap();
    assert!(last.cells.iter().flatten().all(|m| m.label != 'R'));
    assert!(render_text(last).contains("runaway: (x: 25, y: 25)"));
}

#[test]
fn aggressive_run_brings_agent_back_into_grid() {
    let agents = vec![agent("out", -3, 5, &[(3, 5)]), agent("x", 1, 3, &[(1, 8)])];
    let mut sim = build(agents, 20);
    let mut strategy = StrategyKind::Aggressive.build();
    let result = run_simulation(&mut sim, strategy.as_mut(), &mut NoOpCallback);

    assert!(result.total_collisions >= 1);
    let out = &sim.agents()[0];
    assert_eq!(out.position, GridPos::new(3, 5));
    assert!(out.is_idle() && !out.paused);
    assert_eq!(sim.agents()[1].position, GridPos::new(1, 8));
}

#[test]
fn generated_fleet_runs_under_default_config() {
    let config = FleetConfig::parse("").unwrap();
    let mut rng = StdRng::seed_from_u64(config.world.seed);
    let agents =
        generate_fleet(&config.fleet, config.world.width, config.world.height, &mut rng).unwrap();
    assert_eq!(agents.len(), 5);

    let mut sim = build(agents, 60);
    let mut strategy = config.arbitration.strategy.build();
    let result = run_simulation(&mut sim, strategy.as_mut(), &mut NoOpCallback);

    assert_eq!(result.total_ticks, 60);
    assert!(sim.agents().iter().all(|a| (0..20).contains(&a.position.x)));
    let (agents, sink) = sim.into_parts();
    assert_eq!(agents.len(), 5);
    assert!(sink.frames().len() >= 60);
}

#[test]
fn shipped_crossing_scenario_resolves_under_cautious() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/json/scenario_2");
    let load = gridfleet_core::load_scenario_dir(&dir).unwrap();
    assert!(load.skipped.is_empty());
    assert_eq!(load.agents.len(), 3);

    let mut sim = build(load.agents, 5);
    let mut strategy = StrategyKind::Cautious.build();
    let result = run_simulation(&mut sim, strategy.as_mut(), &mut NoOpCallback);

    // All three legs cross on the first tick.
    assert_eq!(result.total_collisions, 3);
    let positions: Vec<GridPos> = sim.agents().iter().map(|a| a.position).collect();
    assert_eq!(
        positions,
        vec![GridPos::new(17, 10), GridPos::new(2, 10), GridPos::new(15, 17)]
    );
    assert!(sim.agents().iter().all(|a| a.is_idle() && !a.paused));
}
