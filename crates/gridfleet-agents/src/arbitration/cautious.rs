//! Cautious serialization: resolve a collision by letting the colliding
//! agents finish their paths one at a time.

use gridfleet_types::{Agent, AgentId};
use tracing::{info, warn};

use super::{ArbitrationContext, ArbitrationOutcome, ArbitrationStrategy, involved_ids};
use crate::collision::CollisionPair;
use crate::motion::{StepOutcome, advance};

/// Drains colliding agents to completion, shortest remaining path first.
///
/// While one agent is draining every other agent stays where it is. Each
/// drain step rebuilds the grid and presents a frame, then waits the
/// context's step delay. A drain stops early whenever a rebuild finds the
/// agent outside the grid; an agent already outside whose path leads back
/// in is drained normally.
#[derive(Debug, Clone, Copy, Default)]
pub struct CautiousSerialization;

impl CautiousSerialization {
    /// Create the strategy.
    pub const fn new() -> Self {
        Self
    }
}

impl ArbitrationStrategy for CautiousSerialization {
    fn name(&self) -> &'static str {
        "cautious"
    }

    fn arbitrate(
        &mut self,
        ctx: &mut ArbitrationContext<'_>,
        collisions: &[CollisionPair],
    ) -> ArbitrationOutcome {
        let mut outcome = ArbitrationOutcome::default();
        if collisions.is_empty() {
            return outcome;
        }

        let involved = involved_ids(collisions);
        let mut order: Vec<usize> = ctx
            .agents
            .iter()
            .enumerate()
            .filter(|(_, a)| involved.contains(&a.id))
            .map(|(idx, _)| idx)
            .collect();
        // Stable: ties keep fleet order.
        order.sort_by_key(|&idx| ctx.agents.get(idx).map_or(0, Agent::remaining_waypoints));

        for idx in order {
            if let Some(id) = drain(ctx, idx, &mut outcome.frames) {
                outcome.resumed.push(id.clone());
                outcome.drained.push(id);
            }
        }

        outcome
    }
}

/// Drive the agent at `idx` to the end of its path.
///
/// Returns the agent's id if it finished unpaused.
fn drain(ctx: &mut ArbitrationContext<'_>, idx: usize, frames: &mut u64) -> Option<AgentId> {
    let agent = ctx.agents.get_mut(idx)?;
    agent.paused = false;
    let id = agent.id.clone();
    info!(agent = %id, remaining = agent.remaining_waypoints(), "draining agent");

    loop {
        let step = ctx.agents.get_mut(idx).map(advance)?;
        if !matches!(step, StepOutcome::Stepped { .. }) {
            break;
        }

        ctx.grid.rebuild(ctx.agents);
        ctx.sink.present(&ctx.grid.snapshot());
        *frames = frames.saturating_add(1);

        let agent = ctx.agents.get(idx)?;
        if agent.paused {
            warn!(
                agent = %id,
                position = %agent.position,
                "drain interrupted, agent outside the grid"
            );
            return None;
        }
        if agent.is_idle() {
            break;
        }
        if !ctx.step_delay.is_zero() {
            std::thread::sleep(ctx.step_delay);
        }
    }

    info!(agent = %id, "agent drained");
    Some(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use gridfleet_types::{GridPos, Waypoint};
    use gridfleet_world::{MemoryFrameSink, OccupancyGrid};

    use super::*;

    fn agent(id: &str, x: i64, y: i64, path: &[(i64, i64)]) -> Agent {
        Agent::new(
            AgentId::new(id),
            GridPos::new(x, y),
            path.iter().map(|&(px, py)| Waypoint::new(px, py, 0.0)),
        )
    }

    fn pair(a: &str, b: &str) -> CollisionPair {
        CollisionPair {
            first: AgentId::new(a),
            second: AgentId::new(b),
        }
    }

    fn run(
        agents: &mut [Agent],
        collisions: &[CollisionPair],
        sink: &mut MemoryFrameSink,
    ) -> ArbitrationOutcome {
        let mut grid = OccupancyGrid::new(10, 10).unwrap();
        let mut ctx = ArbitrationContext {
            agents,
            grid: &mut grid,
            sink,
            step_delay: Duration::ZERO,
        };
        CautiousSerialization::new().arbitrate(&mut ctx, collisions)
    }

    #[test]
    fn no_collisions_is_a_no_op() {
        let mut agents = vec![agent("a", 0, 0, &[(3, 0)])];
        agents[0].paused = true;
        let mut sink = MemoryFrameSink::new();
        let outcome = run(&mut agents, &[], &mut sink);
        assert_eq!(outcome, ArbitrationOutcome::default());
        assert!(agents[0].paused);
        assert!(sink.frames().is_empty());
    }

    #[test]
    fn shortest_path_drains_first() {
        let mut agents = vec![
            agent("long", 0, 0, &[(2, 0), (2, 2), (0, 2)]),
            agent("short", 5, 5, &[(7, 5)]),
        ];
        agents[0].paused = true;
        agents[1].paused = true;

        let mut sink = MemoryFrameSink::new();
        let outcome = run(&mut agents, &[pair("long", "short")], &mut sink);

        assert_eq!(outcome.drained, vec![AgentId::new("short"), AgentId::new("long")]);
        assert!(agents.iter().all(|a| a.is_idle() && !a.paused));
        assert_eq!(agents[1].position, GridPos::new(7, 5));
        assert_eq!(agents[0].position, GridPos::new(0, 2));
        // 2 steps for short, 6 for long.
        assert_eq!(outcome.frames, 8);
        assert_eq!(sink.frames().len(), 8);
    }

    #[test]
    fn other_agents_hold_still_during_drain() {
        let mut agents = vec![
            agent("a", 0, 0, &[(3, 0)]),
            agent("b", 0, 3, &[(0, 9)]),
            agent("bystander", 9, 9, &[(9, 0)]),
        ];
        let mut sink = MemoryFrameSink::new();
        run(&mut agents, &[pair("a", "b")], &mut sink);

        let first_frames = 3;
        for frame in sink.frames().iter().take(first_frames) {
            assert_eq!(frame.position_of(&AgentId::new("b")), Some(GridPos::new(0, 3)));
        }
        for frame in sink.frames() {
            assert_eq!(frame.position_of(&AgentId::new("bystander")), Some(GridPos::new(9, 9)));
        }
        assert_eq!(agents[2].remaining_waypoints(), 1);
    }

    #[test]
    fn ties_keep_fleet_order() {
        let mut agents = vec![agent("x", 0, 0, &[(1, 0)]), agent("y", 5, 0, &[(6, 0)])];
        let mut sink = MemoryFrameSink::new();
        let outcome = run(&mut agents, &[pair("x", "y")], &mut sink);
        assert_eq!(outcome.drained, vec![AgentId::new("x"), AgentId::new("y")]);
    }

    #[test]
    fn drain_stops_when_agent_leaves_grid() {
        let mut agents = vec![
            agent("lost", 8, 8, &[(25, 25)]),
            agent("ok", 0, 0, &[(0, 3), (0, 4)]),
        ];
        let mut sink = MemoryFrameSink::new();
        let outcome = run(&mut agents, &[pair("lost", "ok")], &mut sink);

        assert_eq!(outcome.drained, vec![AgentId::new("ok")]);
        assert!(agents[0].paused);
        assert_eq!(agents[0].position, GridPos::new(10, 10));
        assert!(agents[1].is_idle());
    }

    #[test]
    fn agent_outside_grid_drains_back_in() {
        let mut agents = vec![agent("out", -3, 5, &[(3, 5)]), agent("x", 1, 3, &[(1, 8)])];
        agents[0].paused = true;
        let mut sink = MemoryFrameSink::new();
        let outcome = run(&mut agents, &[pair("out", "x")], &mut sink);

        // First step to (-2, 5) is still outside and ends that drain.
        assert_eq!(outcome.drained, vec![AgentId::new("x")]);
        assert!(agents[0].paused);
        assert_eq!(agents[0].position, GridPos::new(-2, 5));

        let again = run(&mut agents, &[pair("out", "x")], &mut sink);
        assert!(!again.drained.contains(&AgentId::new("out")));
        assert_eq!(agents[0].position, GridPos::new(-1, 5));

        let last = run(&mut agents, &[pair("out", "x")], &mut sink);
        assert!(last.drained.contains(&AgentId::new("out")));
        assert_eq!(agents[0].position, GridPos::new(3, 5));
        assert!(agents[0].is_idle() && !agents[0].paused);
    }
}
