//! Simulation loop runner.
//!
//! [`run_simulation`] drives the [`Simulation`] iterator and, between
//! ticks, runs collision detection and the chosen arbitration strategy:
//!
//! 1. Advance every agent, rebuild the grid, present the frame (the
//!    driver's `next`).
//! 2. Detect colliding pairs, pausing both members of each.
//! 3. Arbitrate. The strategy runs every tick, even with no new pairs, so
//!    agents paused on an earlier tick get another chance to resume.
//! 4. Notify the [`TickCallback`], then sleep the tick interval.
//!
//! The loop ends when the driver does: on the stop signal or at the tick
//! bound.

use gridfleet_agents::{ArbitrationOutcome, ArbitrationStrategy, CollisionPair};
use gridfleet_world::FrameSink;
use tracing::info;

use crate::driver::{Simulation, TickSummary};
use crate::operator::SimulationEndReason;

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Total collision pairs detected over the run.
    pub total_collisions: u64,
}

/// Callback invoked after each tick's arbitration pass.
pub trait TickCallback {
    /// Called once per tick with what the tick and its arbitration did.
    fn on_tick(
        &mut self,
        summary: &TickSummary,
        collisions: &[CollisionPair],
        outcome: &ArbitrationOutcome,
    );
}

/// A no-op tick callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(
        &mut self,
        _summary: &TickSummary,
        _collisions: &[CollisionPair],
        _outcome: &ArbitrationOutcome,
    ) {
    }
}

/// Run the simulation loop until the driver stops.
pub fn run_simulation<S: FrameSink>(
    sim: &mut Simulation<S>,
    strategy: &mut dyn ArbitrationStrategy,
    callback: &mut dyn TickCallback,
) -> SimulationResult {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut total_collisions: u64 = 0;

    info!(
        strategy = strategy.name(),
        agents = sim.agents().len(),
        max_ticks = sim.max_ticks(),
        tick_interval_ms = sim.tick_interval().as_millis(),
        "Simulation starting"
    );

    while let Some(summary) = sim.next() {
        total_ticks = total_ticks.saturating_add(1);

        let collisions = sim.detect_collisions();
        if !collisions.is_empty() {
            let pairs: Vec<String> = collisions.iter().map(ToString::to_string).collect();
            info!(tick = summary.tick, pairs = %pairs.join(", "), "Colliding agents detected");
            let found = u64::try_from(collisions.len()).unwrap_or(u64::MAX);
            total_collisions = total_collisions.saturating_add(found);
        }

        let outcome = strategy.arbitrate(&mut sim.arbitration_context(), &collisions);
        if !outcome.drained.is_empty() {
            info!(
                tick = summary.tick,
                drained = outcome.drained.len(),
                frames = outcome.frames,
                "Arbitration drained agents"
            );
        }

        callback.on_tick(&summary, &collisions, &outcome);
        last_summary = Some(summary);

        let interval = sim.tick_interval();
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    SimulationResult {
        end_reason: sim
            .end_reason()
            .unwrap_or(SimulationEndReason::StopRequested),
        final_summary: last_summary,
        total_ticks,
        total_collisions,
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        total_collisions = result.total_collisions,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridfleet_agents::StrategyKind;
    use gridfleet_types::{Agent, AgentId, GridPos, Waypoint};
    use gridfleet_world::{NullFrameSink, OccupancyGrid};

    use super::*;
    use crate::operator::StopSignal;

    fn agent(id: &str, x: i64, y: i64, path: &[(i64, i64)]) -> Agent {
        Agent::new(
            AgentId::new(id),
            GridPos::new(x, y),
            path.iter().map(|&(px, py)| Waypoint::new(px, py, 0.0)),
        )
    }

    /// Records what each tick saw.
    #[derive(Default)]
    struct Recorder {
        collisions: Vec<usize>,
        resumed: Vec<usize>,
    }

    impl TickCallback for Recorder {
        fn on_tick(
            &mut self,
            _summary: &TickSummary,
            collisions: &[CollisionPair],
            outcome: &ArbitrationOutcome,
        ) {
            self.collisions.push(collisions.len());
            self.resumed.push(outcome.resumed.len());
        }
    }

    /// Raises the stop signal after a fixed number of ticks.
    struct StopAfter {
        remaining: u32,
        signal: StopSignal,
    }

    impl TickCallback for StopAfter {
        fn on_tick(&mut self, _: &TickSummary, _: &[CollisionPair], _: &ArbitrationOutcome) {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.signal.raise();
            }
        }
    }

    fn grid() -> OccupancyGrid {
        OccupancyGrid::new(10, 10).unwrap()
    }

    #[test]
    fn runs_to_max_ticks() {
        let agents = vec![agent("a", 0, 0, &[(2, 0)])];
        let mut sim =
            Simulation::new(agents, grid(), NullFrameSink, StopSignal::new()).with_max_ticks(5);
        let mut strategy = StrategyKind::Aggressive.build();
        let result = run_simulation(&mut sim, strategy.as_mut(), &mut NoOpCallback);

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_summary.map(|s| s.tick), Some(5));
        assert!(sim.agents()[0].is_idle());
    }

    #[test]
    fn stop_signal_ends_the_run() {
        let signal = StopSignal::new();
        let agents = vec![agent("a", 0, 0, &[])];
        let mut sim = Simulation::new(agents, grid(), NullFrameSink, signal.clone());
        let mut strategy = StrategyKind::Cautious.build();
        let mut callback = StopAfter {
            remaining: 3,
            signal,
        };
        let result = run_simulation(&mut sim, strategy.as_mut(), &mut callback);

        assert_eq!(result.end_reason, SimulationEndReason::StopRequested);
        assert_eq!(result.total_ticks, 3);
    }

    #[test]
    fn head_on_pair_is_reported_and_arbitrated() {
        let agents = vec![agent("a", 0, 0, &[(6, 0)]), agent("b", 6, 0, &[(0, 0)])];
        let mut sim =
            Simulation::new(agents, grid(), NullFrameSink, StopSignal::new()).with_max_ticks(1);
        let mut strategy = StrategyKind::Aggressive.build();
        let mut recorder = Recorder::default();
        let result = run_simulation(&mut sim, strategy.as_mut(), &mut recorder);

        assert_eq!(result.total_collisions, 1);
        assert_eq!(recorder.collisions, vec![1]);
        assert_eq!(recorder.resumed, vec![2]);
    }

    #[test]
    fn strategy_runs_on_quiet_ticks() {
        // b starts paused with no collision; aggressive resume frees it.
        let mut b = agent("b", 5, 5, &[(5, 9)]);
        b.paused = true;
        let mut sim =
            Simulation::new(vec![b], grid(), NullFrameSink, StopSignal::new()).with_max_ticks(1);
        let mut strategy = StrategyKind::Aggressive.build();
        let mut recorder = Recorder::default();
        run_simulation(&mut sim, strategy.as_mut(), &mut recorder);

        assert_eq!(recorder.collisions, vec![0]);
        assert_eq!(recorder.resumed, vec![1]);
        assert!(!sim.agents()[0].paused);
    }
}
