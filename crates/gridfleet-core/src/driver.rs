//! The tick driver: an endless iterator over simulation ticks.
//!
//! Each call to [`Simulation::next`] advances every agent one unit step,
//! rebuilds the grid, presents the frame, and returns a [`TickSummary`].
//! The driver never stops on its own because the fleet went idle: it
//! yields `None` only once the [`StopSignal`] is raised or the optional
//! tick bound is met. Collision detection and arbitration run between
//! ticks, in the runner.

use std::time::Duration;

use gridfleet_agents::{
    ArbitrationContext, CollisionPair, StepOutcome, advance, detect_collisions,
};
use gridfleet_types::{Agent, AgentId};
use gridfleet_world::{FrameSink, GridSnapshot, OccupancyGrid};
use tracing::{debug, info};

use crate::operator::{SimulationEndReason, StopSignal};

/// What happened during one tick.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick that just ran, starting at 1.
    pub tick: u64,
    /// Agents that took a step this tick.
    pub moved: usize,
    /// Agents found outside the grid after moving.
    pub out_of_bounds: Vec<AgentId>,
    /// The grid after this tick's moves.
    pub snapshot: GridSnapshot,
}

/// The fleet, its grid, and where frames go.
#[derive(Debug)]
pub struct Simulation<S> {
    /// The fleet in fleet order.
    agents: Vec<Agent>,
    /// Rebuilt after every move.
    grid: OccupancyGrid,
    /// Receives a frame per tick and per drain step.
    sink: S,
    /// Polled at the start of every tick.
    stop: StopSignal,
    /// Tick bound (0 = unbounded).
    max_ticks: u64,
    /// Ticks completed so far.
    tick: u64,
    /// Real-time pause between ticks, applied by the runner.
    tick_interval: Duration,
    /// Real-time pause between drain steps.
    step_interval: Duration,
    /// Set once `next` has returned `None`.
    end_reason: Option<SimulationEndReason>,
}

impl<S: FrameSink> Simulation<S> {
    /// Create an unbounded simulation with no pacing.
    pub const fn new(agents: Vec<Agent>, grid: OccupancyGrid, sink: S, stop: StopSignal) -> Self {
        Self {
            agents,
            grid,
            sink,
            stop,
            max_ticks: 0,
            tick: 0,
            tick_interval: Duration::ZERO,
            step_interval: Duration::ZERO,
            end_reason: None,
        }
    }

    /// Stop after `max_ticks` ticks (0 = unbounded).
    #[must_use]
    pub const fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Set the real-time pause between ticks.
    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the real-time pause between drain steps.
    #[must_use]
    pub const fn with_step_interval(mut self, interval: Duration) -> Self {
        self.step_interval = interval;
        self
    }

    /// The fleet in fleet order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The grid as of the last rebuild.
    pub const fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// The frame sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Ticks completed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Tick bound (0 = unbounded).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Real-time pause between ticks.
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// A handle on the stop signal.
    pub const fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Why iteration ended, once it has.
    pub const fn end_reason(&self) -> Option<SimulationEndReason> {
        self.end_reason
    }

    /// Run collision detection over the fleet, pausing colliding agents.
    pub fn detect_collisions(&mut self) -> Vec<CollisionPair> {
        detect_collisions(&mut self.agents)
    }

    /// Borrow the fleet, grid, and sink for an arbitration pass.
    pub fn arbitration_context(&mut self) -> ArbitrationContext<'_> {
        ArbitrationContext {
            agents: &mut self.agents,
            grid: &mut self.grid,
            sink: &mut self.sink,
            step_delay: self.step_interval,
        }
    }

    /// Consume the simulation, returning the fleet and the sink.
    pub fn into_parts(self) -> (Vec<Agent>, S) {
        (self.agents, self.sink)
    }

    fn finish(&mut self, reason: SimulationEndReason) {
        if self.end_reason.is_none() {
            info!(tick = self.tick, reason = ?reason, "simulation stopping");
        }
        self.end_reason = Some(reason);
    }
}

impl<S: FrameSink> Iterator for Simulation<S> {
    type Item = TickSummary;

    fn next(&mut self) -> Option<TickSummary> {
        if self.stop.is_raised() {
            self.finish(SimulationEndReason::StopRequested);
            return None;
        }
        if self.max_ticks > 0 && self.tick >= self.max_ticks {
            self.finish(SimulationEndReason::MaxTicksReached);
            return None;
        }

        let mut moved: usize = 0;
        for agent in &mut self.agents {
            if matches!(advance(agent), StepOutcome::Stepped { .. }) {
                moved = moved.saturating_add(1);
            }
        }

        let report = self.grid.rebuild(&mut self.agents);
        let snapshot = self.grid.snapshot();
        self.sink.present(&snapshot);
        self.tick = self.tick.saturating_add(1);

        debug!(
            tick = self.tick,
            moved,
            placed = report.placed,
            out_of_bounds = report.out_of_bounds.len(),
            "tick complete"
        );

        Some(TickSummary {
            tick: self.tick,
            moved,
            out_of_bounds: report.out_of_bounds,
            snapshot,
        })
    }
}
