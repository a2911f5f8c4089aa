//! Tick callback that reports run progress through the log.
//!
//! Every tick is logged at `debug`. Transitions between a moving fleet
//! and a fleet at rest are logged at `info`, once each, so a long run
//! with nothing left to do does not flood the output.

use gridfleet_agents::{ArbitrationOutcome, CollisionPair};
use gridfleet_core::{TickCallback, TickSummary};
use tracing::{debug, info};

/// Logs per-tick progress and rest/motion transitions.
#[derive(Debug, Default)]
pub struct ProgressCallback {
    /// Whether the previous tick ended with nothing moving.
    at_rest: bool,
    /// Frames presented by arbitration over the run.
    drain_frames: u64,
}

impl ProgressCallback {
    /// Create a callback that has seen no ticks.
    pub const fn new() -> Self {
        Self {
            at_rest: false,
            drain_frames: 0,
        }
    }

    /// Frames presented by arbitration over the run so far.
    pub const fn drain_frames(&self) -> u64 {
        self.drain_frames
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(
        &mut self,
        summary: &TickSummary,
        collisions: &[CollisionPair],
        outcome: &ArbitrationOutcome,
    ) {
        self.drain_frames = self.drain_frames.saturating_add(outcome.frames);

        debug!(
            tick = summary.tick,
            moved = summary.moved,
            collisions = collisions.len(),
            resumed = outcome.resumed.len(),
            drained = outcome.drained.len(),
            "Tick processed"
        );

        let resting = summary.moved == 0 && collisions.is_empty() && outcome.resumed.is_empty();
        if resting && !self.at_rest {
            info!(
                tick = summary.tick,
                out_of_bounds = summary.out_of_bounds.len(),
                "Fleet at rest"
            );
        } else if !resting && self.at_rest {
            info!(tick = summary.tick, "Fleet moving again");
        }
        self.at_rest = resting;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridfleet_world::OccupancyGrid;

    use super::*;

    fn summary(tick: u64, moved: usize) -> TickSummary {
        TickSummary {
            tick,
            moved,
            out_of_bounds: Vec::new(),
            snapshot: OccupancyGrid::new(2, 2).unwrap().snapshot(),
        }
    }

    #[test]
    fn tracks_rest_transitions_and_drain_frames() {
        let mut cb = ProgressCallback::new();
        let drained = ArbitrationOutcome {
            frames: 4,
            ..ArbitrationOutcome::default()
        };

        cb.on_tick(&summary(1, 2), &[], &drained);
        assert!(!cb.at_rest);
        cb.on_tick(&summary(2, 0), &[], &ArbitrationOutcome::default());
        assert!(cb.at_rest);
        cb.on_tick(&summary(3, 1), &[], &ArbitrationOutcome::default());
        assert!(!cb.at_rest);
        assert_eq!(cb.drain_frames(), 4);
    }
}
