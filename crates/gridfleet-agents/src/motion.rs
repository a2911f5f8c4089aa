//! The per-tick motion transition.
//!
//! Each call to [`advance`] moves an agent at most one cell along each
//! axis toward the head of its path. Steps are computed from the sign of
//! the remaining offset, so an agent moves diagonally until one axis is
//! aligned and then straight along the other. Positions never leave the
//! integer lattice.
//!
//! The head waypoint is consumed only when the agent stands exactly on
//! it. An agent whose head already equals its position consumes the head
//! on the next call without moving.

use chrono::Utc;
use gridfleet_types::{Agent, GridPos};
use tracing::debug;

/// What a call to [`advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The agent has no path left.
    Idle,
    /// The agent is paused and stayed put.
    Paused,
    /// The agent took its step (possibly a zero-length one onto a head it
    /// already occupied).
    Stepped {
        /// Position before the step.
        from: GridPos,
        /// Position after the step.
        to: GridPos,
        /// Whether the head waypoint was consumed.
        reached_waypoint: bool,
    },
}

/// Unit offset along one axis: -1, 0, or +1.
const fn axis_step(from: i64, to: i64) -> i64 {
    if to > from {
        1
    } else if to < from {
        -1
    } else {
        0
    }
}

/// The cell one unit step from `from` toward `target`.
pub const fn unit_step(from: GridPos, target: GridPos) -> GridPos {
    GridPos::new(
        from.x.saturating_add(axis_step(from.x, target.x)),
        from.y.saturating_add(axis_step(from.y, target.y)),
    )
}

/// The cell the agent would occupy after its next step, without moving it.
///
/// Returns `None` for an idle agent. Pause state is ignored: this is the
/// tentative step the arbitration strategies test before resuming.
pub fn next_position(agent: &Agent) -> Option<GridPos> {
    agent
        .path_head()
        .map(|head| unit_step(agent.position, head.pos()))
}

/// Move the agent one unit step toward its path head.
///
/// Idle and paused agents are left untouched. Otherwise the position is
/// updated, the head is popped if it has been reached, and the last-moved
/// timestamp is refreshed.
pub fn advance(agent: &mut Agent) -> StepOutcome {
    let Some(target) = agent.path_head().map(|head| head.pos()) else {
        return StepOutcome::Idle;
    };

    if agent.paused {
        debug!(agent = %agent.id, position = %agent.position, "agent is paused");
        return StepOutcome::Paused;
    }

    let from = agent.position;
    let to = unit_step(from, target);
    agent.position = to;

    let reached_waypoint = to == target;
    if reached_waypoint {
        agent.path.pop_front();
    }
    agent.last_moved = Utc::now();

    debug!(
        agent = %agent.id,
        %from,
        %to,
        reached_waypoint,
        remaining = agent.remaining_waypoints(),
        "agent stepped"
    );

    StepOutcome::Stepped {
        from,
        to,
        reached_waypoint,
    }
}
