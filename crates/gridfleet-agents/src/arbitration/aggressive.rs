//! Aggressive resume: let every paused agent go as soon as its next cell
//! is free.

use gridfleet_types::Agent;
use tracing::{debug, info};

use super::{ArbitrationContext, ArbitrationOutcome, ArbitrationStrategy, pause_colliding};
use crate::collision::CollisionPair;
use crate::motion::next_position;

/// Whether `agent` may take its next step without landing on an active
/// agent.
///
/// An agent is active when it is neither paused nor idle. The candidate
/// itself is never counted, matched by identity. Idle candidates have no
/// next step and are never resumable.
pub fn can_resume(agent: &Agent, fleet: &[Agent]) -> bool {
    let Some(next) = next_position(agent) else {
        return false;
    };
    !fleet.iter().any(|other| {
        !other.same_identity(agent) && !other.paused && !other.is_idle() && other.position == next
    })
}

/// Resumes paused agents in a single sweep over the fleet.
///
/// Positions do not change during the sweep, so an agent resumed early
/// in the sweep blocks later candidates only through its cleared flag.
/// Agents outside the grid are candidates like any other: one whose path
/// leads back in walks back in, one heading further out is paused again
/// by the next rebuild.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggressiveResume;

impl AggressiveResume {
    /// Create the strategy.
    pub const fn new() -> Self {
        Self
    }
}

impl ArbitrationStrategy for AggressiveResume {
    fn name(&self) -> &'static str {
        "aggressive"
    }

    fn arbitrate(
        &mut self,
        ctx: &mut ArbitrationContext<'_>,
        collisions: &[CollisionPair],
    ) -> ArbitrationOutcome {
        pause_colliding(ctx.agents, collisions);

        let mut outcome = ArbitrationOutcome::default();
        for idx in 0..ctx.agents.len() {
            let Some(candidate) = ctx.agents.get(idx) else {
                continue;
            };
            if !candidate.paused || candidate.is_idle() {
                continue;
            }
            if !can_resume(candidate, ctx.agents) {
                debug!(agent = %candidate.id, "next cell occupied, staying paused");
                continue;
            }

            if let Some(agent) = ctx.agents.get_mut(idx) {
                agent.paused = false;
                info!(agent = %agent.id, position = %agent.position, "agent resumed");
                outcome.resumed.push(agent.id.clone());
            }
        }

        outcome
    }
}
