//! Arbitration: deciding which paused agents move again, and when.
//!
//! Once per tick, after collision detection, the runner hands the fleet
//! and the freshly detected [`CollisionPair`]s to an
//! [`ArbitrationStrategy`]. Two policies exist:
//!
//! 1. **Aggressive resume** ([`AggressiveResume`]): every paused agent
//!    whose next cell is not occupied by an active agent resumes at once.
//! 2. **Cautious serialization** ([`CautiousSerialization`]): colliding
//!    agents are resumed one at a time, shortest remaining path first, and
//!    each is driven to the end of its path before the next one starts.
//!
//! Both leave idle agents, and moving agents outside the colliding set,
//! untouched.

mod aggressive;
mod cautious;

use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;

use gridfleet_types::{Agent, AgentId};
use gridfleet_world::{FrameSink, OccupancyGrid};
use serde::{Deserialize, Serialize};

use crate::collision::CollisionPair;

pub use aggressive::{AggressiveResume, can_resume};
pub use cautious::CautiousSerialization;

/// Everything a strategy may touch during one arbitration pass.
pub struct ArbitrationContext<'a> {
    /// The whole fleet, in fleet order.
    pub agents: &'a mut [Agent],
    /// The grid, rebuilt by strategies that move agents.
    pub grid: &'a mut OccupancyGrid,
    /// Where frames rendered during arbitration go.
    pub sink: &'a mut dyn FrameSink,
    /// Pause between consecutive drain steps.
    pub step_delay: Duration,
}

impl core::fmt::Debug for ArbitrationContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArbitrationContext")
            .field("agents", &self.agents.len())
            .field("grid", &(self.grid.width(), self.grid.height()))
            .field("step_delay", &self.step_delay)
            .finish_non_exhaustive()
    }
}

/// What an arbitration pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArbitrationOutcome {
    /// Agents whose `paused` flag was cleared and left cleared.
    pub resumed: Vec<AgentId>,
    /// Agents driven to the end of their path, in drain order.
    pub drained: Vec<AgentId>,
    /// Frames presented during the pass.
    pub frames: u64,
}

/// A policy deciding which paused agents resume, and in what order.
pub trait ArbitrationStrategy {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Run one arbitration pass over the fleet.
    ///
    /// `collisions` holds the pairs detected this tick (possibly none).
    /// Their members are already paused.
    fn arbitrate(
        &mut self,
        ctx: &mut ArbitrationContext<'_>,
        collisions: &[CollisionPair],
    ) -> ArbitrationOutcome;
}

/// Selects an arbitration strategy from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// [`AggressiveResume`].
    #[default]
    #[serde(alias = "just_in_time")]
    Aggressive,
    /// [`CautiousSerialization`].
    #[serde(alias = "nice_and_cautious")]
    Cautious,
}

impl StrategyKind {
    /// Build the selected strategy.
    pub fn build(self) -> Box<dyn ArbitrationStrategy> {
        match self {
            Self::Aggressive => Box::new(AggressiveResume::new()),
            Self::Cautious => Box::new(CautiousSerialization::new()),
        }
    }

    /// The name used in configuration files and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Cautious => "cautious",
        }
    }
}

impl core::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy name that matches no known policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown arbitration strategy {0:?} (expected \"aggressive\" or \"cautious\")")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aggressive" | "just_in_time" => Ok(Self::Aggressive),
            "cautious" | "nice_and_cautious" => Ok(Self::Cautious),
            _ => Err(UnknownStrategy(s.to_owned())),
        }
    }
}

/// Pause every agent named in `collisions`.
fn pause_colliding(agents: &mut [Agent], collisions: &[CollisionPair]) {
    let involved = involved_ids(collisions);
    for agent in agents.iter_mut().filter(|a| involved.contains(&a.id)) {
        agent.paused = true;
    }
}

/// The deduplicated set of agents named in `collisions`.
fn involved_ids(collisions: &[CollisionPair]) -> BTreeSet<&AgentId> {
    collisions
        .iter()
        .flat_map(|pair| [&pair.first, &pair.second])
        .collect()
}
