//! Building the starting fleet from configuration.
//!
//! With `fleet.scenario_dir` set, agents come from the directory's JSON
//! files; otherwise the seeded generator produces `fleet.random_count`
//! of them. Agents that start outside the grid are kept: the first
//! rebuild pauses them like any agent that walks off the field.

use gridfleet_core::{FleetConfig, generate_fleet, load_scenario_dir};
use gridfleet_types::Agent;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::error::EngineError;

/// Build the fleet described by `config`.
///
/// # Errors
///
/// Returns [`EngineError::Scenario`] if the scenario directory cannot be
/// read, or [`EngineError::Generator`] if the random fleet does not fit
/// the grid.
pub fn build_fleet(config: &FleetConfig) -> Result<Vec<Agent>, EngineError> {
    if let Some(dir) = &config.fleet.scenario_dir {
        let load = load_scenario_dir(dir)?;
        if load.agents.is_empty() {
            warn!(dir = %dir.display(), "scenario directory has no usable agents");
        }
        for skipped in &load.skipped {
            warn!(file = %skipped.path.display(), "agent file skipped");
        }
        return Ok(load.agents);
    }

    let mut rng = StdRng::seed_from_u64(config.world.seed);
    let agents = generate_fleet(
        &config.fleet,
        config.world.width,
        config.world.height,
        &mut rng,
    )?;
    info!(
        seed = config.world.seed,
        agents = agents.len(),
        "Seed fleet generated"
    );
    Ok(agents)
}
