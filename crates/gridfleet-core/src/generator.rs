//! Random fleet generation for runs without a scenario directory.
//!
//! Every generated agent gets a distinct start cell and a distinct id.
//! Ids are single lowercase letters, drawn without replacement; once the
//! alphabet is used up, ids take the form `<letter>-<NNNN>`. The whole
//! fleet is a pure function of the RNG state, so a seeded `StdRng` gives
//! the same fleet on every platform.

use std::collections::BTreeSet;

use gridfleet_types::{Agent, AgentId, Color, GridPos, Waypoint};
use rand::Rng;
use tracing::info;

use crate::config::FleetSourceConfig;

/// Heading assigned to generated agents and their waypoints, in radians.
pub const DEFAULT_HEADING: f64 = 1.57;

/// Lowest generated battery level.
const MIN_BATTERY: u32 = 10;

/// Highest generated battery level.
const MAX_BATTERY: u32 = 100;

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Smallest numeric id suffix.
const SUFFIX_MIN: u32 = 1000;

/// Largest numeric id suffix.
const SUFFIX_MAX: u32 = 9999;

/// Distinct ids the generator can produce: 26 bare letters plus
/// 26 * 9000 suffixed ones.
const ID_CAPACITY: u64 = 234_026;

/// Errors from fleet generation.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// More agents than cells, so starts cannot be distinct.
    #[error("cannot place {requested} agents on a {width}x{height} grid")]
    TooManyAgents {
        /// Agents requested.
        requested: u32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// More agents than distinct ids.
    #[error("cannot name {requested} agents: at most {available} distinct ids")]
    IdsExhausted {
        /// Agents requested.
        requested: u32,
        /// Distinct ids the generator can produce.
        available: u64,
    },

    /// A grid dimension was zero.
    #[error("cannot generate agents on an empty {width}x{height} grid")]
    EmptyGrid {
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
}

/// Generate `config.random_count` agents on a `width` x `height` grid.
///
/// # Errors
///
/// Returns [`GeneratorError`] if the grid is empty or the fleet cannot
/// have distinct starts and ids.
pub fn generate_fleet(
    config: &FleetSourceConfig,
    width: u32,
    height: u32,
    rng: &mut impl Rng,
) -> Result<Vec<Agent>, GeneratorError> {
    let requested = config.random_count;
    if width == 0 || height == 0 {
        return Err(GeneratorError::EmptyGrid { width, height });
    }
    let cells = u64::from(width).saturating_mul(u64::from(height));
    if u64::from(requested) > cells {
        return Err(GeneratorError::TooManyAgents {
            requested,
            width,
            height,
        });
    }
    if u64::from(requested) > ID_CAPACITY {
        return Err(GeneratorError::IdsExhausted {
            requested,
            available: ID_CAPACITY,
        });
    }

    let mut starts: BTreeSet<GridPos> = BTreeSet::new();
    let mut ids: BTreeSet<AgentId> = BTreeSet::new();
    let mut letters: Vec<u8> = ALPHABET.to_vec();
    let mut agents = Vec::with_capacity(usize::try_from(requested).unwrap_or(0));

    while agents.len() < usize::try_from(requested).unwrap_or(usize::MAX) {
        let start = random_cell(width, height, rng);
        if !starts.insert(start) {
            continue;
        }

        let id = next_id(&mut letters, &ids, rng);
        ids.insert(id.clone());

        let path = (0..config.path_length).map(|_| {
            let cell = random_cell(width, height, rng);
            Waypoint::new(cell.x, cell.y, DEFAULT_HEADING)
        });
        let mut agent = Agent::new(id, start, path.collect::<Vec<_>>());
        agent.heading = DEFAULT_HEADING;
        agent.battery_level = f64::from(rng.random_range(MIN_BATTERY..=MAX_BATTERY));
        agent.loaded = rng.random_bool(0.5);
        agent.color = random_color(rng);
        agents.push(agent);
    }

    info!(
        count = agents.len(),
        width,
        height,
        path_length = config.path_length,
        "random fleet generated"
    );
    Ok(agents)
}

fn random_cell(width: u32, height: u32, rng: &mut impl Rng) -> GridPos {
    GridPos::new(
        i64::from(rng.random_range(0..width)),
        i64::from(rng.random_range(0..height)),
    )
}

fn random_color(rng: &mut impl Rng) -> Option<Color> {
    let idx = rng.random_range(0..Color::PALETTE.len());
    Color::PALETTE.get(idx).cloned()
}

/// Draw an unused letter, or a suffixed id once the letters run out.
///
/// The caller guarantees `taken` is smaller than [`ID_CAPACITY`].
fn next_id(letters: &mut Vec<u8>, taken: &BTreeSet<AgentId>, rng: &mut impl Rng) -> AgentId {
    if !letters.is_empty() {
        let idx = rng.random_range(0..letters.len());
        let letter = letters.swap_remove(idx);
        return AgentId::new(char::from(letter).to_string());
    }

    loop {
        let letter = ALPHABET
            .get(rng.random_range(0..ALPHABET.len()))
            .map_or('a', |&b| char::from(b));
        let suffix = rng.random_range(SUFFIX_MIN..=SUFFIX_MAX);
        let id = AgentId::new(format!("{letter}-{suffix:04}"));
        if !taken.contains(&id) {
            return id;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn config(count: u32, path_length: u32) -> FleetSourceConfig {
        FleetSourceConfig {
            scenario_dir: None,
            random_count: count,
            path_length,
        }
    }

    #[test]
    fn default_fleet_shape() {
        let mut rng = StdRng::seed_from_u64(0);
        let agents = generate_fleet(&config(5, 3), 20, 20, &mut rng).unwrap();

        assert_eq!(agents.len(), 5);
        for a in &agents {
            assert_eq!(a.remaining_waypoints(), 3);
            assert!((0..20).contains(&a.position.x));
            assert!((0..20).contains(&a.position.y));
            assert!(a.path.iter().all(|w| (0..20).contains(&w.x) && (0..20).contains(&w.y)));
            assert!((10.0..=100.0).contains(&a.battery_level));
            assert!(a.color.as_ref().is_some_and(Color::is_recognized));
            assert_eq!(a.id.as_str().len(), 1);
            assert!(!a.paused);
        }
    }

    #[test]
    fn starts_and_ids_are_distinct() {
        let mut rng = StdRng::seed_from_u64(11);
        let agents = generate_fleet(&config(40, 1), 8, 8, &mut rng).unwrap();

        let starts: BTreeSet<_> = agents.iter().map(|a| a.position).collect();
        let ids: BTreeSet<_> = agents.iter().map(|a| a.id.clone()).collect();
        assert_eq!(starts.len(), 40);
        assert_eq!(ids.len(), 40);
        assert!(agents.iter().any(|a| a.id.as_str().contains('-')));
    }

    #[test]
    fn same_seed_same_fleet() {
        let a = generate_fleet(&config(6, 4), 20, 20, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = generate_fleet(&config(6, 4), 20, 20, &mut StdRng::seed_from_u64(5)).unwrap();

        let summary = |fleet: &[Agent]| {
            fleet
                .iter()
                .map(|a| {
                    let path: Vec<_> = a.path.iter().map(Waypoint::pos).collect();
                    (a.id.clone(), a.position, path)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&a), summary(&b));
    }

    #[test]
    fn every_cell_can_be_filled() {
        let mut rng = StdRng::seed_from_u64(3);
        let agents = generate_fleet(&config(4, 2), 2, 2, &mut rng).unwrap();
        assert_eq!(agents.len(), 4);
    }

    #[test]
    fn more_agents_than_cells_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = generate_fleet(&config(5, 1), 2, 2, &mut rng).unwrap_err();
        assert!(matches!(err, GeneratorError::TooManyAgents { requested: 5, .. }));
    }

    #[test]
    fn zero_count_is_empty_fleet() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_fleet(&config(0, 3), 20, 20, &mut rng).unwrap().is_empty());
    }
}
