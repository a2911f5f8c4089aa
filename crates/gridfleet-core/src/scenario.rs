//! Loading a fleet from a directory of JSON agent files.
//!
//! Each `*.json` file in the directory describes one robot:
//!
//! ```json
//! {
//!   "device_id": "a",
//!   "timestamp": 1700000000.0,
//!   "x": 0, "y": 0, "theta": 1.57,
//!   "battery_level": 80, "loaded": false,
//!   "color": "red",
//!   "path": [{"x": 4, "y": 0, "theta": 1.57}]
//! }
//! ```
//!
//! `paused` and `color` are optional; unknown fields are ignored. Files
//! are read in file-name order, which fixes fleet order. A file that
//! fails to read, parse, or validate is logged and skipped, and the rest
//! of the directory still loads.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use gridfleet_types::{Agent, AgentId, Color, GridPos, Waypoint};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Largest magnitude at which every integer is exactly representable as
/// an `f64`.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// The directory itself could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Listing the directory failed.
    #[error("failed to read scenario directory {}: {source}", .path.display())]
    ReadDir {
        /// The directory.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// A single agent file that was skipped.
#[derive(Debug, thiserror::Error)]
#[error("{}: {kind}", .path.display())]
pub struct ScenarioFileError {
    /// The offending file.
    pub path: PathBuf,
    /// What was wrong with it.
    #[source]
    pub kind: ScenarioFileErrorKind,
}

/// Why an agent file was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioFileErrorKind {
    /// The file could not be read.
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not a valid agent record.
    #[error("invalid agent JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A numeric field is NaN or infinite.
    #[error("field {field} is not a finite number")]
    NonFinite {
        /// The field name.
        field: &'static str,
    },

    /// A coordinate is too large to place on a grid.
    #[error("field {field} is out of range: {value}")]
    OutOfRange {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A waypoint does not sit on a cell, so it could never be reached.
    #[error("waypoint {index} at ({x}, {y}) is not on an integer cell")]
    FractionalWaypoint {
        /// Position in the path, from zero.
        index: usize,
        /// Waypoint column.
        x: f64,
        /// Waypoint row.
        y: f64,
    },

    /// The timestamp is outside the representable range.
    #[error("timestamp {0} is out of range")]
    BadTimestamp(f64),

    /// `device_id` is empty.
    #[error("device_id is empty")]
    EmptyId,

    /// Another file already claimed this `device_id`.
    #[error("duplicate device_id {0}")]
    DuplicateId(AgentId),
}

/// The fleet read from a scenario directory.
#[derive(Debug, Default)]
pub struct ScenarioLoad {
    /// Agents in file-name order.
    pub agents: Vec<Agent>,
    /// Files that were skipped, in file-name order.
    pub skipped: Vec<ScenarioFileError>,
}

/// On-disk agent record.
#[derive(Debug, Deserialize)]
struct AgentRecord {
    device_id: String,
    timestamp: f64,
    x: f64,
    y: f64,
    theta: f64,
    battery_level: f64,
    loaded: bool,
    path: Vec<WaypointRecord>,
    #[serde(default)]
    paused: bool,
    #[serde(default)]
    color: Option<String>,
}

/// On-disk waypoint. A missing heading reads as zero.
#[derive(Debug, Deserialize)]
struct WaypointRecord {
    x: f64,
    y: f64,
    #[serde(default)]
    theta: Option<f64>,
}

/// Load every `*.json` agent file in `dir`.
///
/// # Errors
///
/// Returns [`ScenarioError::ReadDir`] only if the directory cannot be
/// listed. Bad individual files end up in [`ScenarioLoad::skipped`].
pub fn load_scenario_dir(dir: &Path) -> Result<ScenarioLoad, ScenarioError> {
    let read_dir_err = |source| ScenarioError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    let mut load = ScenarioLoad::default();
    let mut seen: BTreeSet<AgentId> = BTreeSet::new();

    for path in files {
        match load_agent_file(&path, &seen) {
            Ok(agent) => {
                debug!(agent = %agent.id, file = %path.display(), "agent loaded");
                seen.insert(agent.id.clone());
                load.agents.push(agent);
            }
            Err(kind) => {
                let err = ScenarioFileError { path, kind };
                warn!(error = %err, "skipping agent file");
                load.skipped.push(err);
            }
        }
    }

    info!(
        dir = %dir.display(),
        agents = load.agents.len(),
        skipped = load.skipped.len(),
        "scenario loaded"
    );
    Ok(load)
}

/// Read one file and check its id against those already loaded.
fn load_agent_file(path: &Path, seen: &BTreeSet<AgentId>) -> Result<Agent, ScenarioFileErrorKind> {
    let text = std::fs::read_to_string(path)?;
    let agent = parse_agent(&text)?;
    if seen.contains(&agent.id) {
        return Err(ScenarioFileErrorKind::DuplicateId(agent.id));
    }
    Ok(agent)
}

/// Parse and validate a single agent record.
///
/// The start position is truncated toward zero. Waypoints must already be
/// integral.
///
/// # Errors
///
/// Returns the first problem found with the record.
pub fn parse_agent(text: &str) -> Result<Agent, ScenarioFileErrorKind> {
    let record: AgentRecord = serde_json::from_str(text)?;

    if record.device_id.is_empty() {
        return Err(ScenarioFileErrorKind::EmptyId);
    }
    let heading = finite("theta", record.theta)?;
    let battery_level = finite("battery_level", record.battery_level)?;
    let position = GridPos::new(coordinate("x", record.x)?, coordinate("y", record.y)?);
    let last_moved = timestamp(record.timestamp)?;

    let mut path = Vec::with_capacity(record.path.len());
    for (index, wp) in record.path.iter().enumerate() {
        path.push(waypoint(index, wp)?);
    }

    let mut agent = Agent::new(AgentId::new(record.device_id), position, path);
    agent.heading = heading;
    agent.battery_level = battery_level;
    agent.loaded = record.loaded;
    agent.paused = record.paused;
    agent.color = record.color.map(Color::from);
    agent.last_moved = last_moved;
    Ok(agent)
}

fn finite(field: &'static str, value: f64) -> Result<f64, ScenarioFileErrorKind> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScenarioFileErrorKind::NonFinite { field })
    }
}

/// Truncate a finite coordinate to its cell.
fn coordinate(field: &'static str, value: f64) -> Result<i64, ScenarioFileErrorKind> {
    let value = finite(field, value)?.trunc();
    if value.abs() > EXACT_INTEGER_LIMIT {
        return Err(ScenarioFileErrorKind::OutOfRange { field, value });
    }
    // In range and integral, so the cast is exact.
    #[allow(clippy::cast_possible_truncation)]
    Ok(value as i64)
}

fn waypoint(index: usize, wp: &WaypointRecord) -> Result<Waypoint, ScenarioFileErrorKind> {
    let x = finite("path.x", wp.x)?;
    let y = finite("path.y", wp.y)?;
    if x.fract() != 0.0 || y.fract() != 0.0 {
        return Err(ScenarioFileErrorKind::FractionalWaypoint { index, x, y });
    }
    let heading = match wp.theta {
        Some(theta) => finite("path.theta", theta)?,
        None => {
            debug!(index, "waypoint has no theta, using 0");
            0.0
        }
    };
    Ok(Waypoint::new(
        coordinate("path.x", x)?,
        coordinate("path.y", y)?,
        heading,
    ))
}

/// Epoch seconds to a UTC instant, at microsecond precision.
fn timestamp(secs: f64) -> Result<DateTime<Utc>, ScenarioFileErrorKind> {
    let secs = finite("timestamp", secs)?;
    let micros = (secs * 1_000_000.0).round();
    if micros.abs() > EXACT_INTEGER_LIMIT {
        return Err(ScenarioFileErrorKind::BadTimestamp(secs));
    }
    #[allow(clippy::cast_possible_truncation)]
    let micros = micros as i64;
    DateTime::from_timestamp_micros(micros).ok_or(ScenarioFileErrorKind::BadTimestamp(secs))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "device_id": "alpha",
        "timestamp": 1700000000.5,
        "x": 3.9, "y": -0.2, "theta": 1.57,
        "battery_level": 42.0, "loaded": true,
        "color": "cyan",
        "firmware": "ignored",
        "path": [{"x": 5, "y": 0, "theta": 0.0}, {"x": 5.0, "y": 5.0, "theta": 3.14}]
    }"#;

    #[test]
    fn parses_valid_record() {
        let agent = parse_agent(VALID).unwrap();
        assert_eq!(agent.id, AgentId::new("alpha"));
        assert_eq!(agent.position, GridPos::new(3, 0));
        assert_eq!(agent.remaining_waypoints(), 2);
        assert_eq!(agent.path_head().map(Waypoint::pos), Some(GridPos::new(5, 0)));
        assert!(agent.loaded);
        assert!(!agent.paused);
        assert_eq!(agent.color, Some(Color::Cyan));
        assert_eq!(agent.last_moved.timestamp(), 1_700_000_000);
    }

    #[test]
    fn unknown_color_is_kept() {
        let text = VALID.replace("\"cyan\"", "\"chartreuse\"");
        let agent = parse_agent(&text).unwrap();
        assert_eq!(agent.color, Some(Color::Unrecognized(String::from("chartreuse"))));
    }

    #[test]
    fn null_color_and_paused_flag() {
        let text = VALID
            .replace("\"cyan\"", "null")
            .replace("\"loaded\": true", "\"loaded\": true, \"paused\": true");
        let agent = parse_agent(&text).unwrap();
        assert_eq!(agent.color, None);
        assert!(agent.paused);
    }

    #[test]
    fn missing_required_field_rejected() {
        let text = VALID.replace("\"loaded\": true,", "");
        assert!(matches!(parse_agent(&text), Err(ScenarioFileErrorKind::Json(_))));
    }

    #[test]
    fn fractional_waypoint_rejected() {
        let text = VALID.replace("{\"x\": 5, \"y\": 0", "{\"x\": 5.5, \"y\": 0");
        assert!(matches!(
            parse_agent(&text),
            Err(ScenarioFileErrorKind::FractionalWaypoint { index: 0, .. })
        ));
    }

    #[test]
    fn waypoint_without_theta_defaults_to_zero() {
        let text = VALID.replace("{\"x\": 5, \"y\": 0, \"theta\": 0.0}", "{\"x\": 5, \"y\": 0}");
        let agent = parse_agent(&text).unwrap();
        let head = agent.path_head().unwrap();
        assert_eq!(head.pos(), GridPos::new(5, 0));
        assert!(head.heading.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_id_rejected() {
        let text = VALID.replace("\"alpha\"", "\"\"");
        assert!(matches!(parse_agent(&text), Err(ScenarioFileErrorKind::EmptyId)));
    }

    #[test]
    fn huge_coordinate_rejected() {
        let text = VALID.replace("\"x\": 3.9", "\"x\": 1e300");
        assert!(matches!(
            parse_agent(&text),
            Err(ScenarioFileErrorKind::OutOfRange { field: "x", .. })
        ));
    }

    #[test]
    fn missing_directory_fails_whole_load() {
        let result = load_scenario_dir(Path::new("/nonexistent/gridfleet/scenario"));
        assert!(matches!(result, Err(ScenarioError::ReadDir { .. })));
    }
}
