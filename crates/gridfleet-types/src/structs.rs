//! Core entity structs for the gridfleet simulation.
//!
//! Positions and waypoints live on an integer lattice. Agents are plain
//! records: the motion transition, collision detection, and arbitration
//! that mutate them live in `gridfleet-agents`.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Color;
use crate::ids::AgentId;

// ---------------------------------------------------------------------------
// Grid coordinates
// ---------------------------------------------------------------------------

/// An integer cell coordinate on the simulation grid.
///
/// Coordinates are signed so that agents which leave the field (negative
/// or past the far edge) are still representable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct GridPos {
    /// Column, growing to the right.
    pub x: i64,
    /// Row, growing downward in the rendered view.
    pub y: i64,
}

impl GridPos {
    /// Create a position from its coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for GridPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One entry of an agent's pre-assigned path.
///
/// The heading is carried through from the scenario but plays no part in
/// motion: agents take axis-aligned or diagonal unit steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Target column.
    pub x: i64,
    /// Target row.
    pub y: i64,
    /// Heading at the waypoint, in radians.
    #[serde(rename = "theta")]
    pub heading: f64,
}

impl Waypoint {
    /// Create a waypoint with the given coordinates and heading.
    pub const fn new(x: i64, y: i64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Return the waypoint's cell.
    pub const fn pos(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// A single simulated robot.
///
/// Agents are created once at simulation start and mutated in place every
/// tick; they are never removed during a run. `Agent` deliberately does
/// not implement [`PartialEq`]: two records describe the same robot iff
/// their identifiers match, which [`Agent::same_identity`] checks.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Stable identifier.
    pub id: AgentId,
    /// Current cell.
    pub position: GridPos,
    /// Current heading, in radians. Informational only.
    pub heading: f64,
    /// Remaining waypoints; the front is the current target.
    pub path: VecDeque<Waypoint>,
    /// Battery charge. Informational only.
    pub battery_level: f64,
    /// Whether the robot is carrying cargo.
    pub loaded: bool,
    /// Whether motion is currently suspended.
    pub paused: bool,
    /// Marker color on the rendered grid.
    pub color: Option<Color>,
    /// When the agent last took a step (or was created).
    pub last_moved: DateTime<Utc>,
}

impl Agent {
    /// Create an unpaused, unloaded agent with a full battery.
    pub fn new(id: AgentId, position: GridPos, path: impl IntoIterator<Item = Waypoint>) -> Self {
        Self {
            id,
            position,
            heading: 0.0,
            path: path.into_iter().collect(),
            battery_level: 100.0,
            loaded: false,
            paused: false,
            color: None,
            last_moved: Utc::now(),
        }
    }

    /// Set the marker color, consuming and returning the agent.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// An agent with no remaining waypoints is idle.
    pub fn is_idle(&self) -> bool {
        self.path.is_empty()
    }

    /// The waypoint the agent is currently heading for.
    pub fn path_head(&self) -> Option<&Waypoint> {
        self.path.front()
    }

    /// Number of waypoints left on the path.
    pub fn remaining_waypoints(&self) -> usize {
        self.path.len()
    }

    /// Whether `other` is the same robot (identifier comparison only).
    pub fn same_identity(&self, other: &Self) -> bool {
        self.id == other.id
    }

    /// The single-character marker shown on the grid.
    pub fn label(&self) -> char {
        self.id.label()
    }
}
