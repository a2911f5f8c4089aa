//! Occupancy grid rebuilt from the fleet every tick.
//!
//! Cells are stored row-major in a flat vector. A cell holds at most one
//! [`CellMarker`]; when two agents share a cell the later one in fleet
//! order wins. Sharing a cell is not a collision and pauses nobody: that
//! judgement belongs to the collision detector.
//!
//! Agents outside `[0, width) x [0, height)` are forced into
//! `paused = true` and left off the grid. They are still listed in the
//! roster so the rendered frame shows where they went.

use gridfleet_types::{Agent, AgentId, Color, GridPos};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::WorldError;

/// What a single occupied cell shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellMarker {
    /// Single-character label derived from the agent id.
    pub label: char,
    /// Marker color, if the agent has one.
    pub color: Option<Color>,
}

/// One agent's entry in the per-frame position listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    /// The agent.
    pub id: AgentId,
    /// Where it was at rebuild time.
    pub position: GridPos,
}

/// Outcome of a single [`OccupancyGrid::rebuild`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Number of agents written to a cell.
    pub placed: usize,
    /// Agents found outside the grid (all of them are now paused).
    pub out_of_bounds: Vec<AgentId>,
}

/// The bounded field, with one optional marker per cell.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    /// Number of columns.
    width: u32,
    /// Number of rows.
    height: u32,
    /// Row-major cells, `width * height` long.
    cells: Vec<Option<CellMarker>>,
    /// Every agent's id and position, in fleet order, as of the last rebuild.
    roster: Vec<RosterEntry>,
}

impl OccupancyGrid {
    /// Create an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either dimension is
    /// zero, or [`WorldError::GridTooLarge`] if the cell count overflows.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        let too_large = || WorldError::GridTooLarge { width, height };
        let w = usize::try_from(width).map_err(|_err| too_large())?;
        let h = usize::try_from(height).map_err(|_err| too_large())?;
        let len = w.checked_mul(h).ok_or_else(too_large)?;

        Ok(Self {
            width,
            height,
            cells: vec![None; len],
            roster: Vec::new(),
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether `pos` lies inside the grid.
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < i64::from(self.width)
            && pos.y < i64::from(self.height)
    }

    /// The marker at `pos`, if the cell is inside the grid and occupied.
    pub fn cell(&self, pos: GridPos) -> Option<&CellMarker> {
        self.index_of(pos)
            .and_then(|idx| self.cells.get(idx))
            .and_then(Option::as_ref)
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the grid and place every agent, in fleet order.
    ///
    /// Agents outside the bounds get `paused = true` and are skipped. A
    /// later agent on an already-occupied cell overwrites the earlier
    /// marker. Runs in O(agents) after the O(cells) clear.
    pub fn rebuild(&mut self, agents: &mut [Agent]) -> RebuildReport {
        self.cells.fill(None);
        self.roster.clear();

        let mut report = RebuildReport::default();

        for agent in agents.iter_mut() {
            self.roster.push(RosterEntry {
                id: agent.id.clone(),
                position: agent.position,
            });

            let Some(idx) = self.index_of(agent.position) else {
                if agent.paused {
                    debug!(
                        agent = %agent.id,
                        position = %agent.position,
                        "agent still out of bounds"
                    );
                } else {
                    warn!(
                        agent = %agent.id,
                        position = %agent.position,
                        width = self.width,
                        height = self.height,
                        "agent out of bounds, pausing"
                    );
                }
                agent.paused = true;
                report.out_of_bounds.push(agent.id.clone());
                continue;
            };

            if let Some(cell) = self.cells.get_mut(idx) {
                *cell = Some(CellMarker {
                    label: agent.label(),
                    color: agent.color.clone(),
                });
                report.placed = report.placed.saturating_add(1);
            }
        }

        report
    }

    /// Take an immutable copy of the grid for rendering.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.width,
            height: self.height,
            cells: self.cells.clone(),
            roster: self.roster.clone(),
        }
    }

    /// Flat index of `pos`, or `None` when it lies outside the grid.
    fn index_of(&self, pos: GridPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        let w = usize::try_from(self.width).ok()?;
        y.checked_mul(w)?.checked_add(x)
    }
}

/// Immutable copy of the grid at one instant, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Row-major cells.
    pub cells: Vec<Option<CellMarker>>,
    /// Every agent's id and position, in fleet order.
    pub roster: Vec<RosterEntry>,
}

impl GridSnapshot {
    /// Iterate over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<CellMarker>]> {
        let width = usize::try_from(self.width).unwrap_or(usize::MAX).max(1);
        self.cells.chunks(width)
    }

    /// The marker at `pos`, if any.
    pub fn cell(&self, pos: GridPos) -> Option<&CellMarker> {
        let w = i64::from(self.width);
        let h = i64::from(self.height);
        if pos.x < 0 || pos.y < 0 || pos.x >= w || pos.y >= h {
            return None;
        }
        let idx = pos.y.checked_mul(w)?.checked_add(pos.x)?;
        let idx = usize::try_from(idx).ok()?;
        self.cells.get(idx).and_then(Option::as_ref)
    }

    /// The roster position of an agent, if it was present at rebuild time.
    pub fn position_of(&self, id: &AgentId) -> Option<GridPos> {
        self.roster
            .iter()
            .find(|entry| entry.id == *id)
            .map(|entry| entry.position)
    }
}
