//! The bounded field the gridfleet robots move on.
//!
//! The grid is rebuilt from scratch every tick from the current fleet. It
//! owns the out-of-bounds rule (agents that leave the field are paused and
//! left off the grid) and hands immutable snapshots to renderers.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid construction and output.
//! - [`grid`] -- [`OccupancyGrid`] and its [`GridSnapshot`].
//! - [`render`] -- Bordered ANSI text rendering of a snapshot.
//! - [`sink`] -- [`FrameSink`] destinations for rendered frames.

pub mod error;
pub mod grid;
pub mod render;
pub mod sink;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use grid::{CellMarker, GridSnapshot, OccupancyGrid, RebuildReport, RosterEntry};
pub use render::render_text;
pub use sink::{FileFrameSink, FrameSink, MemoryFrameSink, NullFrameSink};
