//! Shared type definitions for the gridfleet simulation.
//!
//! This crate is the single source of truth for the data that flows
//! between the grid, the agent logic, and the engine. It holds no
//! simulation logic beyond trivial derived accessors.
//!
//! # Modules
//!
//! - [`ids`] -- String identifier wrapper for agents
//! - [`enums`] -- Display colors
//! - [`structs`] -- Grid positions, waypoints, and the [`Agent`] record

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::Color;
pub use ids::AgentId;
pub use structs::{Agent, GridPos, Waypoint};
