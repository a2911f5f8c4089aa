//! Motion and collision arbitration for the gridfleet simulation.
//!
//! This crate contains the logic layer for agents -- everything that
//! operates on agent state without touching I/O other than the frame sink
//! handed in by the caller. It sits between `gridfleet-types` (the data)
//! and `gridfleet-core` (the tick driver and runner).
//!
//! # Modules
//!
//! - [`motion`] -- The single-step motion transition ([`advance`]).
//! - [`collision`] -- Segment intersection and fleet-wide detection.
//! - [`arbitration`] -- The [`ArbitrationStrategy`] trait and its two
//!   policies, [`AggressiveResume`] and [`CautiousSerialization`].
//!
//! [`advance`]: motion::advance
//! [`ArbitrationStrategy`]: arbitration::ArbitrationStrategy
//! [`AggressiveResume`]: arbitration::AggressiveResume
//! [`CautiousSerialization`]: arbitration::CautiousSerialization

pub mod arbitration;
pub mod collision;
pub mod motion;

// Re-export primary types at crate root for convenience.
pub use arbitration::{
    AggressiveResume, ArbitrationContext, ArbitrationOutcome, ArbitrationStrategy,
    CautiousSerialization, StrategyKind, UnknownStrategy,
};
pub use collision::{CollisionPair, Segment, detect_collisions, segments_intersect};
pub use motion::{StepOutcome, advance, next_position};
