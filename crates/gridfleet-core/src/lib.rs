//! Orchestration for the gridfleet simulation.
//!
//! This crate turns configuration into a running fleet: it loads the
//! YAML config, builds the fleet from a scenario directory or the random
//! generator, and drives the tick loop with collision detection and
//! arbitration between ticks.
//!
//! # Modules
//!
//! - [`config`] -- `gridfleet-config.yaml` loading and typed sections.
//! - [`scenario`] -- Loading agents from a directory of JSON files.
//! - [`generator`] -- Seeded random fleet generation.
//! - [`driver`] -- The [`Simulation`] tick iterator.
//! - [`operator`] -- The [`StopSignal`] and end reasons.
//! - [`runner`] -- [`run_simulation`], the loop around the driver.
//!
//! [`Simulation`]: driver::Simulation
//! [`StopSignal`]: operator::StopSignal
//! [`run_simulation`]: runner::run_simulation

pub mod config;
pub mod driver;
pub mod generator;
pub mod operator;
pub mod runner;
pub mod scenario;

pub use config::{ConfigError, FleetConfig, LogFormat};
pub use driver::{Simulation, TickSummary};
pub use generator::{GeneratorError, generate_fleet};
pub use operator::{SimulationEndReason, StopSignal};
pub use runner::{NoOpCallback, SimulationResult, TickCallback, log_simulation_end, run_simulation};
pub use scenario::{ScenarioError, ScenarioFileError, ScenarioLoad, load_scenario_dir};
