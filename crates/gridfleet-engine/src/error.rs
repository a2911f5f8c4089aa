//! Error types for the gridfleet binary.
//!
//! [`EngineError`] wraps every failure mode during startup so that `main`
//! can propagate with `?`. Once the loop is running nothing fails: bad
//! frames are logged and collisions are ordinary events.

/// Top-level error for the gridfleet binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gridfleet_core::ConfigError,
    },

    /// Grid construction or frame output setup failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: gridfleet_world::WorldError,
    },

    /// The scenario directory could not be read.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: gridfleet_core::ScenarioError,
    },

    /// Random fleet generation failed.
    #[error("generator error: {source}")]
    Generator {
        /// The underlying generator error.
        #[from]
        source: gridfleet_core::GeneratorError,
    },

    /// The Ctrl-C handler could not be installed.
    #[error("signal handler error: {source}")]
    Signal {
        /// The underlying ctrlc error.
        #[from]
        source: ctrlc::Error,
    },
}
