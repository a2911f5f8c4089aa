//! Configuration loading and typed config structures for the gridfleet
//! simulation.
//!
//! The configuration lives in `gridfleet-config.yaml` next to the binary's
//! working directory. Every section is optional and falls back to the
//! defaults below, so an empty file (or no file at all) gives a 20x20
//! grid with five random robots under the aggressive strategy.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gridfleet_agents::StrategyKind;
use serde::Deserialize;

/// Environment variable overriding `output.path`.
pub const OUTPUT_ENV_VAR: &str = "GRIDFLEET_OUTPUT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but makes no sense.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level fleet simulation configuration.
///
/// Mirrors the structure of `gridfleet-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FleetConfig {
    /// Grid size, seed, and pacing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Where the agents come from.
    #[serde(default)]
    pub fleet: FleetSourceConfig,

    /// Collision resolution policy.
    #[serde(default)]
    pub arbitration: ArbitrationConfig,

    /// Frame output.
    #[serde(default)]
    pub output: OutputConfig,

    /// Run bounds.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FleetConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `GRIDFLEET_OUTPUT` overrides `output.path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse_with_output_override(yaml, std::env::var_os(OUTPUT_ENV_VAR))
    }

    /// [`FleetConfig::parse`] with the output override passed in rather
    /// than read from the environment.
    fn parse_with_output_override(
        yaml: &str,
        output_override: Option<OsString>,
    ) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.output.apply_override(output_override);
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.width == 0 {
            return Err(ConfigError::Invalid {
                field: "world.width",
                reason: String::from("must be at least 1"),
            });
        }
        if self.world.height == 0 {
            return Err(ConfigError::Invalid {
                field: "world.height",
                reason: String::from("must be at least 1"),
            });
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output.path",
                reason: String::from("must not be empty"),
            });
        }
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Number of grid columns.
    #[serde(default = "default_grid_size")]
    pub width: u32,

    /// Number of grid rows.
    #[serde(default = "default_grid_size")]
    pub height: u32,

    /// Random seed for fleet generation.
    #[serde(default)]
    pub seed: u64,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_interval_ms")]
    pub tick_interval_ms: u64,

    /// Real-time milliseconds between drain steps of the cautious strategy.
    #[serde(default = "default_interval_ms")]
    pub step_interval_ms: u64,
}

impl WorldConfig {
    /// Pause between ticks.
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Pause between drain steps.
    pub const fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_grid_size(),
            height: default_grid_size(),
            seed: 0,
            tick_interval_ms: default_interval_ms(),
            step_interval_ms: default_interval_ms(),
        }
    }
}

/// Fleet source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FleetSourceConfig {
    /// Directory of `*.json` agent files. When unset, a random fleet is
    /// generated.
    #[serde(default)]
    pub scenario_dir: Option<PathBuf>,

    /// Number of agents to generate.
    #[serde(default = "default_random_count")]
    pub random_count: u32,

    /// Waypoints per generated agent.
    #[serde(default = "default_path_length")]
    pub path_length: u32,
}

impl Default for FleetSourceConfig {
    fn default() -> Self {
        Self {
            scenario_dir: None,
            random_count: default_random_count(),
            path_length: default_path_length(),
        }
    }
}

/// Arbitration configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ArbitrationConfig {
    /// Which strategy resolves collisions.
    #[serde(default)]
    pub strategy: StrategyKind,
}

/// Frame output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// File overwritten with every rendered frame.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl OutputConfig {
    /// Replace the path with `value` (the `GRIDFLEET_OUTPUT` value) unless
    /// it is missing or empty.
    fn apply_override(&mut self, value: Option<OsString>) {
        if let Some(val) = value.filter(|v| !v.is_empty()) {
            self.path = PathBuf::from(val);
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

/// Run bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks (0 = run until stopped).
    #[serde(default)]
    pub max_ticks: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// How log lines are formatted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_grid_size() -> u32 {
    20
}

const fn default_interval_ms() -> u64 {
    200
}

const fn default_random_count() -> u32 {
    5
}

const fn default_path_length() -> u32 {
    3
}

fn default_output_path() -> PathBuf {
    PathBuf::from("./data/output/screen.txt")
}

fn default_log_level() -> String {
    String::from("info")
}
