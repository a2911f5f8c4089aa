//! Command-line entry point for the gridfleet simulation.
//!
//! Loads configuration, builds the fleet, and runs the tick loop until
//! Ctrl-C (or the configured tick bound). Every frame overwrites the
//! output file, so `watch -n 0.2 cat data/output/screen.txt` in another
//! terminal gives a live view.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load `gridfleet-config.yaml` and apply command-line overrides
//! 3. Initialize structured logging (tracing)
//! 4. Create the grid and build the fleet (scenario files or generator)
//! 5. Open the frame output file
//! 6. Install the Ctrl-C handler on the stop signal
//! 7. Run the simulation loop
//! 8. Log the result

mod error;
mod fleet;
mod progress;

use std::path::{Path, PathBuf};

use clap::Parser;
use gridfleet_agents::StrategyKind;
use gridfleet_core::config::LoggingConfig;
use gridfleet_core::{FleetConfig, LogFormat, Simulation, StopSignal, runner};
use gridfleet_world::{FileFrameSink, OccupancyGrid};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::progress::ProgressCallback;

/// Grid robot fleet simulator.
#[derive(Parser, Debug)]
#[command(name = "gridfleet", version, about = "Simulate a robot fleet on a grid")]
struct Cli {
    /// File overwritten with every rendered frame.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// YAML configuration file; defaults apply if it does not exist.
    #[arg(long, value_name = "PATH", default_value = "gridfleet-config.yaml")]
    config: PathBuf,

    /// Load agents from this directory of JSON files instead of generating them.
    #[arg(long, value_name = "DIR")]
    scenario: Option<PathBuf>,

    /// Collision arbitration strategy.
    #[arg(long, value_name = "aggressive|cautious")]
    strategy: Option<StrategyKind>,

    /// Seed for random fleet generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks (0 runs until Ctrl-C).
    #[arg(long)]
    max_ticks: Option<u64>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(self, config: &mut FleetConfig) {
        if let Some(output) = self.output {
            config.output.path = output;
        }
        if let Some(dir) = self.scenario {
            config.fleet.scenario_dir = Some(dir);
        }
        if let Some(strategy) = self.strategy {
            config.arbitration.strategy = strategy;
        }
        if let Some(seed) = self.seed {
            config.world.seed = seed;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.simulation.max_ticks = max_ticks;
        }
    }
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, fleet construction, or output
/// setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 1. Load configuration, then layer the command line on top.
    let mut config = load_config(&cli.config)?;
    cli.apply(&mut config);
    config.validate().map_err(EngineError::from)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("gridfleet starting");
    info!(
        width = config.world.width,
        height = config.world.height,
        seed = config.world.seed,
        strategy = %config.arbitration.strategy,
        tick_interval_ms = config.world.tick_interval_ms,
        output = %config.output.path.display(),
        "Configuration loaded"
    );

    // 3. Grid and fleet.
    let grid = OccupancyGrid::new(config.world.width, config.world.height)
        .map_err(EngineError::from)?;
    let agents = fleet::build_fleet(&config)?;

    // 4. Frame output.
    let sink = FileFrameSink::new(&config.output.path).map_err(EngineError::from)?;

    // 5. Ctrl-C raises the stop signal; the loop ends at the next tick.
    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.raise()).map_err(EngineError::from)?;

    // 6. Run.
    let mut sim = Simulation::new(agents, grid, sink, stop)
        .with_max_ticks(config.simulation.max_ticks)
        .with_tick_interval(config.world.tick_interval())
        .with_step_interval(config.world.step_interval());
    let mut strategy = config.arbitration.strategy.build();
    let mut progress = ProgressCallback::new();

    let result = runner::run_simulation(&mut sim, strategy.as_mut(), &mut progress);

    // 7. Report.
    runner::log_simulation_end(&result);
    info!(
        frames_written = sim.sink().frames_written(),
        drain_frames = progress.drain_frames(),
        paused = sim.agents().iter().filter(|a| a.paused).count(),
        idle = sim.agents().iter().filter(|a| a.is_idle()).count(),
        "gridfleet finished"
    );

    Ok(())
}

/// Load configuration from `path`, falling back to defaults if the file
/// does not exist.
fn load_config(path: &Path) -> Result<FleetConfig, EngineError> {
    if path.exists() {
        Ok(FleetConfig::from_file(path)?)
    } else {
        // Logging is not up yet; defaults still honour GRIDFLEET_OUTPUT.
        Ok(FleetConfig::parse("")?)
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
