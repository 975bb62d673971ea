//! Engine binary for the Cyberslug simulation.
//!
//! This is the main entry point that wires together the tick loop, the
//! operator controls, and the observer API. It loads configuration,
//! initializes all subsystems, and runs the simulation until a
//! termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `cyberslug-config.yaml` (or the path given
//!    as the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Build the simulation state from the seed
//! 4. Create operator state from simulation bounds
//! 5. Start the observer API server
//! 6. Run the simulation loop
//! 7. Log the result

mod error;
mod observer_callback;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cyberslug_core::config::SimulationConfig;
use cyberslug_core::operator::OperatorState;
use cyberslug_core::runner;
use cyberslug_core::tick::SimulationState;
use cyberslug_observer::{AppState, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_callback::ObserverCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "cyberslug-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, loaded_from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging. RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("cyberslug-engine starting");
    if loaded_from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        hermi = config.population.hermi,
        flab = config.population.flab,
        drug = config.population.drug,
        "Configuration resolved"
    );

    // 3. Build simulation state (validates the configuration).
    let mut sim_state = SimulationState::new(&config).map_err(EngineError::from)?;
    info!(
        session_id = %sim_state.session_id,
        prey = sim_state.prey.len(),
        grid_width = sim_state.field.grid_width(),
        grid_height = sim_state.field.grid_height(),
        "Simulation state built"
    );

    // 4. Create operator state.
    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));

    // 5. Start Observer API server.
    let app_state = Arc::new(AppState::with_operator(
        Arc::clone(&operator),
        config.agent.learning.clone(),
    ));
    let server_config = ServerConfig {
        host: config.infrastructure.observer_host.clone(),
        port: config.infrastructure.observer_port,
    };
    let observer_handle = cyberslug_observer::spawn_observer(server_config, Arc::clone(&app_state))
        .map_err(EngineError::from)?;

    // Ctrl-C requests a clean stop before the next tick.
    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, stopping simulation");
                    operator.request_stop();
                }
                Err(e) => warn!(error = %e, "Failed to listen for interrupt"),
            }
        });
    }

    // 6. Run the simulation.
    let mut callback = ObserverCallback::new(
        Arc::clone(&app_state),
        config.simulation.snapshot_interval_ticks,
    );
    // The initial state is visible before the first tick.
    callback.publish_session(&sim_state);

    let result = runner::run_simulation(&mut sim_state, &operator, &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 7. Log results.
    runner::log_simulation_end(&result);
    observer_handle.abort();

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "cyberslug-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// Returns the defaults when the file does not exist, and whether the file
/// was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::parse("")?, false))
    }
}
