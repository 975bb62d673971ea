//! Errors that end the engine process.

use cyberslug_core::config::ConfigError;
use cyberslug_core::runner::RunnerError;
use cyberslug_core::tick::TickError;
use cyberslug_observer::ServerError;

/// Everything `main` can fail with.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration file could not be read, parsed, or validated.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The initial simulation state could not be built.
    #[error("simulation setup error: {0}")]
    Setup(#[from] TickError),

    /// The run loop stopped on a failing tick.
    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),

    /// The observer address was rejected before serving.
    #[error("observer error: {0}")]
    Observer(#[from] ServerError),
}
