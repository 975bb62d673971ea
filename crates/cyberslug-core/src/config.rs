//! Configuration loading and typed config structures for the Cyberslug simulation.
//!
//! The canonical configuration lives in `cyberslug-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads the file and a
//! [`SimulationConfig::validate`] pass that reports bad values once at
//! startup.
//!
//! The `arena`, `field`, `prey`, `population`, and `agent` sections reuse the
//! component configs from `cyberslug-world` and `cyberslug-agents` directly.

use std::path::Path;

use cyberslug_agents::{AgentConfig, AgentError};
use cyberslug_world::{ArenaConfig, FieldConfig, PopulationConfig, PreyConfig, WorldError};
use serde::Deserialize;

/// Environment variable overriding `infrastructure.observer_port`.
pub const OBSERVER_PORT_ENV: &str = "CYBERSLUG_OBSERVER_PORT";

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {source}")]
    Io {
        /// Source I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The config text is not valid YAML for these sections.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// Source parse error.
        source: serde_yml::Error,
    },

    /// A simulation-level value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of which value is wrong.
        reason: String,
    },

    /// An arena, field, prey, or population value is out of range.
    #[error("invalid world configuration: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// An agent value is out of range.
    #[error("invalid agent configuration: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Every tunable of a Cyberslug run, one section per component.
///
/// Mirrors the structure of `cyberslug-config.yaml`. All fields have
/// built-in defaults, so an empty document is valid.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Session-level settings (name, seed, timing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Arena dimensions.
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Odor field resolution and dynamics.
    #[serde(default)]
    pub field: FieldConfig,

    /// Prey motion and odor signatures.
    #[serde(default)]
    pub prey: PreyConfig,

    /// Prey counts per kind.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Agent body, sensors, learning, and affect constants.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Run boundaries and publication cadence.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Log level used when `RUST_LOG` is unset.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Observer server binding.
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,
}

impl SimulationConfig {
    /// Read and parse the YAML file at `path`.
    ///
    /// `CYBERSLUG_OBSERVER_PORT` overrides `infrastructure.observer_port`
    /// when set to a valid port number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse YAML text; missing sections take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.infrastructure.apply_env_overrides();
        Ok(config)
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, typed by the section it came from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "world.tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if self.simulation.snapshot_interval_ticks == 0 {
            return Err(ConfigError::Invalid {
                reason: "simulation.snapshot_interval_ticks must be at least 1".to_owned(),
            });
        }
        self.arena.validate()?;
        self.field.validate()?;
        self.prey.validate()?;
        self.population.validate()?;
        self.agent.validate()?;
        Ok(())
    }
}

/// Session-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable session name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility; reset reseeds with it.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Run boundaries and publication cadence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks before the run ends (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Publish a full snapshot to the observer every N ticks.
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,

    /// Whether the raw-sensor diagnostic starts enabled.
    #[serde(default)]
    pub show_sensors: bool,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            snapshot_interval_ticks: default_snapshot_interval_ticks(),
            show_sensors: false,
        }
    }
}

/// Default log filter for the engine binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Observer server binding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfrastructureConfig {
    /// Address the observer binds to.
    #[serde(default = "default_observer_host")]
    pub observer_host: String,

    /// Port for the observer HTTP and WebSocket API.
    #[serde(default = "default_observer_port")]
    pub observer_port: u16,
}

impl InfrastructureConfig {
    /// Override the observer port with `CYBERSLUG_OBSERVER_PORT` when it
    /// holds a valid port number.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(OBSERVER_PORT_ENV)
            && let Ok(port) = val.trim().parse::<u16>()
        {
            self.observer_port = port;
        }
    }
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            observer_host: default_observer_host(),
            observer_port: default_observer_port(),
        }
    }
}

fn default_world_name() -> String {
    "Cyberslug".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    16
}

const fn default_max_ticks() -> u64 {
    1_000_000
}

const fn default_snapshot_interval_ticks() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}
