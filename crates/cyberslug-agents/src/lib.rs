//! The Cyberslug agent and its sensorimotor-affective control loop.
//!
//! This crate contains everything that turns sensed odor into a heading
//! change. It sits between `cyberslug-world` (the field and prey it reads and
//! disturbs) and `cyberslug-core` (which sequences a tick).
//!
//! # Modules
//!
//! - [`affect`] -- [`AffectiveController`]: pain, satiation, incentive,
//!   somatic map, appetitive switch, turn angle
//! - [`agent`] -- The [`Cyberslug`] agent: body, path, and components
//! - [`config`] -- Tunables for every component ([`AgentConfig`])
//! - [`encounter`] -- Body/prey overlap and respawn ([`EncounterResolver`])
//! - [`error`] -- Error types ([`AgentError`])
//! - [`learning`] -- Rescorla-Wagner values ([`AssociativeLearning`])
//! - [`sensors`] -- Bilateral sampling and log compression ([`SensorModel`])

pub mod affect;
pub mod agent;
pub mod config;
pub mod encounter;
pub mod error;
pub mod learning;
pub mod sensors;

pub use affect::{AffectOutcome, AffectiveController};
pub use agent::Cyberslug;
pub use config::{
    AffectConfig, AgentConfig, FootprintConfig, LearningConfig, LearningParams, SensorConfig,
};
pub use encounter::{EncounterReport, EncounterResolver};
pub use error::AgentError;
pub use learning::{AssociativeLearning, rescorla_wagner};
pub use sensors::SensorModel;
