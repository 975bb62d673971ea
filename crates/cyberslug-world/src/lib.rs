//! Arena geometry, odor field, and prey for the Cyberslug simulation.
//!
//! This crate models the environment the agent forages in: a toroidal
//! arena, a multi-channel odor grid that diffuses and decays every tick,
//! and a population of prey that random-walk and mark the grid with their
//! scent signature.
//!
//! # Modules
//!
//! - [`arena`] -- Arena dimensions, toroidal wrap with edge-crossing
//!   detection, heading helpers.
//! - [`config`] -- Arena, field, prey, and population parameters.
//! - [`error`] -- Error types for world construction.
//! - [`odor_field`] -- [`OdorField`]: deposit, diffusion + decay, sampling.
//! - [`prey`] -- [`Prey`] and the ordered [`PreyPopulation`].

pub mod arena;
pub mod config;
pub mod error;
pub mod odor_field;
pub mod prey;

// Re-export primary types at crate root.
pub use arena::{Arena, Wrapped, step_along, wrap_degrees};
pub use config::{ArenaConfig, FieldConfig, PopulationConfig, PreyConfig};
pub use error::WorldError;
pub use odor_field::OdorField;
pub use prey::{Prey, PreyPopulation};
