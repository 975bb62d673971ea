//! Shared type definitions for the Cyberslug simulation.
//!
//! This crate is the single source of truth for the types passed between
//! the simulation crates and the presentation layer. Types defined here
//! flow downstream to `TypeScript` via `ts-rs` for the observer dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Session and prey identifiers
//! - [`enums`] -- Odor channels and prey kinds
//! - [`structs`] -- Geometry, per-kind tables, and read-only snapshots

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ODOR_CHANNEL_COUNT, OdorChannel, OdorVector, PreyKind};
pub use ids::{PreyId, SessionId};
pub use structs::{
    AffectSnapshot, AgentSnapshot, EncounterCounts, LearnedValues, PathPoint, Position, PreyView,
    SensorReadout, WorldSnapshot,
};
