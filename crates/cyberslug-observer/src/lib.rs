//! Observer API server for the Cyberslug simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/ticks`) streaming a [`TickBroadcast`]
//!   per tick via [`tokio::sync::broadcast`]
//! - **REST endpoints** for the latest world, agent, prey, and sensor
//!   snapshots
//! - **Operator REST endpoints** for pause, resume, speed, stop, reset,
//!   population, learning rate, and the sensor diagnostic
//! - **Minimal HTML page** (`GET /`) with the current tick and API links
//!
//! # Architecture
//!
//! The observer reads from an in-memory [`SimulationSnapshot`] that the
//! engine's tick callback writes. Operator commands are validated here
//! and queued on the shared [`OperatorState`]; the runner applies them
//! between ticks, so the observer never touches simulation state.
//!
//! [`OperatorState`]: cyberslug_core::operator::OperatorState

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{ServerConfig, ServerError, spawn_observer, start_server};
pub use state::{AppState, SimulationSnapshot, TickBroadcast};
