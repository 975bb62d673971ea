//! Configuration, tick cycle, and orchestration for the Cyberslug simulation.
//!
//! This crate sequences one tick of the world and the agent, and wraps it in
//! a run loop that honours operator controls.
//!
//! # Modules
//!
//! - [`clock`] -- Checked tick counter.
//! - [`config`] -- Configuration loading from `cyberslug-config.yaml` into
//!   strongly-typed structs.
//! - [`operator`] -- Shared pause/stop/speed state and the command queue.
//! - [`runner`] -- The async run loop and its [`TickCallback`] hook.
//! - [`tick`] -- [`SimulationState`] and the fixed-order tick cycle.
//!
//! [`TickCallback`]: runner::TickCallback
//! [`SimulationState`]: tick::SimulationState

pub mod clock;
pub mod config;
pub mod operator;
pub mod runner;
pub mod tick;
