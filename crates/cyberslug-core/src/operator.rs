//! Runtime controls shared by the run loop and the operator API.
//!
//! [`OperatorState`] carries three kinds of input:
//!
//! - the run phase ([`RunPhase`]), published through a `watch` channel so a
//!   paused loop parks until the phase changes;
//! - the tick interval, an atomic read once per tick;
//! - a FIFO of [`OperatorCommand`]s that mutate the simulation. The runner
//!   drains it between ticks, never during one, and also while paused.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use cyberslug_types::PreyKind;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify, watch};

use crate::config::SimulationBoundsConfig;

/// Why a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEndReason {
    /// The clock reached `simulation.max_ticks`.
    MaxTicksReached,
    /// Stopped through the API or by an interrupt.
    OperatorStop,
}

/// Lifecycle of the run loop as seen by the operator.
///
/// `Stopping` is terminal: once requested, pause and resume no longer
/// change the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Ticks are being produced.
    Running,
    /// The loop is parked before its next tick.
    Paused,
    /// The loop ends before its next tick.
    Stopping,
}

/// A state change requested by the operator, applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum OperatorCommand {
    /// Rebuild the prey population with a new count for one kind.
    SetPopulation {
        /// The prey kind to resize.
        kind: PreyKind,
        /// The new count for that kind.
        count: u32,
    },
    /// Replace the learning rate for one kind.
    SetLearningRate {
        /// The prey kind whose rate changes.
        kind: PreyKind,
        /// The new `alpha`.
        alpha: f64,
    },
    /// Toggle the raw-sensor diagnostic.
    SetSensorDisplay {
        /// Whether sensor readouts are published and logged.
        enabled: bool,
    },
    /// Reinitialize the session from the seed.
    Reset,
}

/// Control state shared behind an [`Arc`](std::sync::Arc).
#[derive(Debug)]
pub struct OperatorState {
    phase: watch::Sender<RunPhase>,
    tick_interval_ms: AtomicU64,
    /// Zero disables the limit.
    max_ticks: u64,
    started_at: DateTime<Utc>,
    commands: Mutex<Vec<OperatorCommand>>,
    queued: Notify,
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Build the control state for a run starting now.
    pub fn new(tick_interval_ms: u64, bounds: &SimulationBoundsConfig) -> Self {
        let (phase, _) = watch::channel(RunPhase::Running);
        Self {
            phase,
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            max_ticks: bounds.max_ticks,
            started_at: Utc::now(),
            commands: Mutex::new(Vec::new()),
            queued: Notify::new(),
            end_reason: Mutex::new(None),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> RunPhase {
        *self.phase.borrow()
    }

    /// Whether the loop is parked.
    pub fn is_paused(&self) -> bool {
        self.phase() == RunPhase::Paused
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.phase() == RunPhase::Stopping
    }

    /// Park the loop before its next tick. Ignored once stopping.
    pub fn pause(&self) {
        self.transition(RunPhase::Running, RunPhase::Paused);
    }

    /// Let a parked loop continue. Ignored once stopping.
    pub fn resume(&self) {
        self.transition(RunPhase::Paused, RunPhase::Running);
    }

    /// End the run before its next tick, waking a parked loop.
    pub fn request_stop(&self) {
        self.phase.send_replace(RunPhase::Stopping);
    }

    fn transition(&self, from: RunPhase, to: RunPhase) {
        self.phase.send_if_modified(|phase| {
            let matches = *phase == from;
            if matches {
                *phase = to;
            }
            matches
        });
    }

    /// Park until the phase is no longer [`RunPhase::Paused`], and return
    /// the phase that released the wait.
    pub async fn wait_while_paused(&self) -> RunPhase {
        let mut rx = self.phase.subscribe();
        // The sender lives as long as `self`, so the wait cannot fail.
        rx.wait_for(|phase| *phase != RunPhase::Paused)
            .await
            .map_or(RunPhase::Stopping, |phase| *phase)
    }

    /// Interval slept between ticks.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Change the interval slept between ticks.
    ///
    /// Returns the previous interval, or `None` when `ms` is zero.
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        (ms > 0).then(|| self.tick_interval_ms.swap(ms, Ordering::AcqRel))
    }

    /// `true` once `tick` reaches a non-zero `max_ticks`.
    pub const fn tick_limit_reached(&self, tick: u64) -> bool {
        self.max_ticks != 0 && tick >= self.max_ticks
    }

    /// Configured tick limit (0 means unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Wall-clock start of the run.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whole seconds since the run started.
    pub fn elapsed_seconds(&self) -> u64 {
        let seconds = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(seconds).unwrap_or(0)
    }

    /// Record how the run ended.
    pub async fn finish(&self, reason: SimulationEndReason) {
        *self.end_reason.lock().await = Some(reason);
    }

    /// How the run ended, once it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        *self.end_reason.lock().await
    }

    /// Append a command to the queue and wake a loop waiting on
    /// [`command_queued`](Self::command_queued).
    pub async fn enqueue(&self, command: OperatorCommand) {
        self.commands.lock().await.push(command);
        self.queued.notify_one();
    }

    /// Resolve once a command has been queued since the last wake.
    ///
    /// A command queued while nobody waits is remembered, so this may
    /// resolve for a command that was already drained.
    pub async fn command_queued(&self) {
        self.queued.notified().await;
    }

    /// Take every queued command, oldest first.
    pub async fn drain_commands(&self) -> Vec<OperatorCommand> {
        std::mem::take(&mut *self.commands.lock().await)
    }

    /// Number of queued commands.
    pub async fn pending_commands(&self) -> usize {
        self.commands.lock().await.len()
    }

    /// Status report for the operator API, at the last published tick.
    pub async fn status(&self, tick: u64) -> SimulationStatus {
        SimulationStatus {
            tick,
            phase: self.phase(),
            tick_interval_ms: self.tick_interval_ms(),
            elapsed_seconds: self.elapsed_seconds(),
            max_ticks: self.max_ticks,
            pending_commands: self.pending_commands().await,
            end_reason: self.end_reason().await,
            started_at: self.started_at.to_rfc3339(),
        }
    }
}

/// Body of `GET /api/operator/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStatus {
    /// Last published tick.
    pub tick: u64,
    /// Run phase.
    pub phase: RunPhase,
    /// Interval slept between ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Whole seconds since the run started.
    pub elapsed_seconds: u64,
    /// Tick limit (0 means unlimited).
    pub max_ticks: u64,
    /// Commands waiting for the next tick boundary.
    pub pending_commands: usize,
    /// Set once the run has ended.
    pub end_reason: Option<SimulationEndReason>,
    /// RFC 3339 start time.
    pub started_at: String,
}
