//! The async run loop around [`run_tick`].
//!
//! One iteration of [`run_simulation`]:
//!
//! 1. park while the operator has paused the run, applying commands as
//!    they are queued;
//! 2. end the run if a stop was requested;
//! 3. apply every queued [`OperatorCommand`], oldest first;
//! 4. run one tick and hand the summary to the [`TickCallback`];
//! 5. end the run once the clock reaches `max_ticks`;
//! 6. sleep the current tick interval.
//!
//! A rejected command is logged and dropped; only a failing tick ends the
//! run with an error.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::operator::{OperatorCommand, OperatorState, RunPhase, SimulationEndReason};
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Failure of the run loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick could not be completed.
    #[error("tick error: {source}")]
    Tick {
        /// The failing tick's error.
        #[from]
        source: TickError,
    },
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct SimulationResult {
    /// Why the loop returned.
    pub end_reason: SimulationEndReason,
    /// Summary of the last tick run, if any.
    pub final_summary: Option<TickSummary>,
    /// Ticks run in total; resets do not rewind this count.
    pub total_ticks: u64,
}

/// Hooks the runner calls as the session evolves.
pub trait TickCallback: Send {
    /// Called after every completed tick.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);

    /// Called after a queued command has been applied. Rejected commands
    /// are not reported.
    fn on_command(&mut self, _command: OperatorCommand, _state: &SimulationState) {}

    /// Called once when the run ends, with the final state.
    fn on_finish(&mut self, _state: &SimulationState) {}
}

/// Callback that ignores every event.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Drive `state` until the operator stops the run or the tick limit is hit.
///
/// # Errors
///
/// Returns [`RunnerError::Tick`] when a tick fails. The state is left as
/// that tick found it.
pub async fn run_simulation(
    state: &mut SimulationState,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary = None;
    let mut total_ticks: u64 = 0;

    info!(
        session_id = %state.session_id,
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        prey = state.prey.len(),
        "Simulation starting"
    );

    loop {
        if operator.phase() == RunPhase::Paused {
            info!(tick = state.clock.tick(), "Simulation paused");
            let phase = park(state, operator, callback).await;
            info!(?phase, "Simulation left pause");
        }

        if operator.is_stop_requested() {
            info!(tick = state.clock.tick(), "Operator stop requested");
            return Ok(conclude(
                state,
                operator,
                callback,
                SimulationEndReason::OperatorStop,
                last_summary,
                total_ticks,
            )
            .await);
        }

        apply_pending(state, operator, callback).await;

        let summary = tick::run_tick(state)?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&summary, state);

        // The clock restarts on reset, so the limit applies per session.
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return Ok(conclude(
                state,
                operator,
                callback,
                SimulationEndReason::MaxTicksReached,
                Some(summary),
                total_ticks,
            )
            .await);
        }
        last_summary = Some(summary);

        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }
}

/// Wait out a pause, applying commands as they arrive so a paused session
/// still reflects resets and population changes.
async fn park(
    state: &mut SimulationState,
    operator: &OperatorState,
    callback: &mut dyn TickCallback,
) -> RunPhase {
    loop {
        apply_pending(state, operator, callback).await;
        tokio::select! {
            phase = operator.wait_while_paused() => return phase,
            () = operator.command_queued() => {}
        }
    }
}

async fn conclude(
    state: &SimulationState,
    operator: &OperatorState,
    callback: &mut dyn TickCallback,
    end_reason: SimulationEndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> SimulationResult {
    callback.on_finish(state);
    operator.finish(end_reason).await;
    SimulationResult {
        end_reason,
        final_summary,
        total_ticks,
    }
}

async fn apply_pending(
    state: &mut SimulationState,
    operator: &OperatorState,
    callback: &mut dyn TickCallback,
) {
    for command in operator.drain_commands().await {
        match state.apply_command(command) {
            Ok(()) => callback.on_command(command, state),
            Err(e) => warn!(?command, error = %e, "Operator command rejected"),
        }
    }
}

/// Log how a run ended and where the agent finished.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "Simulation ended"
    );

    match &result.final_summary {
        Some(summary) => info!(
            tick = summary.tick,
            heading = summary.heading,
            x = summary.position.x,
            y = summary.position.y,
            field_mass = summary.field_mass,
            "Final tick summary"
        ),
        None => warn!("Simulation ended with no ticks executed"),
    }
}
