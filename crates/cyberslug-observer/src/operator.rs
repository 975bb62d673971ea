//! Operator endpoints.
//!
//! Run controls (pause, resume, stop, speed) take effect on the shared
//! [`OperatorState`] at once. Everything that mutates the simulation is
//! range-checked here and then queued as an [`OperatorCommand`]; the runner
//! applies it at the next tick boundary. Out-of-range arguments are
//! answered with `400 Bad Request` and never queued.
//!
//! | Method | Path | Effect |
//! |--------|------|--------|
//! | `GET` | `/api/operator/status` | Run phase, speed, queue depth |
//! | `POST` | `/api/operator/pause` | Park the run loop |
//! | `POST` | `/api/operator/resume` | Release the run loop |
//! | `POST` | `/api/operator/stop` | End the run before the next tick |
//! | `POST` | `/api/operator/speed` | Set the tick interval (ms, at least 1) |
//! | `POST` | `/api/operator/reset` | Queue a session reset |
//! | `POST` | `/api/operator/population` | Queue a new count for one prey kind |
//! | `POST` | `/api/operator/learning-rate` | Queue a new `alpha` for one prey kind |
//! | `POST` | `/api/operator/sensors` | Queue the raw-sensor diagnostic toggle |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use cyberslug_agents::LearningParams;
use cyberslug_core::operator::{OperatorCommand, OperatorState, SimulationStatus};
use cyberslug_types::PreyKind;
use cyberslug_world::PopulationConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ObserverError;
use crate::state::AppState;

/// Body of `POST /api/operator/speed`.
#[derive(Debug, Deserialize)]
pub struct SetSpeedRequest {
    /// Interval slept between ticks, in milliseconds.
    pub tick_interval_ms: u64,
}

/// Body of `POST /api/operator/population`.
#[derive(Debug, Deserialize)]
pub struct SetPopulationRequest {
    /// Kind to resize.
    pub kind: PreyKind,
    /// New count, at most [`PopulationConfig::MAX_PER_KIND`].
    pub count: u32,
}

/// Body of `POST /api/operator/learning-rate`.
#[derive(Debug, Deserialize)]
pub struct SetLearningRateRequest {
    /// Kind whose learning rate changes.
    pub kind: PreyKind,
    /// New `alpha`; `alpha * beta` must stay within `[0, 1]`.
    pub alpha: f64,
}

/// Body of `POST /api/operator/sensors`.
#[derive(Debug, Deserialize)]
pub struct SetSensorsRequest {
    /// Turn the diagnostic on or off.
    pub enabled: bool,
}

/// Acknowledgement returned by every `POST` endpoint.
#[derive(Debug, Serialize)]
pub struct Ack {
    /// Always `true`; failures use [`ObserverError`].
    pub ok: bool,
    /// What happened, or what will happen at the next tick.
    pub message: String,
    /// Interval before a speed change, for `POST /api/operator/speed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_interval_ms: Option<u64>,
}

impl Ack {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            ok: true,
            message: message.into(),
            previous_interval_ms: None,
        })
    }
}

type AckResult = Result<Json<Ack>, ObserverError>;

fn operator_of(state: &AppState) -> Result<&OperatorState, ObserverError> {
    state
        .operator_state
        .as_deref()
        .ok_or_else(|| ObserverError::Internal("operator state not available".to_owned()))
}

fn reject(reason: impl Into<String>) -> ObserverError {
    let reason = reason.into();
    warn!(%reason, "Operator request rejected");
    ObserverError::InvalidCommand(reason)
}

async fn queued(state: &AppState, command: OperatorCommand, message: String) -> AckResult {
    operator_of(state)?.enqueue(command).await;
    info!(?command, "Operator command queued");
    Ok(Ack::new(message))
}

/// `GET /api/operator/status`
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SimulationStatus>, ObserverError> {
    let operator = operator_of(&state)?;
    let tick = state.snapshot.read().await.current_tick;
    Ok(Json(operator.status(tick).await))
}

/// `POST /api/operator/pause`
pub async fn pause(State(state): State<Arc<AppState>>) -> AckResult {
    operator_of(&state)?.pause();
    Ok(Ack::new("Simulation paused"))
}

/// `POST /api/operator/resume`
pub async fn resume(State(state): State<Arc<AppState>>) -> AckResult {
    operator_of(&state)?.resume();
    Ok(Ack::new("Simulation resumed"))
}

/// `POST /api/operator/stop`
///
/// The observer keeps serving the last published snapshot afterwards.
pub async fn stop(State(state): State<Arc<AppState>>) -> AckResult {
    operator_of(&state)?.request_stop();
    Ok(Ack::new("Simulation will stop before the next tick"))
}

/// `POST /api/operator/speed`
pub async fn set_speed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetSpeedRequest>,
) -> AckResult {
    let ms = body.tick_interval_ms;
    let previous = operator_of(&state)?
        .set_tick_interval_ms(ms)
        .ok_or_else(|| reject("tick_interval_ms must be at least 1"))?;

    Ok(Json(Ack {
        ok: true,
        message: format!("Tick interval set to {ms}ms"),
        previous_interval_ms: Some(previous),
    }))
}

/// `POST /api/operator/reset`
pub async fn reset(State(state): State<Arc<AppState>>) -> AckResult {
    queued(
        &state,
        OperatorCommand::Reset,
        "Reset queued for the next tick".to_owned(),
    )
    .await
}

/// `POST /api/operator/population`
pub async fn set_population(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetPopulationRequest>,
) -> AckResult {
    let SetPopulationRequest { kind, count } = body;
    if count > PopulationConfig::MAX_PER_KIND {
        return Err(reject(format!(
            "count must be at most {}",
            PopulationConfig::MAX_PER_KIND
        )));
    }

    queued(
        &state,
        OperatorCommand::SetPopulation { kind, count },
        format!("{kind} population of {count} queued for the next tick"),
    )
    .await
}

/// `POST /api/operator/learning-rate`
///
/// `alpha` is checked against the kind's configured `beta`.
pub async fn set_learning_rate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetLearningRateRequest>,
) -> AckResult {
    let SetLearningRateRequest { kind, alpha } = body;
    LearningParams {
        alpha,
        ..*state.learning.get(kind)
    }
    .validate(kind)
    .map_err(|e| reject(e.to_string()))?;

    queued(
        &state,
        OperatorCommand::SetLearningRate { kind, alpha },
        format!("{kind} alpha of {alpha} queued for the next tick"),
    )
    .await
}

/// `POST /api/operator/sensors`
pub async fn set_sensors(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetSensorsRequest>,
) -> AckResult {
    let enabled = body.enabled;
    queued(
        &state,
        OperatorCommand::SetSensorDisplay { enabled },
        format!("Sensor display {} at the next tick", if enabled { "on" } else { "off" }),
    )
    .await
}
