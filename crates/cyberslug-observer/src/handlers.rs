//! Read-only endpoints.
//!
//! Every handler reads the [`SimulationSnapshot`] last published by the
//! engine; none of them touches the running simulation.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `GET` | `/` | HTML status page |
//! | `GET` | `/api/world` | Full [`WorldSnapshot`], or just `{"tick"}` before the first publication |
//! | `GET` | `/api/agent` | Agent position, path, affect, learned values, counters |
//! | `GET` | `/api/prey` | Prey in population order |
//! | `GET` | `/api/sensors` | Raw and compressed sensor readout while the diagnostic is on |
//!
//! [`SimulationSnapshot`]: crate::state::SimulationSnapshot

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::Html;
use cyberslug_types::{AgentSnapshot, EncounterCounts, PreyView, SensorReadout, WorldSnapshot};
use serde::Serialize;

use crate::error::ObserverError;
use crate::state::AppState;

/// Body of `GET /api/world`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WorldResponse {
    /// A world snapshot has been published.
    Published(Box<WorldSnapshot>),
    /// Nothing published yet; only the clock is known.
    Pending {
        /// Current tick.
        tick: u64,
    },
}

/// Body of `GET /api/agent`.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    /// Tick the snapshot was taken at.
    pub tick: u64,
    /// The agent.
    pub agent: AgentSnapshot,
}

/// Body of `GET /api/prey`.
#[derive(Debug, Serialize)]
pub struct PreyResponse {
    /// Tick the snapshot was taken at.
    pub tick: u64,
    /// Number of prey.
    pub count: usize,
    /// Prey in population order.
    pub prey: Vec<PreyView>,
}

/// Body of `GET /api/sensors`.
#[derive(Debug, Serialize)]
pub struct SensorsResponse {
    /// Tick the snapshot was taken at.
    pub tick: u64,
    /// Whether the diagnostic was on at that tick.
    pub enabled: bool,
    /// Readout, `null` while the diagnostic is off.
    pub readout: Option<SensorReadout>,
}

/// Run `project` against the published world snapshot.
async fn published<T>(
    state: &AppState,
    project: impl FnOnce(&WorldSnapshot) -> T,
) -> Result<Json<T>, ObserverError> {
    let snapshot = state.snapshot.read().await;
    snapshot
        .world_snapshot
        .as_ref()
        .map(|world| Json(project(world)))
        .ok_or_else(|| ObserverError::NotFound("no world snapshot published yet".to_owned()))
}

/// `GET /`
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let snapshot = state.snapshot.read().await;
    let tick = snapshot.current_tick;
    let (nutrition, counts) = snapshot.last_tick.as_ref().map_or_else(
        || ("-".to_owned(), EncounterCounts::default()),
        |t| (format!("{:.3}", t.nutrition), t.encounters),
    );
    let EncounterCounts { hermi, flab, drug } = counts;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Cyberslug Observer</title>
<style>
body {{ background: #101418; color: #d0d7de; font-family: monospace; margin: 2rem auto; max-width: 720px; }}
td {{ padding: 0.25rem 1rem; border-bottom: 1px solid #2d333b; }}
a {{ color: #6cb6ff; }}
</style>
</head>
<body>
<h1>Cyberslug Observer</h1>
<table>
<tr><td>Tick</td><td>{tick}</td></tr>
<tr><td>Nutrition</td><td>{nutrition}</td></tr>
<tr><td>Hermissenda eaten</td><td>{hermi}</td></tr>
<tr><td>Flabellina eaten</td><td>{flab}</td></tr>
<tr><td>Drug eaten</td><td>{drug}</td></tr>
</table>
<p>
<a href="/api/world">world</a> &middot;
<a href="/api/agent">agent</a> &middot;
<a href="/api/prey">prey</a> &middot;
<a href="/api/sensors">sensors</a> &middot;
<a href="/api/operator/status">status</a> &middot;
ws: <code>/ws/ticks</code>
</p>
</body>
</html>"#
    ))
}

/// `GET /api/world`
pub async fn get_world(State(state): State<Arc<AppState>>) -> Json<WorldResponse> {
    let snapshot = state.snapshot.read().await;
    Json(snapshot.world_snapshot.as_ref().map_or(
        WorldResponse::Pending {
            tick: snapshot.current_tick,
        },
        |world| WorldResponse::Published(Box::new(world.clone())),
    ))
}

/// `GET /api/agent`
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AgentResponse>, ObserverError> {
    published(&state, |world| AgentResponse {
        tick: world.tick,
        agent: world.agent.clone(),
    })
    .await
}

/// `GET /api/prey`
pub async fn get_prey(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PreyResponse>, ObserverError> {
    published(&state, |world| PreyResponse {
        tick: world.tick,
        count: world.prey.len(),
        prey: world.prey.clone(),
    })
    .await
}

/// `GET /api/sensors`
pub async fn get_sensors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SensorsResponse>, ObserverError> {
    published(&state, |world| SensorsResponse {
        tick: world.tick,
        enabled: world.sensors.is_some(),
        readout: world.sensors,
    })
    .await
}
