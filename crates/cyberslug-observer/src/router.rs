//! Route table for the Cyberslug observer.
//!
//! REST snapshots, operator controls and the tick stream share one
//! [`Router`]; CORS is open so a local dashboard can poll it.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;
use crate::ws;

/// Build the observer router over shared state.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/ticks` -- `WebSocket` tick summary stream
/// - `GET /api/world`, `/api/agent`, `/api/prey`, `/api/sensors` --
///   reads from the latest snapshot
/// - `GET /api/operator/status` and `POST /api/operator/*` -- operator
///   controls and queued commands
///
/// CORS is configured to allow any origin for development.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/ticks", get(ws::ws_ticks))
        // REST API
        .route("/api/world", get(handlers::get_world))
        .route("/api/agent", get(handlers::get_agent))
        .route("/api/prey", get(handlers::get_prey))
        .route("/api/sensors", get(handlers::get_sensors))
        // Operator API
        .route("/api/operator/status", get(operator::status))
        .route("/api/operator/pause", post(operator::pause))
        .route("/api/operator/resume", post(operator::resume))
        .route("/api/operator/speed", post(operator::set_speed))
        .route("/api/operator/stop", post(operator::stop))
        .route("/api/operator/reset", post(operator::reset))
        .route("/api/operator/population", post(operator::set_population))
        .route("/api/operator/learning-rate", post(operator::set_learning_rate))
        .route("/api/operator/sensors", post(operator::set_sensors))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
