//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cyberslug_core::config::SimulationConfig;
use cyberslug_core::operator::{OperatorCommand, OperatorState};
use cyberslug_core::tick::{SimulationState, run_tick};
use cyberslug_observer::router::build_router;
use cyberslug_observer::state::{AppState, TickBroadcast};
use cyberslug_types::PreyKind;
use serde_json::Value;
use tower::ServiceExt;

fn make_operator() -> Arc<OperatorState> {
    let config = SimulationConfig::default();
    Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ))
}

fn make_state(operator: &Arc<OperatorState>) -> Arc<AppState> {
    let config = SimulationConfig::default();
    Arc::new(AppState::with_operator(
        Arc::clone(operator),
        config.agent.learning,
    ))
}

/// App state with a snapshot published after a few ticks.
async fn make_published_state(operator: &Arc<OperatorState>) -> Arc<AppState> {
    let state = make_state(operator);
    let mut sim = SimulationState::new(&SimulationConfig::default()).unwrap();
    let mut last = None;
    for _ in 0..3 {
        last = Some(run_tick(&mut sim).unwrap());
    }
    let summary = last.unwrap();
    {
        let mut snap = state.snapshot.write().await;
        snap.current_tick = summary.tick;
        snap.last_tick = Some(TickBroadcast::new(&summary, &sim));
        snap.world_snapshot = Some(sim.snapshot());
    }
    state
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

// =========================================================================
// Read endpoints
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let operator = make_operator();
    let router = build_router(make_published_state(&operator).await);

    let response = router.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_get_world_before_publication() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router.oneshot(get("/api/world")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["tick"], 0);
    assert!(json.get("agent").is_none());
}

#[tokio::test]
async fn test_get_world() {
    let operator = make_operator();
    let router = build_router(make_published_state(&operator).await);

    let response = router.oneshot(get("/api/world")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["tick"], 3);
    assert_eq!(json["arena_width"], 600.0);
    assert_eq!(json["prey"].as_array().unwrap().len(), 12);
    assert!(json["sensors"].is_null());
}

#[tokio::test]
async fn test_get_agent() {
    let operator = make_operator();
    let router = build_router(make_published_state(&operator).await);

    let response = router.oneshot(get("/api/agent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["tick"], 3);
    // Initial point plus one per tick.
    assert_eq!(json["agent"]["path"].as_array().unwrap().len(), 4);
    assert!(json["agent"]["affect"]["nutrition"].is_number());
    assert!(json["agent"]["learned"]["hermi"].is_number());
}

#[tokio::test]
async fn test_get_agent_before_publication_is_not_found() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router.oneshot(get("/api/agent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_get_prey() {
    let operator = make_operator();
    let router = build_router(make_published_state(&operator).await);

    let response = router.oneshot(get("/api/prey")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 12);
    assert_eq!(json["prey"][0]["kind"], "hermi");
}

#[tokio::test]
async fn test_get_sensors_disabled() {
    let operator = make_operator();
    let router = build_router(make_published_state(&operator).await);

    let response = router.oneshot(get("/api/sensors")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["enabled"], false);
    assert!(json["readout"].is_null());
}

// =========================================================================
// Operator endpoints
// =========================================================================

#[tokio::test]
async fn test_status_without_operator_is_internal_error() {
    let router = build_router(Arc::new(AppState::new()));

    let response = router.oneshot(get("/api/operator/status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_status() {
    let operator = make_operator();
    let router = build_router(make_published_state(&operator).await);

    let response = router.oneshot(get("/api/operator/status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["tick"], 3);
    assert_eq!(json["phase"], "running");
    assert_eq!(json["tick_interval_ms"], 16);
    assert_eq!(json["max_ticks"], 1_000_000);
    assert_eq!(json["pending_commands"], 0);
}

#[tokio::test]
async fn test_pause_and_resume() {
    let operator = make_operator();
    let state = make_state(&operator);

    let response = build_router(Arc::clone(&state))
        .oneshot(Request::post("/api/operator/pause").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(operator.is_paused());

    let response = build_router(state)
        .oneshot(Request::post("/api/operator/resume").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!operator.is_paused());
}

#[tokio::test]
async fn test_stop() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router
        .oneshot(Request::post("/api/operator/stop").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(operator.is_stop_requested());
}

#[tokio::test]
async fn test_set_speed() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router
        .oneshot(post_json(
            "/api/operator/speed",
            &serde_json::json!({ "tick_interval_ms": 100 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["previous_interval_ms"], 16);
    assert_eq!(operator.tick_interval_ms(), 100);
}

#[tokio::test]
async fn test_zero_speed_is_bad_request() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router
        .oneshot(post_json(
            "/api/operator/speed",
            &serde_json::json!({ "tick_interval_ms": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(operator.tick_interval_ms(), 16);
}

#[tokio::test]
async fn test_set_population_is_queued() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router
        .oneshot(post_json(
            "/api/operator/population",
            &serde_json::json!({ "kind": "drug", "count": 9 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        operator.drain_commands().await,
        vec![OperatorCommand::SetPopulation {
            kind: PreyKind::Drug,
            count: 9,
        }]
    );
}

#[tokio::test]
async fn test_oversized_population_is_rejected() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router
        .oneshot(post_json(
            "/api/operator/population",
            &serde_json::json!({ "kind": "hermi", "count": 100_000 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(operator.pending_commands().await, 0);
}

#[tokio::test]
async fn test_set_learning_rate_is_queued() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router
        .oneshot(post_json(
            "/api/operator/learning-rate",
            &serde_json::json!({ "kind": "flab", "alpha": 0.2 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        operator.drain_commands().await,
        vec![OperatorCommand::SetLearningRate {
            kind: PreyKind::Flab,
            alpha: 0.2,
        }]
    );
}

#[tokio::test]
async fn test_non_convex_learning_rate_is_rejected() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router
        .oneshot(post_json(
            "/api/operator/learning-rate",
            &serde_json::json!({ "kind": "hermi", "alpha": 1.5 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(operator.pending_commands().await, 0);
}

#[tokio::test]
async fn test_sensors_and_reset_are_queued_in_order() {
    let operator = make_operator();
    let state = make_state(&operator);

    let response = build_router(Arc::clone(&state))
        .oneshot(post_json(
            "/api/operator/sensors",
            &serde_json::json!({ "enabled": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_router(state)
        .oneshot(Request::post("/api/operator/reset").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        operator.drain_commands().await,
        vec![
            OperatorCommand::SetSensorDisplay { enabled: true },
            OperatorCommand::Reset,
        ]
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let operator = make_operator();
    let router = build_router(make_state(&operator));

    let response = router.oneshot(get("/api/nonexistent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =========================================================================
// Broadcast
// =========================================================================

#[tokio::test]
async fn test_broadcast_reaches_subscriber() {
    let state = AppState::new();
    let mut rx = state.subscribe();
    let mut sim = SimulationState::new(&SimulationConfig::default()).unwrap();
    let summary = run_tick(&mut sim).unwrap();
    let message = TickBroadcast::new(&summary, &sim);

    assert_eq!(state.broadcast(&message), 1);
    let received = rx.recv().await.unwrap();
    assert_eq!(received, message);
    assert_eq!(received.tick, 1);
}

#[tokio::test]
async fn test_broadcast_without_subscribers_is_not_an_error() {
    let state = AppState::new();
    let mut sim = SimulationState::new(&SimulationConfig::default()).unwrap();
    let summary = run_tick(&mut sim).unwrap();
    assert_eq!(state.broadcast(&TickBroadcast::new(&summary, &sim)), 0);
}
