//! `GET /ws/ticks`: one JSON [`TickBroadcast`] text frame per tick.
//!
//! A client that falls behind the broadcast buffer skips to the newest
//! message. Client pings are answered; other client frames are ignored.
//!
//! [`TickBroadcast`]: crate::state::TickBroadcast

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::{AppState, TickBroadcast};

/// Upgrade the connection and start streaming ticks.
pub async fn ws_ticks(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| stream_ticks(socket, state))
}

async fn stream_ticks(mut socket: WebSocket, state: Arc<AppState>) {
    let mut ticks = state.subscribe();
    debug!("Tick stream opened");

    loop {
        let flow = tokio::select! {
            next = ticks.recv() => forward(&mut socket, next).await,
            frame = socket.recv() => answer(&mut socket, frame).await,
        };
        if flow.is_break() {
            break;
        }
    }

    debug!("Tick stream closed");
}

async fn forward(
    socket: &mut WebSocket,
    next: Result<TickBroadcast, RecvError>,
) -> ControlFlow<()> {
    match next {
        Ok(tick) => match serde_json::to_string(&tick) {
            Ok(text) => send(socket, Message::Text(text.into())).await,
            Err(e) => {
                warn!(tick = tick.tick, error = %e, "Tick broadcast not encodable");
                ControlFlow::Continue(())
            }
        },
        Err(RecvError::Lagged(skipped)) => {
            debug!(skipped, "Tick stream lagged");
            ControlFlow::Continue(())
        }
        Err(RecvError::Closed) => ControlFlow::Break(()),
    }
}

async fn answer(
    socket: &mut WebSocket,
    frame: Option<Result<Message, axum::Error>>,
) -> ControlFlow<()> {
    match frame {
        Some(Ok(Message::Ping(payload))) => send(socket, Message::Pong(payload)).await,
        Some(Ok(Message::Close(_)) | Err(_)) | None => ControlFlow::Break(()),
        Some(Ok(_)) => ControlFlow::Continue(()),
    }
}

async fn send(socket: &mut WebSocket, message: Message) -> ControlFlow<()> {
    if socket.send(message).await.is_ok() {
        ControlFlow::Continue(())
    } else {
        ControlFlow::Break(())
    }
}
