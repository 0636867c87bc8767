//! `WebSocket` handler for real-time step snapshot streaming.
//!
//! Clients connect to `GET /ws/steps` and receive a JSON-encoded
//! [`StepSnapshot`](algoviz_types::StepSnapshot) each time any visualizer
//! publishes a step. An optional `?visualizer=sorting` query narrows the
//! stream to one visualizer.
//!
//! If a client falls behind, lagged messages are silently skipped and
//! the client resumes from the most recent snapshot.

use std::sync::Arc;

use algoviz_types::VisualizerKind;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::error::ObserverError;
use crate::state::AppState;

/// Query string for `GET /ws/steps`.
#[derive(Debug, serde::Deserialize)]
pub struct StepsQuery {
    /// Only forward snapshots from this visualizer.
    pub visualizer: Option<String>,
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming step snapshots.
///
/// # Route
///
/// `GET /ws/steps`
pub async fn ws_steps(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<StepsQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let filter = query
        .visualizer
        .as_deref()
        .map(str::parse::<VisualizerKind>)
        .transpose()
        .map_err(|e| ObserverError::InvalidQuery(format!("{e}")))?;
    Ok(ws.on_upgrade(move |socket| handle_ws(socket, state, filter)))
}

/// Handle the `WebSocket` lifecycle: subscribe to the broadcast
/// channel and forward each matching snapshot as a text frame.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, filter: Option<VisualizerKind>) {
    debug!(?filter, "WebSocket client connected");

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            // Receive a snapshot from a running visualizer.
            result = rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        if filter.is_some_and(|kind| kind != snapshot.visualizer) {
                            continue;
                        }
                        let json = match serde_json::to_string(&snapshot) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize step snapshot: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}
