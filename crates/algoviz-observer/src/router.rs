//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// Family-specific routes are registered before the `{kind}` routes so
/// the literal segments win. CORS allows any origin so a locally served
/// presentation layer can reach the API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws/steps", get(ws::ws_steps))
        // Searching
        .route("/api/visualizers/searching/target", post(handlers::set_target))
        // Pathfinding
        .route(
            "/api/visualizers/pathfinding/cells/{row}/{col}/toggle",
            post(handlers::toggle_cell),
        )
        .route("/api/visualizers/pathfinding/walls/clear", post(handlers::clear_walls))
        .route("/api/visualizers/pathfinding/path/clear", post(handlers::clear_path))
        // Any visualizer
        .route("/api/visualizers/{kind}", get(handlers::get_visualizer))
        .route("/api/visualizers/{kind}/start", post(handlers::start))
        .route("/api/visualizers/{kind}/cancel", post(handlers::cancel))
        .route("/api/visualizers/{kind}/speed", post(handlers::set_speed))
        .route("/api/visualizers/{kind}/regenerate", post(handlers::regenerate))
        // Stats proxy
        .route("/api/stats", get(handlers::stats))
        .route("/api/algorithms", get(handlers::algorithms))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
