//! REST handlers for the visualizer controls and the stats proxy.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/visualizers/{kind}` | Current snapshot |
//! | `POST` | `/api/visualizers/{kind}/start` | Start a run |
//! | `POST` | `/api/visualizers/{kind}/cancel` | Request cancellation |
//! | `POST` | `/api/visualizers/{kind}/speed` | Set the step delay |
//! | `POST` | `/api/visualizers/{kind}/regenerate` | Fresh input |
//! | `POST` | `/api/visualizers/searching/target` | Set the search target |
//! | `POST` | `/api/visualizers/pathfinding/cells/{row}/{col}/toggle` | Toggle a wall |
//! | `POST` | `/api/visualizers/pathfinding/walls/clear` | Remove all walls |
//! | `POST` | `/api/visualizers/pathfinding/path/clear` | Remove path markers |
//! | `GET` | `/api/stats?type=` | Backend performance aggregates |
//! | `GET` | `/api/algorithms?type=` | Backend algorithm metadata |
//!
//! Edit endpoints answer with the visualizer's snapshot after the edit.

use std::sync::Arc;

use algoviz_types::{AlgorithmKind, RunId, StepSnapshot, VisualizerKind};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::debug;

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/visualizers/{kind}/start`.
#[derive(Debug, serde::Deserialize)]
pub struct StartRequest {
    /// Algorithm to run, e.g. `"quick_sort"`.
    pub algorithm: AlgorithmKind,
}

/// Response body for a started run.
#[derive(Debug, serde::Serialize)]
struct StartResponse {
    ok: bool,
    run_id: RunId,
    algorithm: &'static str,
}

/// Request body for `POST /api/visualizers/{kind}/speed`.
#[derive(Debug, serde::Deserialize)]
pub struct SetSpeedRequest {
    /// New step delay in milliseconds.
    pub delay_ms: u64,
}

/// Request body for `POST /api/visualizers/searching/target`.
#[derive(Debug, serde::Deserialize)]
pub struct SetTargetRequest {
    /// New search target.
    pub target: i64,
}

/// Query string for the stats proxy endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct TypeQuery {
    /// Visualizer family filter.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Generic acknowledgement.
#[derive(Debug, serde::Serialize)]
struct ControlResponse {
    ok: bool,
    message: String,
}

fn parse_kind(raw: &str) -> Result<VisualizerKind, ObserverError> {
    raw.parse()
        .map_err(|e| ObserverError::NotFound(format!("{e}")))
}

fn parse_type_filter(raw: Option<&str>) -> Result<Option<VisualizerKind>, ObserverError> {
    raw.map(|t| {
        t.parse()
            .map_err(|e| ObserverError::InvalidQuery(format!("{e}")))
    })
    .transpose()
}

// ---------------------------------------------------------------------------
// Generic visualizer controls
// ---------------------------------------------------------------------------

/// Current snapshot of one visualizer.
pub async fn get_visualizer(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<StepSnapshot>, ObserverError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.visualizers.snapshot(kind)))
}

/// Start a run. The run continues in the background; progress arrives
/// over `/ws/steps`.
pub async fn start(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(body): Json<StartRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let kind = parse_kind(&kind)?;
    let handle = state.visualizers.start(kind, body.algorithm)?;
    let run_id = handle.run_id();
    debug!(visualizer = %kind, %run_id, "run accepted");

    Ok((
        StatusCode::ACCEPTED,
        Json(StartResponse {
            ok: true,
            run_id,
            algorithm: body.algorithm.label(),
        }),
    ))
}

/// Request cancellation of the active run, if any.
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let kind = parse_kind(&kind)?;
    let requested = state.visualizers.cancel(kind);
    let message = if requested {
        format!("{kind} run cancellation requested")
    } else {
        format!("{kind} visualizer is idle")
    };
    Ok(Json(ControlResponse {
        ok: requested,
        message,
    }))
}

/// Change the step delay used by the next run.
pub async fn set_speed(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(body): Json<SetSpeedRequest>,
) -> Result<Json<StepSnapshot>, ObserverError> {
    let kind = parse_kind(&kind)?;
    state.visualizers.set_speed(kind, body.delay_ms)?;
    Ok(Json(state.visualizers.snapshot(kind)))
}

/// Replace the input with a fresh one.
pub async fn regenerate(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<StepSnapshot>, ObserverError> {
    let kind = parse_kind(&kind)?;
    state.visualizers.regenerate(kind)?;
    Ok(Json(state.visualizers.snapshot(kind)))
}

// ---------------------------------------------------------------------------
// Searching
// ---------------------------------------------------------------------------

/// Change the search target.
pub async fn set_target(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetTargetRequest>,
) -> Result<Json<StepSnapshot>, ObserverError> {
    let searching = &state.visualizers.searching;
    searching.set_target(body.target)?;
    Ok(Json(searching.snapshot()))
}

// ---------------------------------------------------------------------------
// Pathfinding
// ---------------------------------------------------------------------------

/// Toggle a wall.
pub async fn toggle_cell(
    State(state): State<Arc<AppState>>,
    Path((row, col)): Path<(usize, usize)>,
) -> Result<Json<StepSnapshot>, ObserverError> {
    let pathfinding = &state.visualizers.pathfinding;
    let wall = pathfinding.toggle_wall(row, col)?;
    debug!(row, col, wall, "cell toggled");
    Ok(Json(pathfinding.snapshot()))
}

/// Remove every wall.
pub async fn clear_walls(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StepSnapshot>, ObserverError> {
    let pathfinding = &state.visualizers.pathfinding;
    pathfinding.clear_walls()?;
    Ok(Json(pathfinding.snapshot()))
}

/// Remove visited and path markers.
pub async fn clear_path(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StepSnapshot>, ObserverError> {
    let pathfinding = &state.visualizers.pathfinding;
    pathfinding.clear_path()?;
    Ok(Json(pathfinding.snapshot()))
}

// ---------------------------------------------------------------------------
// Stats proxy
// ---------------------------------------------------------------------------

/// Performance aggregates from the stats backend, optionally filtered.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TypeQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let filter = parse_type_filter(query.kind.as_deref())?;
    let client = state.stats.as_ref().ok_or(ObserverError::StatsDisabled)?;
    let rows = client.performance_stats(filter).await?;
    Ok(Json(rows))
}

/// Algorithm metadata from the stats backend. `type` is required.
pub async fn algorithms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TypeQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let kind = parse_type_filter(query.kind.as_deref())?
        .ok_or_else(|| ObserverError::InvalidQuery("type parameter is required".to_owned()))?;
    let client = state.stats.as_ref().ok_or(ObserverError::StatsDisabled)?;
    let rows = client.algorithms_by_type(kind).await?;
    Ok(Json(rows))
}
