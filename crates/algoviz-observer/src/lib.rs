//! Observer API server for the AlgoViz step engine.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/steps`) streaming every
//!   [`StepSnapshot`](algoviz_types::StepSnapshot) via
//!   [`tokio::sync::broadcast`]
//! - **Control endpoints** under `/api/visualizers` for starting and
//!   cancelling runs and editing input while idle
//! - **Stats proxy endpoints** (`/api/stats`, `/api/algorithms`) that
//!   forward to the stats backend
//!
//! # Architecture
//!
//! Handlers call straight into the [`Visualizers`](algoviz_core::Visualizers)
//! controllers. Runs execute as background tasks; a start request returns
//! as soon as the run is spawned and progress arrives over the socket.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
