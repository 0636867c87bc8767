//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the three visualizer controllers and, when the stats
//! backend is enabled, a client used to proxy its read endpoints. All
//! snapshot reads go through the controllers, which never hold a lock
//! across an `.await`, so handlers never block a running algorithm.

use algoviz_core::Visualizers;
use algoviz_stats::StatsClient;
use algoviz_types::StepSnapshot;
use tokio::sync::broadcast;

/// Shared state for all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The sorting, searching and pathfinding controllers.
    pub visualizers: Visualizers,
    /// Stats backend client, `None` when reporting is disabled.
    pub stats: Option<StatsClient>,
}

impl AppState {
    /// Create application state.
    pub const fn new(visualizers: Visualizers, stats: Option<StatsClient>) -> Self {
        Self { visualizers, stats }
    }

    /// Subscribe to step snapshots from every visualizer.
    pub fn subscribe(&self) -> broadcast::Receiver<StepSnapshot> {
        self.visualizers.subscribe()
    }
}
