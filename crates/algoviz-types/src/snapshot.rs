//! Presentation snapshots published after every observable step.
//!
//! These are read-only projections of the engine's state stores. The
//! presentation layer never mutates them; it receives a fresh copy per
//! step and renders it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AlgorithmKind, RunStatus, VisualizerKind};
use crate::ids::{RunId, SessionId};

/// Live counters of the current (or last) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MetricsView {
    /// Comparisons so far.
    pub comparisons: u64,
    /// Swaps/writes so far.
    pub swaps: u64,
    /// Visits so far.
    pub visits: u64,
    /// Milliseconds since the run started.
    pub elapsed_ms: u64,
}

/// An element sequence with its presentation markers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SequenceView {
    /// The values in their current order.
    pub values: Vec<i64>,
    /// Index currently being examined, if any.
    pub cursor: Option<usize>,
    /// Index where a search found its target, if any.
    pub found: Option<usize>,
    /// The search target.
    pub target: i64,
}

/// One grid cell as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NodeView {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
    /// Start node marker.
    pub is_start: bool,
    /// End node marker.
    pub is_end: bool,
    /// Obstacle marker.
    pub is_wall: bool,
    /// Settled by the search.
    pub is_visited: bool,
    /// On the reconstructed shortest path.
    pub is_path: bool,
    /// Tentative distance; `None` is infinity.
    pub distance: Option<u32>,
}

/// A node grid in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridView {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// `rows * cols` nodes, row-major.
    pub nodes: Vec<NodeView>,
}

/// The state store of a visualizer, whichever shape it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "shape", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum StoreView {
    /// Sorting and searching visualizers.
    Sequence(SequenceView),
    /// Pathfinding visualizer.
    Grid(GridView),
}

/// Everything the presentation layer needs to render one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StepSnapshot {
    /// The visualizer session that published this snapshot.
    pub session: SessionId,
    /// Which visualizer family.
    pub visualizer: VisualizerKind,
    /// The run in progress, or the last run once idle.
    pub run_id: Option<RunId>,
    /// Monotonic publication counter within the session.
    pub step: u64,
    /// Run/idle status.
    pub status: RunStatus,
    /// Label of the running algorithm; `None` while idle.
    pub algorithm: Option<String>,
    /// Live counters.
    pub metrics: MetricsView,
    /// Step delay in milliseconds.
    pub delay_ms: u64,
    /// The data being operated on.
    pub store: StoreView,
}

impl StepSnapshot {
    /// The sequence store, if this visualizer has one.
    pub const fn sequence(&self) -> Option<&SequenceView> {
        match &self.store {
            StoreView::Sequence(seq) => Some(seq),
            StoreView::Grid(_) => None,
        }
    }

    /// The grid store, if this visualizer has one.
    pub const fn grid(&self) -> Option<&GridView> {
        match &self.store {
            StoreView::Grid(grid) => Some(grid),
            StoreView::Sequence(_) => None,
        }
    }

    /// Whether the snapshot was published for the given algorithm.
    pub fn is_running(&self, algorithm: AlgorithmKind) -> bool {
        self.status == RunStatus::Running && self.algorithm.as_deref() == Some(algorithm.label())
    }
}
