//! Errors returned by the execution controller's control operations.

use algoviz_types::{AlgorithmKind, VisualizerKind};

/// A control request the controller refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// A run is active and the request needs the visualizer idle.
    #[error("{visualizer} visualizer is already running")]
    AlreadyRunning {
        /// The busy visualizer.
        visualizer: VisualizerKind,
    },

    /// The algorithm belongs to a different visualizer family.
    #[error("{algorithm} is not a {visualizer} algorithm")]
    UnsupportedAlgorithm {
        /// The requested algorithm.
        algorithm: AlgorithmKind,
        /// The visualizer it was requested on.
        visualizer: VisualizerKind,
    },

    /// The current input does not satisfy the algorithm's preconditions.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A step delay outside the visualizer's bounds.
    #[error("delay {value}ms is outside {min}..={max}ms")]
    SpeedOutOfRange {
        /// The rejected delay.
        value: u64,
        /// Smallest accepted delay.
        min: u64,
        /// Largest accepted delay.
        max: u64,
    },

    /// The start and end nodes cannot become walls.
    #[error("cell ({row}, {col}) is the start or end node")]
    ProtectedCell {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },

    /// Grid coordinates outside the grid.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    CellOutOfBounds {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },

    /// The run task panicked or was aborted before reporting an outcome.
    #[error("run task failed: {0}")]
    TaskFailed(String),
}
