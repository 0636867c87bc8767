//! State stores: the data an algorithm mutates, one per visualizer.
//!
//! - [`SequenceStore`] -- an `i64` sequence for the sorting and searching
//!   visualizers, plus the cursor/found/target markers.
//! - [`GridStore`] -- a row-major node grid for the pathfinding visualizer.
//!
//! Stores are owned by the execution controller behind a mutex that is
//! only held inside synchronous step bodies.

pub mod grid;
pub mod sequence;

use algoviz_types::{AlgorithmKind, StoreView};

use crate::error::ControlError;

pub use grid::{GridNode, GridStore};
pub use sequence::{SequenceGenerator, SequenceStore};

/// Behaviour every state store offers the controller.
pub trait StateStore: Send + 'static {
    /// Array length, or grid cell count, as reported in run metrics.
    fn input_size(&self) -> usize;

    /// A read-only projection for snapshots.
    fn view(&self) -> StoreView;

    /// Reset run markers and check the algorithm's preconditions.
    ///
    /// Called with the visualizer idle, immediately before a run starts.
    /// User edits (walls, loaded values, target) survive.
    fn prepare(&mut self, algorithm: AlgorithmKind) -> Result<(), ControlError>;

    /// Replace the input with a fresh one.
    fn regenerate(&mut self);
}
