//! The three visualizer controllers of one deployment.
//!
//! [`Visualizers`] builds a controller per visualizer family from
//! configuration, wires them to one shared [`BroadcastSink`], and offers
//! the family-agnostic controls by [`VisualizerKind`].

use std::sync::Arc;

use algoviz_stats::ResultReporter;
use algoviz_types::{AlgorithmKind, StepSnapshot, VisualizerKind};
use tokio::sync::broadcast;

use crate::config::{AlgoVizConfig, ConfigError};
use crate::controller::{ExecutionController, RunHandle};
use crate::error::ControlError;
use crate::publish::BroadcastSink;
use crate::store::{GridStore, SequenceStore};

/// The sorting, searching and pathfinding controllers.
#[derive(Debug, Clone)]
pub struct Visualizers {
    /// Sorting visualizer.
    pub sorting: ExecutionController<SequenceStore>,
    /// Searching visualizer.
    pub searching: ExecutionController<SequenceStore>,
    /// Pathfinding visualizer.
    pub pathfinding: ExecutionController<GridStore>,
    sink: BroadcastSink,
}

impl Visualizers {
    /// Build all three controllers from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the pathfinding grid settings are
    /// invalid.
    pub fn from_config(
        config: &AlgoVizConfig,
        reporter: Arc<dyn ResultReporter>,
    ) -> Result<Self, ConfigError> {
        let sink = BroadcastSink::new();
        let shared_sink = Arc::new(sink.clone());

        let sorting = ExecutionController::new(
            VisualizerKind::Sorting,
            SequenceStore::sorting(&config.sorting),
            config.sorting.default_delay_ms,
            shared_sink.clone(),
            Arc::clone(&reporter),
        );
        let searching = ExecutionController::new(
            VisualizerKind::Searching,
            SequenceStore::searching(&config.searching),
            config.searching.default_delay_ms,
            shared_sink.clone(),
            Arc::clone(&reporter),
        );
        let pathfinding = ExecutionController::new(
            VisualizerKind::Pathfinding,
            GridStore::new(&config.pathfinding)?,
            config.pathfinding.default_delay_ms,
            shared_sink,
            reporter,
        );

        Ok(Self {
            sorting,
            searching,
            pathfinding,
            sink,
        })
    }

    /// Subscribe to snapshots from every visualizer.
    pub fn subscribe(&self) -> broadcast::Receiver<StepSnapshot> {
        self.sink.subscribe()
    }

    /// Start a run on the visualizer `algorithm` belongs to.
    ///
    /// # Errors
    ///
    /// See [`ExecutionController::start`].
    pub fn start(&self, kind: VisualizerKind, algorithm: AlgorithmKind) -> Result<RunHandle, ControlError> {
        match kind {
            VisualizerKind::Sorting => self.sorting.start(algorithm),
            VisualizerKind::Searching => self.searching.start(algorithm),
            VisualizerKind::Pathfinding => self.pathfinding.start(algorithm),
        }
    }

    /// Request cancellation on one visualizer.
    pub fn cancel(&self, kind: VisualizerKind) -> bool {
        match kind {
            VisualizerKind::Sorting => self.sorting.cancel(),
            VisualizerKind::Searching => self.searching.cancel(),
            VisualizerKind::Pathfinding => self.pathfinding.cancel(),
        }
    }

    /// Change one visualizer's step delay.
    ///
    /// # Errors
    ///
    /// See [`ExecutionController::set_speed`].
    pub fn set_speed(&self, kind: VisualizerKind, delay_ms: u64) -> Result<(), ControlError> {
        match kind {
            VisualizerKind::Sorting => self.sorting.set_speed(delay_ms),
            VisualizerKind::Searching => self.searching.set_speed(delay_ms),
            VisualizerKind::Pathfinding => self.pathfinding.set_speed(delay_ms),
        }
    }

    /// Regenerate one visualizer's input.
    ///
    /// # Errors
    ///
    /// See [`ExecutionController::regenerate`].
    pub fn regenerate(&self, kind: VisualizerKind) -> Result<(), ControlError> {
        match kind {
            VisualizerKind::Sorting => self.sorting.regenerate(),
            VisualizerKind::Searching => self.searching.regenerate(),
            VisualizerKind::Pathfinding => self.pathfinding.regenerate(),
        }
    }

    /// The current snapshot of one visualizer.
    pub fn snapshot(&self, kind: VisualizerKind) -> StepSnapshot {
        match kind {
            VisualizerKind::Sorting => self.sorting.snapshot(),
            VisualizerKind::Searching => self.searching.snapshot(),
            VisualizerKind::Pathfinding => self.pathfinding.snapshot(),
        }
    }
}
