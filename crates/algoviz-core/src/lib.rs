//! Stepwise algorithm execution engine for the AlgoViz visualizers.
//!
//! Algorithms run as cooperative `tokio` tasks that publish a snapshot of
//! their data after every observable step, pause for a configurable
//! delay, and stop early when cancelled. Completed runs are reported to
//! the stats backend.
//!
//! # Modules
//!
//! - [`controller`] -- [`ExecutionController`]: one run at a time per
//!   visualizer, speed and input editing while idle.
//! - [`algorithms`] -- the bubble, quick, merge and radix sorts, linear and
//!   binary search, and Dijkstra's shortest path.
//! - [`store`] -- [`SequenceStore`] and [`GridStore`].
//! - [`step`] -- [`StepContext`], the per-run handle algorithms work
//!   through.
//! - [`metrics`], [`delay`], [`cancel`] -- counters, pacing and the
//!   cancellation token.
//! - [`publish`] -- snapshot sinks and the publisher.
//! - [`session`] -- [`Visualizers`], the three controllers of a deployment.
//! - [`config`] -- YAML configuration.

pub mod algorithms;
pub mod cancel;
pub mod config;
pub mod controller;
pub mod delay;
pub mod error;
pub mod metrics;
pub mod publish;
pub mod session;
pub mod step;
pub mod store;

pub use cancel::{CancellationToken, Interrupted};
pub use config::{AlgoVizConfig, ConfigError};
pub use controller::{ExecutionController, RunHandle, RunOutcome, speed_bounds};
pub use error::ControlError;
pub use publish::{BroadcastSink, RecordingSink, SnapshotSink};
pub use session::Visualizers;
pub use step::StepContext;
pub use store::{GridStore, SequenceStore, StateStore};
