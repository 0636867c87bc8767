//! Shared type definitions for the AlgoViz step engine.
//!
//! This crate is the single source of truth for the data exchanged between
//! the engine, the observer API and the stats backend. Types flow downstream
//! to `TypeScript` via `ts-rs` for the presentation layer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for runs and sessions
//! - [`enums`] -- Algorithm table, visualizer families, run status
//! - [`records`] -- Run metrics and stats backend wire records
//! - [`snapshot`] -- Per-step presentation snapshots

pub mod enums;
pub mod ids;
pub mod records;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use enums::{AlgorithmKind, ParseKindError, RunEnd, RunStatus, VisualizerKind};
pub use ids::{RunId, SessionId};
pub use records::{AlgorithmInfo, ExecutionRecord, PerformanceStats, RunMetrics};
pub use snapshot::{GridView, MetricsView, NodeView, SequenceView, StepSnapshot, StoreView};
