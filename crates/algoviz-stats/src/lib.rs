//! Stats backend client and result reporting for the AlgoViz step engine.
//!
//! # Modules
//!
//! - [`client`] -- [`StatsClient`], the `reqwest` client for the backend's
//!   record and aggregate endpoints.
//! - [`reporter`] -- [`ResultReporter`], the seam the execution controller
//!   submits completed runs through, plus [`NoopReporter`] and
//!   [`MemoryReporter`].
//! - [`error`] -- [`StatsError`].

pub mod client;
pub mod error;
pub mod reporter;

pub use client::{DEFAULT_TIMEOUT, StatsClient};
pub use error::StatsError;
pub use reporter::{MemoryReporter, NoopReporter, ResultReporter, report_completed};
