//! The result reporting seam between the engine and the stats backend.
//!
//! The execution controller hands every completed run's [`RunMetrics`] to
//! a [`ResultReporter`]. Reporting is best-effort: [`report_completed`]
//! logs and swallows failures so a backend outage never invalidates a run
//! that already finished on screen.
//!
//! Async trait methods are not dyn-compatible, so the trait returns a
//! [`BoxFuture`] instead.

use std::sync::Mutex;

use algoviz_types::{ExecutionRecord, RunMetrics};
use futures::future::{self, BoxFuture, FutureExt};
use tracing::{info, warn};

use crate::client::StatsClient;
use crate::error::StatsError;

/// Something that accepts completed run metrics.
pub trait ResultReporter: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Submit one completed run.
    fn report<'a>(&'a self, metrics: &'a RunMetrics) -> BoxFuture<'a, Result<(), StatsError>>;
}

impl ResultReporter for StatsClient {
    fn name(&self) -> &str {
        "stats-backend"
    }

    fn report<'a>(&'a self, metrics: &'a RunMetrics) -> BoxFuture<'a, Result<(), StatsError>> {
        async move {
            let record = ExecutionRecord::from(metrics);
            self.record_execution(&record).await
        }
        .boxed()
    }
}

/// Submit a completed run and absorb any failure.
///
/// Returns `true` if the reporter accepted the record. A `false` return
/// has already been logged at `warn` level.
pub async fn report_completed(reporter: &dyn ResultReporter, metrics: &RunMetrics) -> bool {
    match reporter.report(metrics).await {
        Ok(()) => {
            info!(
                reporter = reporter.name(),
                run_id = %metrics.run_id,
                algorithm = metrics.algorithm.label(),
                elapsed_ms = metrics.elapsed_ms,
                "run reported"
            );
            true
        }
        Err(e) => {
            warn!(
                reporter = reporter.name(),
                run_id = %metrics.run_id,
                algorithm = metrics.algorithm.label(),
                error = %e,
                "failed to record execution"
            );
            false
        }
    }
}

/// A reporter that drops every record. Used when the stats backend is
/// disabled in configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ResultReporter for NoopReporter {
    fn name(&self) -> &str {
        "noop"
    }

    fn report<'a>(&'a self, _metrics: &'a RunMetrics) -> BoxFuture<'a, Result<(), StatsError>> {
        future::ready(Ok(())).boxed()
    }
}

/// A reporter that keeps every record in memory.
///
/// Useful for offline sessions and for asserting on submissions in tests.
/// When `fail` is set, every submission is rejected after being counted
/// as an attempt.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    records: Mutex<Vec<RunMetrics>>,
    attempts: Mutex<u64>,
    fail: bool,
}

impl MemoryReporter {
    /// Create an empty, accepting reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reporter that rejects every submission.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Records accepted so far.
    pub fn records(&self) -> Vec<RunMetrics> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Submissions attempted so far, accepted or not.
    pub fn attempts(&self) -> u64 {
        self.attempts.lock().map(|n| *n).unwrap_or(0)
    }
}

impl ResultReporter for MemoryReporter {
    fn name(&self) -> &str {
        "memory"
    }

    fn report<'a>(&'a self, metrics: &'a RunMetrics) -> BoxFuture<'a, Result<(), StatsError>> {
        if let Ok(mut attempts) = self.attempts.lock() {
            *attempts = attempts.saturating_add(1);
        }
        let result = if self.fail {
            Err(StatsError::Status {
                status: 400,
                body: "rejected by memory reporter".to_owned(),
            })
        } else {
            if let Ok(mut records) = self.records.lock() {
                records.push(metrics.clone());
            }
            Ok(())
        };
        future::ready(result).boxed()
    }
}
