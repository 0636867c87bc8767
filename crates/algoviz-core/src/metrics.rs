//! Per-run counters.
//!
//! A [`MetricsCollector`] is created when a run starts and finalized when
//! it completes. Counters are atomics so snapshots can read them while the
//! algorithm is mid-step.

use std::sync::atomic::{AtomicU64, Ordering};

use algoviz_types::{AlgorithmKind, MetricsView, RunId, RunMetrics};
use chrono::Utc;
use tokio::time::Instant;

/// Live counters for one run.
#[derive(Debug)]
pub struct MetricsCollector {
    comparisons: AtomicU64,
    swaps: AtomicU64,
    visits: AtomicU64,
    started: Instant,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::start()
    }
}

impl MetricsCollector {
    /// Start a fresh collector; elapsed time counts from now.
    pub fn start() -> Self {
        Self {
            comparisons: AtomicU64::new(0),
            swaps: AtomicU64::new(0),
            visits: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record one comparison.
    pub fn compare(&self) {
        self.comparisons.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one swap or write.
    pub fn swap(&self) {
        self.swaps.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one node visit. A visit also counts as a comparison.
    pub fn visit(&self) {
        self.visits.fetch_add(1, Ordering::Relaxed);
        self.compare();
    }

    /// Comparisons so far.
    pub fn comparisons(&self) -> u64 {
        self.comparisons.load(Ordering::Relaxed)
    }

    /// Swaps so far.
    pub fn swaps(&self) -> u64 {
        self.swaps.load(Ordering::Relaxed)
    }

    /// Visits so far.
    pub fn visits(&self) -> u64 {
        self.visits.load(Ordering::Relaxed)
    }

    /// Milliseconds since the run started.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// A point-in-time copy for snapshots.
    pub fn view(&self) -> MetricsView {
        MetricsView {
            comparisons: self.comparisons(),
            swaps: self.swaps(),
            visits: self.visits(),
            elapsed_ms: self.elapsed_ms(),
        }
    }

    /// Freeze the counters into the record submitted for a completed run.
    pub fn finalize(&self, run_id: RunId, algorithm: AlgorithmKind, input_size: usize) -> RunMetrics {
        RunMetrics {
            run_id,
            algorithm,
            input_size: u64::try_from(input_size).unwrap_or(u64::MAX),
            elapsed_ms: self.elapsed_ms(),
            comparisons: self.comparisons(),
            swaps: self.swaps(),
            visits: self.visits(),
            finished_at: Utc::now(),
        }
    }
}
