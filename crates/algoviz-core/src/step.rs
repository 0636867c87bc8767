//! The per-run step context handed to every algorithm.
//!
//! An algorithm mutates its store through [`StepContext::with_store`],
//! counts work through [`StepContext::metrics`], and ends every observable
//! step with [`StepContext::publish_and_wait`]. That call is the only
//! suspension point: it publishes a snapshot, sleeps for the step delay,
//! and turns a pending cancellation into [`Interrupted`].

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use algoviz_types::{AlgorithmKind, RunId, RunStatus, StepSnapshot};

use crate::cancel::{CancellationToken, Interrupted};
use crate::delay::DelayScheduler;
use crate::metrics::MetricsCollector;
use crate::publish::{Frame, SnapshotPublisher};
use crate::store::StateStore;

/// Everything a running algorithm may touch.
#[derive(Debug)]
pub struct StepContext<S> {
    store: Arc<Mutex<S>>,
    metrics: Arc<MetricsCollector>,
    delay: DelayScheduler,
    delay_ms: u64,
    cancel: CancellationToken,
    publisher: Arc<SnapshotPublisher>,
    run_id: RunId,
    algorithm: AlgorithmKind,
    input_size: usize,
}

/// Parameters of one run, fixed when it starts.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Identifier of the run.
    pub run_id: RunId,
    /// Algorithm being executed.
    pub algorithm: AlgorithmKind,
    /// Input size reported in metrics.
    pub input_size: usize,
    /// Step delay in milliseconds.
    pub delay_ms: u64,
}

impl<S: StateStore> StepContext<S> {
    /// Assemble the context for one run.
    pub fn new(
        store: Arc<Mutex<S>>,
        metrics: Arc<MetricsCollector>,
        cancel: CancellationToken,
        publisher: Arc<SnapshotPublisher>,
        params: RunParams,
    ) -> Self {
        Self {
            store,
            metrics,
            delay: DelayScheduler::from_millis(params.delay_ms),
            delay_ms: params.delay_ms,
            cancel,
            publisher,
            run_id: params.run_id,
            algorithm: params.algorithm,
            input_size: params.input_size,
        }
    }

    /// The run being executed.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The algorithm being executed.
    pub const fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    /// Input size captured when the run started.
    pub const fn input_size(&self) -> usize {
        self.input_size
    }

    /// The run's counters.
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// `Err(Interrupted)` if cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] once the run's token is cancelled.
    pub fn checkpoint(&self) -> Result<(), Interrupted> {
        self.cancel.check()
    }

    /// Run a synchronous step body against the store.
    ///
    /// The lock is released before this returns, so callers can never hold
    /// it across an `.await`.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    /// Publish a running snapshot of the current store and counters.
    pub fn publish(&self) -> StepSnapshot {
        let store = self.with_store(|s| s.view());
        self.publisher.publish(Frame {
            run_id: Some(self.run_id),
            status: RunStatus::Running,
            algorithm: Some(self.algorithm),
            metrics: self.metrics.view(),
            delay_ms: self.delay_ms,
            store,
        })
    }

    /// End an observable step: publish, then pause for the full delay.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] if cancellation is observed before or after
    /// the pause.
    pub async fn publish_and_wait(&self) -> Result<(), Interrupted> {
        self.pause(self.delay.full()).await
    }

    /// Like [`StepContext::publish_and_wait`] with half the delay.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] if cancellation is observed before or after
    /// the pause.
    pub async fn publish_and_wait_half(&self) -> Result<(), Interrupted> {
        self.pause(self.delay.half()).await
    }

    async fn pause(&self, duration: Duration) -> Result<(), Interrupted> {
        self.publish();
        self.checkpoint()?;
        DelayScheduler::wait(duration).await;
        self.checkpoint()
    }
}
