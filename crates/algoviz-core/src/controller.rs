//! The execution controller: one run at a time per visualizer.
//!
//! An [`ExecutionController`] owns a visualizer's state store, its speed
//! setting, and the run slot. [`ExecutionController::start`] validates
//! the request, prepares the store, and spawns the runner as a `tokio`
//! task. When the runner returns, the controller flips back to idle,
//! publishes a final snapshot, and hands completed metrics to the result
//! reporter. Cancelled runs are never reported.
//!
//! # Locking
//!
//! The run slot and the store each sit behind a `std::sync::Mutex`.
//! Whenever both are needed the slot is locked first. Neither lock is held
//! across an `.await`.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use algoviz_stats::{ResultReporter, report_completed};
use algoviz_types::{AlgorithmKind, RunEnd, RunId, RunMetrics, RunStatus, StepSnapshot, VisualizerKind};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::algorithms::Runnable;
use crate::cancel::{CancellationToken, Interrupted};
use crate::error::ControlError;
use crate::metrics::MetricsCollector;
use crate::publish::{Frame, SnapshotPublisher, SnapshotSink};
use crate::step::{RunParams, StepContext};
use crate::store::{GridStore, SequenceStore};

/// Accepted step delays, in milliseconds, per visualizer.
pub const fn speed_bounds(kind: VisualizerKind) -> RangeInclusive<u64> {
    match kind {
        VisualizerKind::Sorting => 1..=300,
        VisualizerKind::Searching => 50..=500,
        VisualizerKind::Pathfinding => 10..=200,
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The algorithm finished; these metrics were offered to the reporter.
    Completed(RunMetrics),
    /// The run observed its cancellation token; metrics were discarded.
    Cancelled(RunId),
}

impl RunOutcome {
    /// The run this outcome belongs to.
    pub const fn run_id(&self) -> RunId {
        match self {
            Self::Completed(metrics) => metrics.run_id,
            Self::Cancelled(run_id) => *run_id,
        }
    }

    /// Completed or cancelled.
    pub const fn end(&self) -> RunEnd {
        match self {
            Self::Completed(_) => RunEnd::Completed,
            Self::Cancelled(_) => RunEnd::Cancelled,
        }
    }
}

/// Handle to a spawned run.
#[derive(Debug)]
pub struct RunHandle {
    run_id: RunId,
    join: JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// The run's identifier.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Wait for the run to end. Dropping the handle instead detaches the
    /// run; it still finishes and reports.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::TaskFailed`] if the run task panicked.
    pub async fn wait(self) -> Result<RunOutcome, ControlError> {
        self.join
            .await
            .map_err(|e| ControlError::TaskFailed(e.to_string()))
    }
}

#[derive(Debug)]
struct RunSlot {
    status: RunStatus,
    run_id: Option<RunId>,
    algorithm: Option<AlgorithmKind>,
    cancel: CancellationToken,
    metrics: Arc<MetricsCollector>,
}

struct Shared<S> {
    kind: VisualizerKind,
    store: Arc<Mutex<S>>,
    slot: Mutex<RunSlot>,
    delay_ms: AtomicU64,
    publisher: Arc<SnapshotPublisher>,
    reporter: Arc<dyn ResultReporter>,
}

/// Controls one visualizer instance.
pub struct ExecutionController<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for ExecutionController<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> std::fmt::Debug for ExecutionController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionController")
            .field("kind", &self.shared.kind)
            .field("delay_ms", &self.shared.delay_ms)
            .field("reporter", &self.shared.reporter.name())
            .finish_non_exhaustive()
    }
}

impl<S: Runnable> ExecutionController<S> {
    /// Create an idle controller.
    ///
    /// `delay_ms` is clamped into [`speed_bounds`] for `kind`.
    pub fn new(
        kind: VisualizerKind,
        store: S,
        delay_ms: u64,
        sink: Arc<dyn SnapshotSink>,
        reporter: Arc<dyn ResultReporter>,
    ) -> Self {
        let bounds = speed_bounds(kind);
        let delay_ms = delay_ms.clamp(*bounds.start(), *bounds.end());
        Self {
            shared: Arc::new(Shared {
                kind,
                store: Arc::new(Mutex::new(store)),
                slot: Mutex::new(RunSlot {
                    status: RunStatus::Idle,
                    run_id: None,
                    algorithm: None,
                    cancel: CancellationToken::new(),
                    metrics: Arc::new(MetricsCollector::start()),
                }),
                delay_ms: AtomicU64::new(delay_ms),
                publisher: Arc::new(SnapshotPublisher::new(kind, sink)),
                reporter,
            }),
        }
    }

    /// Which visualizer this controller drives.
    pub fn kind(&self) -> VisualizerKind {
        self.shared.kind
    }

    /// Current run status.
    pub fn status(&self) -> RunStatus {
        self.shared.lock_slot().status
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.status() == RunStatus::Running
    }

    /// Current step delay in milliseconds.
    pub fn delay_ms(&self) -> u64 {
        self.shared.delay_ms.load(Ordering::Relaxed)
    }

    /// Start a run of `algorithm` on the current input.
    ///
    /// Must be called from within a `tokio` runtime.
    ///
    /// # Errors
    ///
    /// - [`ControlError::UnsupportedAlgorithm`] if `algorithm` belongs to
    ///   another visualizer.
    /// - [`ControlError::AlreadyRunning`] if a run is active.
    /// - [`ControlError::InvalidInput`] if the input fails the algorithm's
    ///   preconditions.
    pub fn start(&self, algorithm: AlgorithmKind) -> Result<RunHandle, ControlError> {
        let shared = &self.shared;
        if algorithm.visualizer() != shared.kind {
            return Err(ControlError::UnsupportedAlgorithm {
                algorithm,
                visualizer: shared.kind,
            });
        }

        let ctx = {
            let mut slot = shared.lock_slot();
            if slot.status == RunStatus::Running {
                return Err(ControlError::AlreadyRunning {
                    visualizer: shared.kind,
                });
            }
            let input_size = {
                let mut store = shared.lock_store();
                store.prepare(algorithm)?;
                store.input_size()
            };

            let run_id = RunId::new();
            let cancel = CancellationToken::new();
            let metrics = Arc::new(MetricsCollector::start());
            *slot = RunSlot {
                status: RunStatus::Running,
                run_id: Some(run_id),
                algorithm: Some(algorithm),
                cancel: cancel.clone(),
                metrics: Arc::clone(&metrics),
            };

            StepContext::new(
                Arc::clone(&shared.store),
                metrics,
                cancel,
                Arc::clone(&shared.publisher),
                RunParams {
                    run_id,
                    algorithm,
                    input_size,
                    delay_ms: self.delay_ms(),
                },
            )
        };

        let run_id = ctx.run_id();
        info!(
            visualizer = %shared.kind,
            %run_id,
            algorithm = algorithm.label(),
            input_size = ctx.input_size(),
            delay_ms = self.delay_ms(),
            "run started"
        );

        let task = Arc::clone(shared);
        let join = tokio::spawn(async move {
            ctx.publish();
            let result = S::execute(algorithm, &ctx).await;
            task.finish(&ctx, result).await
        });
        Ok(RunHandle { run_id, join })
    }

    /// Request cancellation of the active run.
    ///
    /// Returns `false` if the visualizer was idle. Never blocks; the run
    /// stops at its next step boundary.
    pub fn cancel(&self) -> bool {
        let slot = self.shared.lock_slot();
        if slot.status != RunStatus::Running {
            return false;
        }
        slot.cancel.cancel();
        info!(visualizer = %self.shared.kind, run_id = ?slot.run_id, "cancellation requested");
        true
    }

    /// Change the step delay used by the next run.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::AlreadyRunning`] during a run, or
    /// [`ControlError::SpeedOutOfRange`] outside [`speed_bounds`].
    pub fn set_speed(&self, delay_ms: u64) -> Result<(), ControlError> {
        let bounds = speed_bounds(self.shared.kind);
        if !bounds.contains(&delay_ms) {
            return Err(ControlError::SpeedOutOfRange {
                value: delay_ms,
                min: *bounds.start(),
                max: *bounds.end(),
            });
        }
        self.edit_and_publish(|_| {
            self.shared.delay_ms.store(delay_ms, Ordering::Relaxed);
            Ok(())
        })
    }

    /// Replace the input with a freshly generated one.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::AlreadyRunning`] during a run.
    pub fn regenerate(&self) -> Result<(), ControlError> {
        self.edit_and_publish(|store| {
            store.regenerate();
            Ok(())
        })
    }

    /// The current presentation snapshot, without publishing it.
    pub fn snapshot(&self) -> StepSnapshot {
        self.shared.publisher.peek(self.shared.frame())
    }

    /// Apply `edit` to the store if the visualizer is idle.
    ///
    /// The run slot stays locked for the duration of `edit`, so no run can
    /// start halfway through an edit. Nothing is published.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::AlreadyRunning`] during a run, or whatever
    /// `edit` returns.
    pub fn edit_idle<R>(
        &self,
        edit: impl FnOnce(&mut S) -> Result<R, ControlError>,
    ) -> Result<R, ControlError> {
        let slot = self.shared.lock_slot();
        if slot.status == RunStatus::Running {
            return Err(ControlError::AlreadyRunning {
                visualizer: self.shared.kind,
            });
        }
        let result = edit(&mut self.shared.lock_store());
        drop(slot);
        result
    }

    fn edit_and_publish<R>(
        &self,
        edit: impl FnOnce(&mut S) -> Result<R, ControlError>,
    ) -> Result<R, ControlError> {
        let result = self.edit_idle(edit)?;
        self.shared.publish_idle();
        Ok(result)
    }
}

impl<S: Runnable> Shared<S> {
    fn lock_slot(&self) -> MutexGuard<'_, RunSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_store(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current frame, read slot first then store.
    fn frame(&self) -> Frame {
        let slot = self.lock_slot();
        let store = self.lock_store().view();
        Frame {
            run_id: slot.run_id,
            status: slot.status,
            algorithm: slot.algorithm,
            metrics: slot.metrics.view(),
            delay_ms: self.delay_ms.load(Ordering::Relaxed),
            store,
        }
    }

    fn publish_idle(&self) -> StepSnapshot {
        self.publisher.publish(self.frame())
    }

    /// Settle a run that has returned from its runner.
    async fn finish(&self, ctx: &StepContext<S>, result: Result<(), Interrupted>) -> RunOutcome {
        let outcome = match result {
            Ok(()) => RunOutcome::Completed(ctx.metrics().finalize(
                ctx.run_id(),
                ctx.algorithm(),
                ctx.input_size(),
            )),
            Err(Interrupted) => RunOutcome::Cancelled(ctx.run_id()),
        };

        {
            let mut slot = self.lock_slot();
            slot.status = RunStatus::Idle;
            slot.algorithm = None;
        }
        let last = self.publish_idle();
        debug!(visualizer = %self.kind, steps = last.step, "final snapshot published");

        match &outcome {
            RunOutcome::Completed(metrics) => {
                info!(
                    visualizer = %self.kind,
                    run_id = %metrics.run_id,
                    algorithm = metrics.algorithm.label(),
                    elapsed_ms = metrics.elapsed_ms,
                    comparisons = metrics.comparisons,
                    swaps = metrics.swaps,
                    visits = metrics.visits,
                    "run completed"
                );
                report_completed(self.reporter.as_ref(), metrics).await;
            }
            RunOutcome::Cancelled(run_id) => {
                info!(visualizer = %self.kind, %run_id, "run cancelled; metrics discarded");
            }
        }
        outcome
    }
}

impl ExecutionController<SequenceStore> {
    /// Change the search target.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::AlreadyRunning`] during a run.
    pub fn set_target(&self, target: i64) -> Result<(), ControlError> {
        self.edit_and_publish(|store| {
            store.set_target(target);
            Ok(())
        })
    }

    /// Replace the input with caller-supplied values.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::AlreadyRunning`] during a run.
    pub fn load_values(&self, values: Vec<i64>) -> Result<(), ControlError> {
        self.edit_and_publish(|store| {
            store.load_values(values);
            Ok(())
        })
    }
}

impl ExecutionController<GridStore> {
    /// Flip a cell between wall and open. Returns the new wall state.
    ///
    /// # Errors
    ///
    /// [`ControlError::AlreadyRunning`], [`ControlError::CellOutOfBounds`],
    /// or [`ControlError::ProtectedCell`].
    pub fn toggle_wall(&self, row: usize, col: usize) -> Result<bool, ControlError> {
        self.edit_and_publish(|grid| grid.toggle_wall(row, col))
    }

    /// Set a cell's wall state.
    ///
    /// # Errors
    ///
    /// Same as [`ExecutionController::toggle_wall`].
    pub fn set_wall(&self, row: usize, col: usize, wall: bool) -> Result<(), ControlError> {
        self.edit_and_publish(|grid| grid.set_wall(row, col, wall))
    }

    /// Remove every wall.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::AlreadyRunning`] during a run.
    pub fn clear_walls(&self) -> Result<(), ControlError> {
        self.edit_and_publish(|grid| {
            grid.clear_walls();
            Ok(())
        })
    }

    /// Remove visited and path markers, keeping walls.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::AlreadyRunning`] during a run.
    pub fn clear_path(&self) -> Result<(), ControlError> {
        self.edit_and_publish(|grid| {
            grid.clear_path();
            Ok(())
        })
    }
}
