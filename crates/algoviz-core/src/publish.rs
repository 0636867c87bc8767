//! Snapshot publication.
//!
//! After every observable step the running algorithm hands a
//! [`StepSnapshot`] to a [`SnapshotSink`]. The production sink is a
//! [`BroadcastSink`] feeding the observer's `WebSocket`; tests use a
//! [`RecordingSink`] to inspect the exact sequence of frames.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use algoviz_types::{
    AlgorithmKind, MetricsView, RunId, RunStatus, SessionId, StepSnapshot, StoreView,
    VisualizerKind,
};
use tokio::sync::broadcast;
use tracing::trace;

/// Capacity of the snapshot broadcast channel.
///
/// A subscriber that falls behind by more than this many snapshots
/// receives [`broadcast::error::RecvError::Lagged`] and skips ahead.
pub const BROADCAST_CAPACITY: usize = 256;

/// Receives every published snapshot.
pub trait SnapshotSink: Send + Sync {
    /// Deliver one snapshot. Must not block.
    fn publish(&self, snapshot: &StepSnapshot);
}

/// Fan-out sink backed by a `tokio` broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<StepSnapshot>,
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastSink {
    /// Create a sink with [`BROADCAST_CAPACITY`].
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    /// Subscribe to future snapshots.
    pub fn subscribe(&self) -> broadcast::Receiver<StepSnapshot> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl SnapshotSink for BroadcastSink {
    fn publish(&self, snapshot: &StepSnapshot) {
        // No subscribers is fine; the snapshot is simply dropped.
        let receivers = self.tx.send(snapshot.clone()).unwrap_or(0);
        trace!(
            visualizer = %snapshot.visualizer,
            step = snapshot.step,
            receivers,
            "snapshot broadcast"
        );
    }
}

/// Sink that keeps every snapshot in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<StepSnapshot>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots received so far, in order.
    pub fn frames(&self) -> Vec<StepSnapshot> {
        self.frames
            .lock()
            .map(|frames| frames.clone())
            .unwrap_or_default()
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<StepSnapshot> {
        self.frames
            .lock()
            .ok()
            .and_then(|frames| frames.last().cloned())
    }
}

impl SnapshotSink for RecordingSink {
    fn publish(&self, snapshot: &StepSnapshot) {
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(snapshot.clone());
        }
    }
}

/// The mutable parts of a snapshot, supplied by the caller.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The run in progress, or the last run.
    pub run_id: Option<RunId>,
    /// Run/idle status.
    pub status: RunStatus,
    /// Running algorithm; `None` while idle.
    pub algorithm: Option<AlgorithmKind>,
    /// Live counters.
    pub metrics: MetricsView,
    /// Step delay in milliseconds.
    pub delay_ms: u64,
    /// Store projection.
    pub store: StoreView,
}

/// Stamps frames with the session identity and a monotonic step number,
/// then hands them to a sink.
pub struct SnapshotPublisher {
    session: SessionId,
    visualizer: VisualizerKind,
    step: AtomicU64,
    sink: Arc<dyn SnapshotSink>,
}

impl std::fmt::Debug for SnapshotPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotPublisher")
            .field("session", &self.session)
            .field("visualizer", &self.visualizer)
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

impl SnapshotPublisher {
    /// Create a publisher for a new session.
    pub fn new(visualizer: VisualizerKind, sink: Arc<dyn SnapshotSink>) -> Self {
        Self {
            session: SessionId::new(),
            visualizer,
            step: AtomicU64::new(0),
            sink,
        }
    }

    /// The session this publisher stamps onto snapshots.
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// The visualizer this publisher belongs to.
    pub const fn visualizer(&self) -> VisualizerKind {
        self.visualizer
    }

    /// Number of snapshots published so far.
    pub fn published(&self) -> u64 {
        self.step.load(Ordering::Relaxed)
    }

    /// Stamp a frame with the next step number and publish it.
    pub fn publish(&self, frame: Frame) -> StepSnapshot {
        let step = self.step.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        let snapshot = self.assemble(frame, step);
        self.sink.publish(&snapshot);
        snapshot
    }

    /// Build a snapshot without publishing it or advancing the counter.
    pub fn peek(&self, frame: Frame) -> StepSnapshot {
        self.assemble(frame, self.published())
    }

    fn assemble(&self, frame: Frame, step: u64) -> StepSnapshot {
        StepSnapshot {
            session: self.session,
            visualizer: self.visualizer,
            run_id: frame.run_id,
            step,
            status: frame.status,
            algorithm: frame.algorithm.map(|a| a.label().to_owned()),
            metrics: frame.metrics,
            delay_ms: frame.delay_ms,
            store: frame.store,
        }
    }
}

#[cfg(test)]
mod tests {
    use algoviz_types::SequenceView;

    use super::*;

    fn frame() -> Frame {
        Frame {
            run_id: None,
            status: RunStatus::Idle,
            algorithm: None,
            metrics: MetricsView::default(),
            delay_ms: 100,
            store: StoreView::Sequence(SequenceView::default()),
        }
    }

    #[test]
    fn step_numbers_are_monotonic() {
        let sink = Arc::new(RecordingSink::new());
        let publisher = SnapshotPublisher::new(VisualizerKind::Sorting, sink.clone());

        publisher.publish(frame());
        publisher.publish(frame());
        assert_eq!(publisher.peek(frame()).step, 2);

        let steps: Vec<u64> = sink.frames().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 2]);
        assert!(sink.frames().iter().all(|s| s.session == publisher.session()));
    }

    #[tokio::test]
    async fn broadcast_sink_fans_out() {
        let sink = BroadcastSink::new();
        let mut rx = sink.subscribe();
        let publisher = SnapshotPublisher::new(VisualizerKind::Searching, Arc::new(sink.clone()));

        let sent = publisher.publish(frame());
        let received = rx.recv().await;
        assert_eq!(received.ok(), Some(sent));
    }

    #[test]
    fn broadcast_without_subscribers_is_silent() {
        let sink = BroadcastSink::new();
        assert_eq!(sink.receiver_count(), 0);
        SnapshotPublisher::new(VisualizerKind::Pathfinding, Arc::new(sink)).publish(frame());
    }
}
