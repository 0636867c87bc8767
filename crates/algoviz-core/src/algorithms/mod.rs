//! Algorithm runners.
//!
//! Each runner is an `async fn` over a [`StepContext`]. Runners mutate the
//! store only inside [`StepContext::with_store`] and suspend only in
//! [`StepContext::publish_and_wait`], so a step is never observed half
//! applied and cancellation is noticed at every step boundary.
//!
//! [`Runnable`] ties a store type to the runners that operate on it.

pub mod binary;
pub mod bubble;
pub mod dijkstra;
pub mod linear;
pub mod merge;
pub mod quick;
pub mod radix;

use algoviz_types::AlgorithmKind;
use futures::future::{self, BoxFuture, FutureExt};
use tracing::warn;

use crate::cancel::Interrupted;
use crate::step::StepContext;
use crate::store::{GridStore, SequenceStore, StateStore};

/// A store with runners to dispatch to.
pub trait Runnable: StateStore + Sized {
    /// Run `algorithm` to completion or cancellation.
    fn execute(
        algorithm: AlgorithmKind,
        ctx: &StepContext<Self>,
    ) -> BoxFuture<'_, Result<(), Interrupted>>;
}

impl Runnable for SequenceStore {
    fn execute(
        algorithm: AlgorithmKind,
        ctx: &StepContext<Self>,
    ) -> BoxFuture<'_, Result<(), Interrupted>> {
        match algorithm {
            AlgorithmKind::BubbleSort => bubble::run(ctx).boxed(),
            AlgorithmKind::QuickSort => quick::run(ctx).boxed(),
            AlgorithmKind::MergeSort => merge::run(ctx).boxed(),
            AlgorithmKind::RadixSort => radix::run(ctx).boxed(),
            AlgorithmKind::LinearSearch => linear::run(ctx).boxed(),
            AlgorithmKind::BinarySearch => binary::run(ctx).boxed(),
            AlgorithmKind::Dijkstra => {
                warn!(%algorithm, "no sequence runner for algorithm");
                future::ready(Ok(())).boxed()
            }
        }
    }
}

impl Runnable for GridStore {
    fn execute(
        algorithm: AlgorithmKind,
        ctx: &StepContext<Self>,
    ) -> BoxFuture<'_, Result<(), Interrupted>> {
        match algorithm {
            AlgorithmKind::Dijkstra => dijkstra::run(ctx).boxed(),
            other => {
                warn!(algorithm = %other, "no grid runner for algorithm");
                future::ready(Ok(())).boxed()
            }
        }
    }
}

/// Write one value, count it as a swap, and end the step.
pub(crate) async fn write_step(
    ctx: &StepContext<SequenceStore>,
    index: usize,
    value: i64,
) -> Result<(), Interrupted> {
    ctx.with_store(|s| {
        s.set(index, value);
        s.set_cursor(Some(index));
    });
    ctx.metrics().swap();
    ctx.publish_and_wait().await
}

/// Swap two values, count it, and end the step.
pub(crate) async fn swap_step(
    ctx: &StepContext<SequenceStore>,
    a: usize,
    b: usize,
) -> Result<(), Interrupted> {
    ctx.with_store(|s| {
        s.swap(a, b);
        s.set_cursor(Some(b));
    });
    ctx.metrics().swap();
    ctx.publish_and_wait().await
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use algoviz_types::{AlgorithmKind, RunId, StepSnapshot, VisualizerKind};

    use crate::cancel::CancellationToken;
    use crate::metrics::MetricsCollector;
    use crate::publish::{RecordingSink, SnapshotPublisher, SnapshotSink};
    use crate::step::{RunParams, StepContext};
    use crate::store::{SequenceGenerator, SequenceStore, StateStore};

    /// A zero-delay context over `store` with a recording sink.
    pub fn context<S: StateStore>(
        store: S,
        algorithm: AlgorithmKind,
        visualizer: VisualizerKind,
    ) -> (StepContext<S>, Arc<RecordingSink>, CancellationToken) {
        tripwire(store, algorithm, visualizer, |_| false)
    }

    /// Records frames and cancels the run once `trip` matches one.
    struct Tripwire<F> {
        frames: Arc<RecordingSink>,
        cancel: CancellationToken,
        trip: F,
    }

    impl<F: Fn(&StepSnapshot) -> bool + Send + Sync> SnapshotSink for Tripwire<F> {
        fn publish(&self, snapshot: &StepSnapshot) {
            self.frames.publish(snapshot);
            if (self.trip)(snapshot) {
                self.cancel.cancel();
            }
        }
    }

    /// Like [`context`], but cancels the run from inside the first step
    /// whose snapshot matches `trip`.
    pub fn tripwire<S: StateStore>(
        store: S,
        algorithm: AlgorithmKind,
        visualizer: VisualizerKind,
        trip: impl Fn(&StepSnapshot) -> bool + Send + Sync + 'static,
    ) -> (StepContext<S>, Arc<RecordingSink>, CancellationToken) {
        let frames = Arc::new(RecordingSink::new());
        let cancel = CancellationToken::new();
        let sink = Arc::new(Tripwire {
            frames: frames.clone(),
            cancel: cancel.clone(),
            trip,
        });
        let input_size = store.input_size();
        let ctx = StepContext::new(
            Arc::new(Mutex::new(store)),
            Arc::new(MetricsCollector::start()),
            cancel.clone(),
            Arc::new(SnapshotPublisher::new(visualizer, sink)),
            RunParams {
                run_id: RunId::new(),
                algorithm,
                input_size,
                delay_ms: 0,
            },
        );
        (ctx, frames, cancel)
    }

    /// A sequence store holding `values`.
    pub fn sequence(values: &[i64], target: i64) -> SequenceStore {
        SequenceStore::with_values(values.to_vec(), target, SequenceGenerator::Random {
            len: values.len(),
            min: 10,
            max: 310,
        })
    }

    /// A sorting context that cancels once `swaps` writes have been made.
    pub fn sorting_cancelled_after(
        values: &[i64],
        algorithm: AlgorithmKind,
        swaps: u64,
    ) -> (StepContext<SequenceStore>, Arc<RecordingSink>, CancellationToken) {
        tripwire(
            sequence(values, 0),
            algorithm,
            VisualizerKind::Sorting,
            move |s| s.metrics.swaps >= swaps,
        )
    }

    /// A context over `values` for a sorting algorithm.
    pub fn sorting(
        values: &[i64],
        algorithm: AlgorithmKind,
    ) -> (StepContext<SequenceStore>, Arc<RecordingSink>, CancellationToken) {
        context(sequence(values, 0), algorithm, VisualizerKind::Sorting)
    }

    /// Values currently in the store.
    pub fn values(ctx: &StepContext<SequenceStore>) -> Vec<i64> {
        ctx.with_store(|s| s.values().to_vec())
    }

    /// Sort check shared by the runner tests.
    pub fn assert_sorted_permutation(before: &[i64], after: &[i64]) {
        let mut expected = before.to_vec();
        expected.sort_unstable();
        assert_eq!(after, expected.as_slice());
    }
}
