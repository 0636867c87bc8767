//! End-to-end runs through the execution controller.
//!
//! Every test runs on a paused `tokio` clock, so step delays advance
//! virtual time instantly and runs finish deterministically.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use algoviz_core::config::{PathfindingConfig, SearchingConfig, SortingConfig};
use algoviz_core::store::SequenceGenerator;
use algoviz_core::{
    ControlError, ExecutionController, GridStore, RecordingSink, RunOutcome, SequenceStore,
};
use algoviz_stats::MemoryReporter;
use algoviz_types::{AlgorithmKind, RunEnd, RunStatus, VisualizerKind};

struct Harness<S> {
    controller: ExecutionController<S>,
    reporter: Arc<MemoryReporter>,
    sink: Arc<RecordingSink>,
}

fn harness<S: algoviz_core::algorithms::Runnable>(
    kind: VisualizerKind,
    store: S,
    delay_ms: u64,
    reporter: MemoryReporter,
) -> Harness<S> {
    let reporter = Arc::new(reporter);
    let sink = Arc::new(RecordingSink::new());
    let controller = ExecutionController::new(kind, store, delay_ms, sink.clone(), reporter.clone());
    Harness {
        controller,
        reporter,
        sink,
    }
}

fn sorting_values(values: &[i64]) -> SequenceStore {
    SequenceStore::with_values(
        values.to_vec(),
        0,
        SequenceGenerator::Random {
            len: values.len(),
            min: 10,
            max: 310,
        },
    )
}

fn sorted(values: &[i64]) -> Vec<i64> {
    let mut v = values.to_vec();
    v.sort_unstable();
    v
}

#[tokio::test(start_paused = true)]
async fn every_sort_completes_sorted_and_reports() {
    for algorithm in VisualizerKind::Sorting.algorithms() {
        let h = harness(
            VisualizerKind::Sorting,
            SequenceStore::sorting(&SortingConfig::default()),
            1,
            MemoryReporter::new(),
        );
        let before = h.controller.snapshot().sequence().unwrap().values.clone();

        let outcome = h.controller.start(*algorithm).unwrap().wait().await.unwrap();
        assert_eq!(outcome.end(), RunEnd::Completed, "{algorithm}");

        let after = h.controller.snapshot().sequence().unwrap().values.clone();
        assert_eq!(after, sorted(&before), "{algorithm}");

        let records = h.reporter.records();
        assert_eq!(records.len(), 1, "{algorithm}");
        assert_eq!(records[0].algorithm, *algorithm);
        assert_eq!(records[0].input_size, 50);
    }
}

#[tokio::test(start_paused = true)]
async fn bubble_scenario_counts() {
    let h = harness(
        VisualizerKind::Sorting,
        sorting_values(&[5, 3, 8, 1]),
        100,
        MemoryReporter::new(),
    );
    let outcome = h.controller.start(AlgorithmKind::BubbleSort).unwrap().wait().await.unwrap();

    let RunOutcome::Completed(metrics) = outcome else {
        panic!("bubble sort should complete");
    };
    assert_eq!(metrics.comparisons, 6);
    assert_eq!(metrics.swaps, 4);
    // Four swap steps at 100ms each.
    assert!(metrics.elapsed_ms >= 400);
}

#[tokio::test(start_paused = true)]
async fn snapshots_are_ordered_and_end_idle() {
    let h = harness(
        VisualizerKind::Sorting,
        sorting_values(&[4, 3, 2, 1]),
        10,
        MemoryReporter::new(),
    );
    let handle = h.controller.start(AlgorithmKind::BubbleSort).unwrap();
    let run_id = handle.run_id();
    handle.wait().await.unwrap();

    let frames = h.sink.frames();
    let steps: Vec<u64> = frames.iter().map(|s| s.step).collect();
    assert!(steps.windows(2).all(|w| w[0] < w[1]));
    assert!(frames.iter().all(|s| s.run_id == Some(run_id)));

    // Initial frame, six swaps, final idle frame.
    assert_eq!(frames.len(), 8);
    assert!(frames[..7].iter().all(|s| s.is_running(AlgorithmKind::BubbleSort)));
    let last = frames.last().unwrap();
    assert_eq!(last.status, RunStatus::Idle);
    assert_eq!(last.algorithm, None);
    assert_eq!(last.metrics.swaps, 6);
}

#[tokio::test(start_paused = true)]
async fn cancelled_run_is_never_reported() {
    let input: Vec<i64> = (10..60).rev().collect();
    let h = harness(
        VisualizerKind::Sorting,
        sorting_values(&input),
        100,
        MemoryReporter::new(),
    );
    let handle = h.controller.start(AlgorithmKind::BubbleSort).unwrap();

    tokio::time::sleep(Duration::from_millis(550)).await;
    assert!(h.controller.is_running());
    assert!(h.controller.cancel());
    assert!(h.controller.cancel(), "cancel is idempotent while running");

    let outcome = handle.wait().await.unwrap();
    assert_eq!(outcome.end(), RunEnd::Cancelled);
    assert_eq!(h.reporter.attempts(), 0);
    assert_eq!(h.controller.status(), RunStatus::Idle);
    assert!(!h.controller.cancel());

    // Partially sorted, but still a permutation of the input.
    let values = h.controller.snapshot().sequence().unwrap().values.clone();
    assert_ne!(values, input);
    assert_eq!(sorted(&values), sorted(&input));
}

#[tokio::test(start_paused = true)]
async fn cancelled_merge_and_radix_leave_a_permutation() {
    let input = [38, 27, 43, 3, 9, 82, 10, 55];
    // Off the 10ms step grid, so the cancel lands inside a pause.
    for algorithm in [AlgorithmKind::MergeSort, AlgorithmKind::RadixSort] {
        for wait_ms in [5, 105, 205] {
            let h = harness(
                VisualizerKind::Sorting,
                sorting_values(&input),
                10,
                MemoryReporter::new(),
            );
            let handle = h.controller.start(algorithm).unwrap();
            tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            assert!(h.controller.cancel(), "{algorithm} after {wait_ms}ms");

            let outcome = handle.wait().await.unwrap();
            assert_eq!(outcome.end(), RunEnd::Cancelled, "{algorithm} after {wait_ms}ms");
            assert_eq!(h.reporter.attempts(), 0);

            let values = h.controller.snapshot().sequence().unwrap().values.clone();
            assert_eq!(sorted(&values), sorted(&input), "{algorithm} after {wait_ms}ms");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn quick_sort_halves_stop_together() {
    // Pivot 20 splits the rest into two 20-element halves that both swap.
    let input: Vec<i64> = (0..20).rev().chain(21..41).chain([20]).collect();
    let h = harness(
        VisualizerKind::Sorting,
        sorting_values(&input),
        10,
        MemoryReporter::new(),
    );
    let handle = h.controller.start(AlgorithmKind::QuickSort).unwrap();

    // The top partition is 21 swaps (210ms); stop well inside both halves.
    tokio::time::sleep(Duration::from_millis(255)).await;
    let before_cancel = h.sink.frames();
    let cursors: Vec<usize> = before_cancel
        .iter()
        .skip(22)
        .filter_map(|s| s.sequence().and_then(|v| v.cursor))
        .collect();
    assert!(cursors.iter().any(|&c| c < 20), "left half has stepped");
    assert!(cursors.iter().any(|&c| c > 20), "right half has stepped");

    assert!(h.controller.cancel());
    let outcome = handle.wait().await.unwrap();
    assert_eq!(outcome.end(), RunEnd::Cancelled);
    assert_eq!(h.reporter.attempts(), 0);

    let values = h.controller.snapshot().sequence().unwrap().values.clone();
    assert_eq!(sorted(&values), sorted(&input));

    // Both halves were paused; the only frame after the cancel is idle.
    let after_cancel = &h.sink.frames()[before_cancel.len()..];
    assert!(after_cancel.len() <= 1);
    assert!(after_cancel.iter().all(|s| s.status == RunStatus::Idle));
}

#[tokio::test(start_paused = true)]
async fn cancelled_flag_does_not_leak_into_next_run() {
    let h = harness(
        VisualizerKind::Sorting,
        sorting_values(&[9, 8, 7, 6, 5, 4, 3, 2, 1]),
        50,
        MemoryReporter::new(),
    );
    let first = h.controller.start(AlgorithmKind::QuickSort).unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    h.controller.cancel();
    assert_eq!(first.wait().await.unwrap().end(), RunEnd::Cancelled);

    let second = h.controller.start(AlgorithmKind::MergeSort).unwrap();
    assert_eq!(second.wait().await.unwrap().end(), RunEnd::Completed);
    assert_eq!(h.reporter.records().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn controls_are_refused_while_running() {
    let h = harness(
        VisualizerKind::Sorting,
        SequenceStore::sorting(&SortingConfig::default()),
        100,
        MemoryReporter::new(),
    );
    let handle = h.controller.start(AlgorithmKind::MergeSort).unwrap();

    let busy = ControlError::AlreadyRunning {
        visualizer: VisualizerKind::Sorting,
    };
    assert_eq!(
        h.controller.start(AlgorithmKind::BubbleSort).map(|h| h.run_id()),
        Err(busy.clone())
    );
    assert_eq!(h.controller.set_speed(50), Err(busy.clone()));
    assert_eq!(h.controller.regenerate(), Err(busy.clone()));
    assert_eq!(h.controller.load_values(vec![1, 2, 3]), Err(busy));

    h.controller.cancel();
    handle.wait().await.unwrap();
    assert!(h.controller.set_speed(50).is_ok());
    assert_eq!(h.controller.delay_ms(), 50);
}

#[tokio::test(start_paused = true)]
async fn speed_is_bounded_per_visualizer() {
    let h = harness(
        VisualizerKind::Searching,
        SequenceStore::searching(&SearchingConfig::default()),
        200,
        MemoryReporter::new(),
    );
    assert_eq!(
        h.controller.set_speed(10),
        Err(ControlError::SpeedOutOfRange {
            value: 10,
            min: 50,
            max: 500
        })
    );
    assert!(h.controller.set_speed(500).is_ok());
    assert_eq!(h.controller.snapshot().delay_ms, 500);
}

#[tokio::test(start_paused = true)]
async fn radix_rejects_invalid_input_before_running() {
    let h = harness(
        VisualizerKind::Sorting,
        sorting_values(&[0, 0, 0]),
        1,
        MemoryReporter::new(),
    );
    assert!(matches!(
        h.controller.start(AlgorithmKind::RadixSort),
        Err(ControlError::InvalidInput(_))
    ));
    assert_eq!(h.controller.status(), RunStatus::Idle);

    h.controller.load_values(vec![12, -4, 7]).unwrap();
    assert!(matches!(
        h.controller.start(AlgorithmKind::RadixSort),
        Err(ControlError::InvalidInput(_))
    ));
    assert!(h.sink.frames().iter().all(|s| s.status == RunStatus::Idle));
}

#[tokio::test(start_paused = true)]
async fn reporting_failure_still_completes() {
    let h = harness(
        VisualizerKind::Sorting,
        sorting_values(&[3, 1, 2]),
        1,
        MemoryReporter::failing(),
    );
    let outcome = h.controller.start(AlgorithmKind::MergeSort).unwrap().wait().await.unwrap();
    assert_eq!(outcome.end(), RunEnd::Completed);
    assert_eq!(h.reporter.attempts(), 1);
    assert_eq!(h.controller.status(), RunStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn binary_search_scenario() {
    let h = harness(
        VisualizerKind::Searching,
        SequenceStore::searching(&SearchingConfig::default()),
        200,
        MemoryReporter::new(),
    );
    let outcome = h.controller.start(AlgorithmKind::BinarySearch).unwrap().wait().await.unwrap();
    let RunOutcome::Completed(metrics) = outcome else {
        panic!("search should complete");
    };
    assert!(metrics.comparisons <= 5);
    assert_eq!(metrics.swaps, 0);
    assert_eq!(h.controller.snapshot().sequence().unwrap().found, Some(8));

    // A new target clears the old hit.
    h.controller.set_target(105).unwrap();
    assert_eq!(h.controller.snapshot().sequence().unwrap().found, None);
    h.controller.start(AlgorithmKind::LinearSearch).unwrap().wait().await.unwrap();
    assert_eq!(h.controller.snapshot().sequence().unwrap().found, Some(19));
    assert_eq!(h.reporter.records()[1].comparisons, 20);
}

#[tokio::test(start_paused = true)]
async fn dijkstra_scenario_and_grid_edits() {
    let grid = GridStore::new(&PathfindingConfig::default()).unwrap();
    let h = harness(VisualizerKind::Pathfinding, grid, 10, MemoryReporter::new());

    assert_eq!(
        h.controller.toggle_wall(7, 5),
        Err(ControlError::ProtectedCell { row: 7, col: 5 })
    );
    assert!(matches!(
        h.controller.toggle_wall(0, 99),
        Err(ControlError::CellOutOfBounds { .. })
    ));
    assert_eq!(h.controller.toggle_wall(0, 0), Ok(true));

    let outcome = h.controller.start(AlgorithmKind::Dijkstra).unwrap().wait().await.unwrap();
    let RunOutcome::Completed(metrics) = outcome else {
        panic!("dijkstra should complete");
    };
    assert_eq!(metrics.input_size, 375);
    assert_eq!(metrics.swaps, 0);
    assert!(metrics.visits <= 375);
    assert_eq!(metrics.comparisons, metrics.visits);

    let grid = h.controller.snapshot().grid().cloned().unwrap();
    assert_eq!(grid.nodes.iter().filter(|n| n.is_path).count(), 16);
    assert!(grid.nodes.iter().all(|n| !(n.is_wall && (n.is_start || n.is_end))));

    // Clearing the path keeps walls; clearing walls twice equals once.
    h.controller.clear_path().unwrap();
    let cleared = h.controller.snapshot().grid().cloned().unwrap();
    assert!(cleared.nodes.iter().all(|n| !n.is_path && !n.is_visited));
    assert_eq!(cleared.nodes.iter().filter(|n| n.is_wall).count(), 1);

    h.controller.clear_walls().unwrap();
    let once = h.controller.snapshot().store;
    h.controller.clear_walls().unwrap();
    assert_eq!(h.controller.snapshot().store, once);
}

#[tokio::test(start_paused = true)]
async fn regenerate_resets_pathfinding_grid() {
    let grid = GridStore::new(&PathfindingConfig::default()).unwrap();
    let h = harness(VisualizerKind::Pathfinding, grid, 10, MemoryReporter::new());
    h.controller.set_wall(3, 3, true).unwrap();
    h.controller.regenerate().unwrap();
    let grid = h.controller.snapshot().grid().cloned().unwrap();
    assert!(grid.nodes.iter().all(|n| !n.is_wall));
}
