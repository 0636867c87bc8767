//! Quick sort with Lomuto partitioning.
//!
//! The pivot is the last element of the range. After partitioning, both
//! halves are driven concurrently as joined futures in the same task. They
//! touch disjoint ranges and each step holds the store lock only for its
//! synchronous body, so totals match the sequential algorithm.

use futures::future::{BoxFuture, FutureExt};

use crate::cancel::Interrupted;
use crate::step::StepContext;
use crate::store::SequenceStore;

use super::swap_step;

/// Sort the whole sequence.
pub async fn run(ctx: &StepContext<SequenceStore>) -> Result<(), Interrupted> {
    let n = ctx.with_store(|s| s.len());
    if let Some(hi) = n.checked_sub(1) {
        sort_range(ctx, 0, hi).await?;
    }
    ctx.with_store(|s| s.set_cursor(None));
    Ok(())
}

/// Sort `lo..=hi`.
fn sort_range(
    ctx: &StepContext<SequenceStore>,
    lo: usize,
    hi: usize,
) -> BoxFuture<'_, Result<(), Interrupted>> {
    async move {
        ctx.checkpoint()?;
        if lo >= hi {
            return Ok(());
        }
        let pivot = partition(ctx, lo, hi).await?;

        let left = async {
            match pivot.checked_sub(1) {
                Some(end) if end > lo => sort_range(ctx, lo, end).await,
                _ => Ok(()),
            }
        };
        let right = async {
            match pivot.checked_add(1) {
                Some(start) if start < hi => sort_range(ctx, start, hi).await,
                _ => Ok(()),
            }
        };
        let (l, r) = futures::join!(left, right);
        l.and(r)
    }
    .boxed()
}

/// Partition `lo..=hi` around the value at `hi`; returns the pivot's final
/// index.
async fn partition(
    ctx: &StepContext<SequenceStore>,
    lo: usize,
    hi: usize,
) -> Result<usize, Interrupted> {
    let pivot = ctx.with_store(|s| s.get(hi)).unwrap_or_default();
    let mut boundary = lo;

    for j in lo..hi {
        ctx.checkpoint()?;
        let less = ctx.with_store(|s| {
            s.set_cursor(Some(j));
            s.get(j).is_some_and(|v| v < pivot)
        });
        ctx.metrics().compare();
        if less {
            swap_step(ctx, boundary, j).await?;
            boundary = boundary.saturating_add(1);
        }
    }

    swap_step(ctx, boundary, hi).await?;
    Ok(boundary)
}

#[cfg(test)]
mod tests {
    use algoviz_types::AlgorithmKind;

    use super::*;
    use crate::algorithms::test_support::{assert_sorted_permutation, sorting, values};

    /// Plain sequential Lomuto quick sort returning (comparisons, swaps).
    fn reference_counts(values: &mut [i64]) -> (u64, u64) {
        fn sort(v: &mut [i64], counts: &mut (u64, u64)) {
            let Some(hi) = v.len().checked_sub(1) else {
                return;
            };
            if hi == 0 {
                return;
            }
            let pivot = v.get(hi).copied().unwrap_or_default();
            let mut boundary = 0;
            for j in 0..hi {
                counts.0 += 1;
                if v.get(j).is_some_and(|x| *x < pivot) {
                    v.swap(boundary, j);
                    counts.1 += 1;
                    boundary += 1;
                }
            }
            v.swap(boundary, hi);
            counts.1 += 1;
            let (left, right) = v.split_at_mut(boundary);
            sort(left, counts);
            sort(right.get_mut(1..).unwrap_or_default(), counts);
        }
        let mut counts = (0, 0);
        sort(values, &mut counts);
        counts
    }

    #[tokio::test]
    async fn sorts_and_matches_sequential_counts() {
        let input = [38, 27, 43, 3, 9, 82, 10, 27, 55, 1, 300, 12];
        let (ctx, sink, _) = sorting(&input, AlgorithmKind::QuickSort);
        assert_eq!(run(&ctx).await, Ok(()));
        assert_sorted_permutation(&input, &values(&ctx));

        let mut copy = input;
        let (comparisons, swaps) = reference_counts(&mut copy);
        assert_eq!(ctx.metrics().comparisons(), comparisons);
        assert_eq!(ctx.metrics().swaps(), swaps);
        assert_eq!(sink.frames().len() as u64, swaps);
    }

    #[tokio::test]
    async fn handles_trivial_inputs() {
        for input in [&[][..], &[42][..], &[2, 1][..]] {
            let (ctx, _, _) = sorting(input, AlgorithmKind::QuickSort);
            assert_eq!(run(&ctx).await, Ok(()));
            assert_sorted_permutation(input, &values(&ctx));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_start_publishes_nothing() {
        let input: Vec<i64> = (0..40).rev().collect();
        let (ctx, sink, cancel) = sorting(&input, AlgorithmKind::QuickSort);
        cancel.cancel();
        assert_eq!(run(&ctx).await, Err(Interrupted));
        assert!(sink.frames().is_empty());
    }
}
