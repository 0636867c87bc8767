//! Bubble sort.

use crate::cancel::Interrupted;
use crate::step::StepContext;
use crate::store::SequenceStore;

use super::swap_step;

/// Adjacent compare-and-swap passes. The unsorted prefix shrinks by one per
/// pass and there is no early exit on a pass without swaps.
pub async fn run(ctx: &StepContext<SequenceStore>) -> Result<(), Interrupted> {
    let n = ctx.with_store(|s| s.len());
    for pass in 0..n {
        let bound = n.saturating_sub(pass).saturating_sub(1);
        for j in 0..bound {
            ctx.checkpoint()?;
            let next = j.saturating_add(1);
            let out_of_order = ctx.with_store(|s| {
                s.set_cursor(Some(j));
                matches!((s.get(j), s.get(next)), (Some(a), Some(b)) if a > b)
            });
            ctx.metrics().compare();
            if out_of_order {
                swap_step(ctx, j, next).await?;
            }
        }
    }
    ctx.with_store(|s| s.set_cursor(None));
    Ok(())
}

#[cfg(test)]
mod tests {
    use algoviz_types::AlgorithmKind;

    use super::*;
    use crate::algorithms::test_support::{assert_sorted_permutation, sorting, values};

    #[tokio::test]
    async fn sorts_small_input_with_exact_counts() {
        let (ctx, sink, _) = sorting(&[5, 3, 8, 1], AlgorithmKind::BubbleSort);
        assert_eq!(run(&ctx).await, Ok(()));
        assert_eq!(values(&ctx), vec![1, 3, 5, 8]);
        assert_eq!(ctx.metrics().comparisons(), 6);
        assert_eq!(ctx.metrics().swaps(), 4);
        // One published step per swap.
        assert_eq!(sink.frames().len(), 4);
    }

    #[tokio::test]
    async fn sorted_input_never_swaps() {
        let (ctx, sink, _) = sorting(&[1, 2, 3, 4, 5], AlgorithmKind::BubbleSort);
        assert_eq!(run(&ctx).await, Ok(()));
        assert_eq!(ctx.metrics().comparisons(), 10);
        assert_eq!(ctx.metrics().swaps(), 0);
        assert!(sink.frames().is_empty());
    }

    #[tokio::test]
    async fn keeps_duplicates() {
        let input = [7, 3, 7, 1, 3, 3];
        let (ctx, _, _) = sorting(&input, AlgorithmKind::BubbleSort);
        assert_eq!(run(&ctx).await, Ok(()));
        assert_sorted_permutation(&input, &values(&ctx));
    }

    #[tokio::test]
    async fn cancelled_before_start_leaves_input() {
        let (ctx, _, cancel) = sorting(&[3, 2, 1], AlgorithmKind::BubbleSort);
        cancel.cancel();
        assert_eq!(run(&ctx).await, Err(Interrupted));
        assert_eq!(values(&ctx), vec![3, 2, 1]);
    }
}
