//! Top-down merge sort.

use std::iter::Peekable;
use std::vec::IntoIter;

use futures::future::{BoxFuture, FutureExt};

use crate::cancel::Interrupted;
use crate::step::StepContext;
use crate::store::SequenceStore;

use super::write_step;

/// Sort the whole sequence.
pub async fn run(ctx: &StepContext<SequenceStore>) -> Result<(), Interrupted> {
    let n = ctx.with_store(|s| s.len());
    if let Some(end) = n.checked_sub(1) {
        sort_range(ctx, 0, end).await?;
    }
    ctx.with_store(|s| s.set_cursor(None));
    Ok(())
}

/// Sort `start..=end`, left half first.
fn sort_range(
    ctx: &StepContext<SequenceStore>,
    start: usize,
    end: usize,
) -> BoxFuture<'_, Result<(), Interrupted>> {
    async move {
        ctx.checkpoint()?;
        if start >= end {
            return Ok(());
        }
        let mid = start.saturating_add(end.saturating_sub(start) / 2);
        sort_range(ctx, start, mid).await?;
        sort_range(ctx, mid.saturating_add(1), end).await?;
        merge(ctx, start, mid, end).await
    }
    .boxed()
}

/// The unmerged remainder of two sorted runs and the next slot to fill.
struct Pending {
    left: Peekable<IntoIter<i64>>,
    right: Peekable<IntoIter<i64>>,
    next: usize,
}

impl Pending {
    /// Take the smaller head, preferring the left run on ties. Once one
    /// run is empty this drains the other.
    fn take(&mut self) -> Option<i64> {
        match (self.left.peek().copied(), self.right.peek().copied()) {
            (Some(l), Some(r)) if r < l => self.right.next(),
            (Some(_), _) => self.left.next(),
            (None, _) => self.right.next(),
        }
    }

    fn both_nonempty(&mut self) -> bool {
        self.left.peek().is_some() && self.right.peek().is_some()
    }

    /// Write everything still buffered without counting or publishing, so
    /// an interrupted merge leaves a permutation behind.
    fn settle(&mut self, store: &mut SequenceStore) {
        while let Some(value) = self.take() {
            store.set(self.next, value);
            self.next = self.next.saturating_add(1);
        }
    }
}

/// Merge the sorted runs `start..=mid` and `mid+1..=end` back into place.
/// Every write, drains included, is one counted and published step.
async fn merge(
    ctx: &StepContext<SequenceStore>,
    start: usize,
    mid: usize,
    end: usize,
) -> Result<(), Interrupted> {
    let (left, right) = ctx.with_store(|s| {
        let values = s.values();
        let left = values.get(start..=mid).unwrap_or_default().to_vec();
        let right = values
            .get(mid.saturating_add(1)..=end)
            .unwrap_or_default()
            .to_vec();
        (left, right)
    });

    let mut pending = Pending {
        left: left.into_iter().peekable(),
        right: right.into_iter().peekable(),
        next: start,
    };
    let merged = merge_steps(ctx, &mut pending).await;
    if merged.is_err() {
        ctx.with_store(|s| pending.settle(s));
    }
    merged
}

async fn merge_steps(
    ctx: &StepContext<SequenceStore>,
    pending: &mut Pending,
) -> Result<(), Interrupted> {
    loop {
        ctx.checkpoint()?;
        if pending.both_nonempty() {
            ctx.metrics().compare();
        }
        let Some(value) = pending.take() else {
            return Ok(());
        };
        // The write lands before the step can be interrupted.
        let index = pending.next;
        pending.next = index.saturating_add(1);
        write_step(ctx, index, value).await?;
    }
}
