//! Binary search over an ascending sequence.

use std::cmp::Ordering;

use crate::cancel::Interrupted;
use crate::step::StepContext;
use crate::store::SequenceStore;

/// Halve the inclusive window `[left, right]` until the target is hit or
/// the window is empty.
pub async fn run(ctx: &StepContext<SequenceStore>) -> Result<(), Interrupted> {
    let (len, target) = ctx.with_store(|s| (s.len(), s.target()));
    let mut left = 0_usize;
    let Some(mut right) = len.checked_sub(1) else {
        return Ok(());
    };

    while left <= right {
        ctx.checkpoint()?;
        let mid = left.saturating_add(right.saturating_sub(left) / 2);
        let value = ctx.with_store(|s| {
            s.set_cursor(Some(mid));
            s.get(mid)
        });
        ctx.metrics().visit();
        ctx.publish_and_wait().await?;

        let Some(value) = value else {
            break;
        };
        match value.cmp(&target) {
            Ordering::Equal => {
                ctx.with_store(|s| s.mark_found(mid));
                break;
            }
            Ordering::Less => left = mid.saturating_add(1),
            Ordering::Greater => match mid.checked_sub(1) {
                Some(r) => right = r,
                None => break,
            },
        }
    }

    ctx.with_store(|s| s.set_cursor(None));
    Ok(())
}
