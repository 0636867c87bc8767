//! Least-significant-digit radix sort over ten buckets.
//!
//! Input must be non-negative with a positive maximum; the store checks
//! this before the run starts.

use crate::cancel::Interrupted;
use crate::step::StepContext;
use crate::store::SequenceStore;

use super::write_step;

const RADIX: i64 = 10;

/// Number of decimal digits in `max`; zero for non-positive values.
fn digit_count(max: i64) -> u32 {
    max.checked_ilog10().map_or(0, |d| d.saturating_add(1))
}

/// Sort the whole sequence.
pub async fn run(ctx: &StepContext<SequenceStore>) -> Result<(), Interrupted> {
    let values = ctx.with_store(|s| s.values().to_vec());
    let max = values.iter().copied().max().unwrap_or_default();

    for place in 0..digit_count(max) {
        ctx.checkpoint()?;
        let divisor = RADIX.checked_pow(place).unwrap_or(i64::MAX);
        let mut buckets: Vec<Vec<i64>> = vec![Vec::new(); 10];

        // Distribution: one comparison and a half-length step per element.
        let len = ctx.with_store(|s| s.len());
        for i in 0..len {
            ctx.checkpoint()?;
            let value = ctx.with_store(|s| {
                s.set_cursor(Some(i));
                s.get(i).unwrap_or_default()
            });
            let digit = value.checked_div(divisor).unwrap_or_default().rem_euclid(RADIX);
            if let Some(bucket) = usize::try_from(digit).ok().and_then(|d| buckets.get_mut(d)) {
                bucket.push(value);
            }
            ctx.metrics().compare();
            ctx.publish_and_wait_half().await?;
        }

        // Collection: every write back is a counted full step.
        let collected: Vec<i64> = buckets.into_iter().flatten().collect();
        for (index, &value) in collected.iter().enumerate() {
            if let Err(stop) = collect_step(ctx, index, value).await {
                ctx.with_store(|s| settle(s, &collected, index));
                return Err(stop);
            }
        }
    }

    ctx.with_store(|s| s.set_cursor(None));
    Ok(())
}

async fn collect_step(
    ctx: &StepContext<SequenceStore>,
    index: usize,
    value: i64,
) -> Result<(), Interrupted> {
    ctx.checkpoint()?;
    write_step(ctx, index, value).await
}

/// Write the rest of a pass's collection without counting or publishing.
fn settle(store: &mut SequenceStore, collected: &[i64], from: usize) {
    for (index, &value) in collected.iter().enumerate().skip(from) {
        store.set(index, value);
    }
}
