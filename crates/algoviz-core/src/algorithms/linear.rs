//! Linear search.

use crate::cancel::Interrupted;
use crate::step::StepContext;
use crate::store::SequenceStore;

/// Visit indices in order until the target is found or the sequence ends.
pub async fn run(ctx: &StepContext<SequenceStore>) -> Result<(), Interrupted> {
    let (len, target) = ctx.with_store(|s| (s.len(), s.target()));

    for i in 0..len {
        ctx.checkpoint()?;
        let value = ctx.with_store(|s| {
            s.set_cursor(Some(i));
            s.get(i)
        });
        ctx.metrics().visit();
        ctx.publish_and_wait().await?;

        if value == Some(target) {
            ctx.with_store(|s| s.mark_found(i));
            break;
        }
    }

    ctx.with_store(|s| s.set_cursor(None));
    Ok(())
}
