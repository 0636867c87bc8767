//! Dijkstra's shortest path on a uniform-weight grid.
//!
//! Every node starts as a candidate in row-major order. Each iteration
//! stably re-sorts the candidates by tentative distance and settles the
//! nearest, so ties resolve by the candidates' current order. Walls are
//! skipped when popped. An infinite nearest distance means the rest of the
//! grid is unreachable and the search ends without a path.

use std::collections::VecDeque;

use crate::cancel::Interrupted;
use crate::step::StepContext;
use crate::store::GridStore;

enum Settle {
    Wall,
    Unreachable,
    Visited { is_end: bool },
}

/// Search from the start node until the end node is settled.
pub async fn run(ctx: &StepContext<GridStore>) -> Result<(), Interrupted> {
    let mut candidates: VecDeque<usize> = ctx.with_store(|g| (0..g.len()).collect());

    loop {
        ctx.checkpoint()?;
        let Some(current) = ctx.with_store(|g| {
            candidates
                .make_contiguous()
                .sort_by_key(|&i| g.distance(i).map_or(u64::MAX, u64::from));
            candidates.pop_front()
        }) else {
            break;
        };

        let settle = ctx.with_store(|g| {
            if g.is_wall(current) {
                Settle::Wall
            } else if g.distance(current).is_none() {
                Settle::Unreachable
            } else {
                g.mark_visited(current);
                Settle::Visited {
                    is_end: current == g.end(),
                }
            }
        });

        match settle {
            Settle::Wall => continue,
            Settle::Unreachable => break,
            Settle::Visited { is_end } => {
                ctx.metrics().visit();
                ctx.publish_and_wait().await?;
                if is_end {
                    // Reaching the end finishes the run; the path frame
                    // is published without a further delay.
                    ctx.with_store(GridStore::mark_path);
                    ctx.publish();
                    return Ok(());
                }
                ctx.with_store(|g| {
                    for next in g.neighbors(current) {
                        if !g.is_visited(next) {
                            g.relax(current, next);
                        }
                    }
                });
            }
        }
    }
    Ok(())
}
