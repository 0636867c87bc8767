//! Step pacing.
//!
//! Every observable step ends with a pause so a human can follow the
//! animation. The pause length is taken from the visualizer's speed setting
//! when the run starts and stays fixed for the run.

use std::time::Duration;

/// Sleeps between observable steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayScheduler {
    step: Duration,
}

impl DelayScheduler {
    /// A scheduler pausing `delay_ms` milliseconds per step.
    pub const fn from_millis(delay_ms: u64) -> Self {
        Self {
            step: Duration::from_millis(delay_ms),
        }
    }

    /// The full per-step pause.
    pub const fn full(&self) -> Duration {
        self.step
    }

    /// Half the per-step pause, used for the distribution pass of radix sort.
    pub fn half(&self) -> Duration {
        self.step / 2
    }

    /// Suspend for `duration`. A zero duration still yields to the runtime
    /// so a busy run cannot starve the control plane.
    pub async fn wait(duration: Duration) {
        if duration.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_step_rounds_down() {
        let delay = DelayScheduler::from_millis(25);
        assert_eq!(delay.full(), Duration::from_millis(25));
        assert_eq!(delay.half(), Duration::from_micros(12_500));
        assert_eq!(DelayScheduler::from_millis(0).half(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_advances_virtual_time() {
        let before = tokio::time::Instant::now();
        DelayScheduler::wait(Duration::from_millis(40)).await;
        assert!(before.elapsed() >= Duration::from_millis(40));
    }
}
