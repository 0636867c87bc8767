//! Cooperative cancellation.
//!
//! A [`CancellationToken`] is a shared flag. The controller raises it; the
//! running algorithm polls it at every suspension point and unwinds with
//! [`Interrupted`] once it is set. Each run gets a fresh token, so a
//! cancelled flag never leaks into the next run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Marker error returned by an algorithm that observed its cancellation
/// token. Not a failure: the controller treats it as a normal stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("run interrupted by cancellation")]
pub struct Interrupted;

/// Shared cancellation flag for one run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not yet cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(Interrupted)` once cancellation has been requested.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] if the token is cancelled.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}
