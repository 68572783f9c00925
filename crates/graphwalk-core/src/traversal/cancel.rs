//! Cooperative cancellation for long traversals.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use graphwalk_common::utils::error::{Error, Result};

/// Shared stop signal plus an optional deadline.
///
/// Clones share the flag, so a token handed to a traversal can be cancelled
/// from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<(Instant, Duration)>,
}

impl CancelToken {
    /// A token that only stops on [`cancel`](Self::cancel).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also stops once `timeout` has elapsed from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline_after(timeout)
    }

    /// Adds a deadline `timeout` from now, keeping the shared flag.
    ///
    /// A timeout too large to represent as an instant sets no deadline.
    #[must_use]
    pub fn deadline_after(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now()
            .checked_add(timeout)
            .map(|at| (at, timeout));
        self
    }

    /// Signals every clone to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fails if the token was cancelled or its deadline passed.
    ///
    /// # Errors
    ///
    /// `Cancelled` or `Timeout`.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.deadline {
            Some((at, timeout)) if Instant::now() >= at => Err(Error::Timeout(timeout)),
            _ => Ok(()),
        }
    }
}
