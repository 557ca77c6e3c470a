/// Cooperative cancellation for long-running comparisons.
///
/// A [`CancellationToken`] is cheap to clone; all clones observe the same
/// flag, so one can be handed to another thread (a UI, a watchdog) while the
/// comparison polls it.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CompareError;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Returns [`CompareError::Cancelled`] once cancellation was requested.
    ///
    /// # Errors
    ///
    /// [`CompareError::Cancelled`] if [`cancel`][Self::cancel] has been called
    /// on this token or any clone of it.
    pub fn check(&self) -> Result<(), CompareError> {
        if self.is_cancelled() {
            Err(CompareError::Cancelled)
        } else {
            Ok(())
        }
    }
}
