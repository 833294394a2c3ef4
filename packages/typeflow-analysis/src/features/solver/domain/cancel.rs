/*
 * Cancellation Token
 *
 * Cooperative budget enforcement. A token carries an optional wall-clock
 * deadline plus a manual cancel flag; the solver polls it once per worklist
 * iteration and unwinds cleanly with whatever it accumulated so far. No
 * thread is ever killed.
 *
 * Clones share the manual flag, so an orchestrator can hold a clone and
 * cancel an in-flight solve from outside.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CancellationToken {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Token that only cancels manually.
    pub fn unbounded() -> Self {
        Self {
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Token that expires `budget` from now. A zero budget expires at the
    /// first poll, which is how tests force deterministic timeouts.
    pub fn with_budget(budget: Duration) -> Self {
        Self::with_deadline(Instant::now() + budget)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Poll point. True once the deadline passed or `cancel` was called.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::unbounded()
    }
}
