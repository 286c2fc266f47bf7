//! Run guard — at most one scheduled batch in flight.
//!
//! Two states, idle and running, held in an atomic flag. Acquisition hands
//! back a [`RunPermit`] that releases on drop, so the guard returns to idle
//! on every exit path of a batch run, including panics.

use std::sync::atomic::{AtomicBool, Ordering};

/// Mutual-exclusion state for the scheduled batch.
#[derive(Debug, Default)]
pub struct RunGuard {
    running: AtomicBool,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to transition idle → running.
    ///
    /// Returns `None` when a run is already active; the caller skips its
    /// run (no backlog, no queuing).
    pub fn try_acquire(&self) -> Option<RunPermit<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunPermit { guard: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Scoped proof that the guard is held. Dropping it releases the guard.
#[derive(Debug)]
pub struct RunPermit<'a> {
    guard: &'a RunGuard,
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::SeqCst);
    }
}
