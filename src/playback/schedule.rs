//! Deferred playback ticks
//!
//! Playback runs on the UI thread: each tick is a deferred call that the
//! event loop fires once its deadline passes. Every scheduled tick gets a
//! fresh handle; a handle that was cancelled or superseded never fires.

use std::time::{Duration, Instant};

use tracing::debug;

/// Identifies one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

#[derive(Debug, Clone, Copy)]
struct ScheduledTick {
    handle: TickHandle,
    due: Instant,
}

/// Holds at most one pending tick
#[derive(Debug, Default)]
pub struct TickScheduler {
    /// Monotonic id for the next handle
    next_id: u64,
    pending: Option<ScheduledTick>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a tick `delay` after `now`, superseding any pending one
    pub fn schedule(&mut self, now: Instant, delay: Duration) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        if let Some(previous) = self.pending.replace(ScheduledTick {
            handle,
            due: now + delay,
        }) {
            debug!("Tick {:?} superseded by {:?}", previous.handle, handle);
        }
        handle
    }

    /// Cancel `handle` if it is still pending; returns whether it was
    pub fn cancel(&mut self, handle: TickHandle) -> bool {
        match self.pending {
            Some(tick) if tick.handle == handle => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, handle: TickHandle) -> bool {
        self.pending.is_some_and(|tick| tick.handle == handle)
    }

    /// When the pending tick is due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|tick| tick.due)
    }

    /// Take the pending tick if its deadline has passed
    pub fn fire_due(&mut self, now: Instant) -> Option<TickHandle> {
        match self.pending {
            Some(tick) if tick.due <= now => {
                self.pending = None;
                Some(tick.handle)
            }
            _ => None,
        }
    }
}
