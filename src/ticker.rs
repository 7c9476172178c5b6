use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Fixed-interval tick source polled by the main loop.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last_tick: Instant,
}

impl Ticker {
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    /// Returns true, and re-arms from `now`, once a full interval has passed
    /// since the previous tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) < self.interval {
            return false;
        }

        self.last_tick = now;
        true
    }

    /// Restarts the interval from `now`, e.g. after a pause.
    pub fn reset(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// Time left until the next tick is due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }
}

/// Shared stop signal for the game loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
