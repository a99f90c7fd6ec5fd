//! Host clock adapter.
//!
//! Monotonic milliseconds from `std::time::Instant`, measured from the
//! moment the adapter is created.

use std::time::Instant;

use crate::app::ports::ClockPort;

/// Wall-clock time source for the real-time runner.
#[derive(Debug, Clone, Copy)]
pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds since the adapter was created.
    pub fn uptime_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl ClockPort for HostClock {
    fn now_ms(&self) -> u64 {
        self.uptime_ms()
    }
}

/// Clock that only moves when told to.  Drives the runner in
/// fast-forward mode and stands in for the host clock under test.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now_ms: std::cell::Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to `now_ms`.  Earlier values are ignored.
    pub fn set(&self, now_ms: u64) {
        if now_ms > self.now_ms.get() {
            self.now_ms.set(now_ms);
        }
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(delta_ms));
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}
