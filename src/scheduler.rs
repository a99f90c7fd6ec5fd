//! Virtual-time timer queue.
//!
//! The clock/timer source for the simulation driver.  Timers are periodic,
//! cancelable, and fire in virtual milliseconds supplied by the caller, so
//! the same queue runs under a wall clock (host binary) or a stepped clock
//! (tests).
//!
//! ```text
//!  SimulationDriver ──schedule_every()──▶ ┌──────────────┐
//!                   ◀──────cancel()────── │  TimerQueue  │
//!                                         │  (4 slots)   │
//!  MotorStarter ────pop_due(until)──────▶ └──────┬───────┘
//!        ▲                                       │
//!        └──────────── TimerFired ───────────────┘
//! ```
//!
//! Firing is pull-based: the owner pops one due timer at a time, dispatches
//! it, lets the driver re-arm or cancel timers, and only then pops the next.
//! A timer cancelled by a dispatch therefore never fires afterwards.

use heapless::Vec;
use log::{debug, warn};

/// Maximum number of concurrently armed timers.
const MAX_TIMERS: usize = 4;

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Acceleration ramp sample.
    AccelSample,
    /// Deceleration ramp sample.
    DecelSample,
    /// Runtime accounting tick.
    RuntimeTick,
}

/// Handle returned by [`TimerQueue::schedule_every`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u32);

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub id: TimerId,
    pub kind: TimerKind,
    /// Virtual time at which the timer was due.
    pub at_ms: u64,
}

/// Internal bookkeeping for an armed timer.
#[derive(Debug, Clone)]
struct TimerEntry {
    id: TimerId,
    kind: TimerKind,
    period_ms: u64,
    next_due_ms: u64,
}

/// Fixed-capacity periodic timer queue.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<TimerEntry, MAX_TIMERS>,
    next_id: u32,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a periodic timer that first fires `period_ms` after `now_ms`.
    ///
    /// Returns `None` when every slot is taken, the period is zero, or the
    /// first fire would lie past the end of the clock.
    pub fn schedule_every(&mut self, kind: TimerKind, period_ms: u32, now_ms: u64) -> Option<TimerId> {
        if period_ms == 0 {
            warn!("Timer: refusing zero period for {:?}", kind);
            return None;
        }
        let Some(next_due_ms) = now_ms.checked_add(u64::from(period_ms)) else {
            warn!("Timer: {:?} would fire past the end of the clock", kind);
            return None;
        };
        let id = TimerId(self.next_id);
        let entry = TimerEntry {
            id,
            kind,
            period_ms: u64::from(period_ms),
            next_due_ms,
        };
        if self.timers.push(entry).is_err() {
            warn!("Timer: all {} slots full, {:?} not armed", MAX_TIMERS, kind);
            return None;
        }
        self.next_id = self.next_id.wrapping_add(1);
        debug!("Timer: armed {:?} #{} every {} ms", kind, id.0, period_ms);
        Some(id)
    }

    /// Disarm a timer.  Unknown ids are ignored.
    pub fn cancel(&mut self, id: TimerId) {
        if let Some(pos) = self.timers.iter().position(|t| t.id == id) {
            let entry = self.timers.remove(pos);
            debug!("Timer: cancelled {:?} #{}", entry.kind, id.0);
        }
    }

    /// Disarm every timer.
    pub fn cancel_all(&mut self) {
        if !self.timers.is_empty() {
            debug!("Timer: cancelled all ({} armed)", self.timers.len());
        }
        self.timers.clear();
    }

    /// Earliest due time among armed timers.
    pub fn next_due(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.next_due_ms).min()
    }

    /// Pop the earliest timer due at or before `until_ms` and re-arm it.
    ///
    /// Ties go to the timer armed first.  A timer whose next period would
    /// overflow the clock fires once more and is then disarmed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerFired> {
        let pos = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.next_due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.next_due_ms, t.id))
            .map(|(pos, _)| pos)?;

        let entry = &mut self.timers[pos];
        let fired = TimerFired {
            id: entry.id,
            kind: entry.kind,
            at_ms: entry.next_due_ms,
        };
        match entry.next_due_ms.checked_add(entry.period_ms) {
            Some(next) => entry.next_due_ms = next,
            None => {
                debug!("Timer: {:?} #{} reached the end of the clock", fired.kind, fired.id.0);
                self.timers.remove(pos);
            }
        }
        Some(fired)
    }

    /// Whether a timer is armed.
    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of armed timers.
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }
}
