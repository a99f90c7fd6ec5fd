//! Start interlocks and the overload relay.
//!
//! Two protective layers:
//!
//! 1. **Interlocks** are evaluated by the reducer on every start press.
//!    A failing interlock refuses the start and is reported as fault text.
//! 2. **The overload relay** runs after every simulation dispatch.  It
//!    watches the derived line current and winding temperature and, when a
//!    limit is exceeded, asks the service to dispatch
//!    [`Action::TripOverload`](crate::fsm::Action::TripOverload).
//!
//! ## Trip lifecycle
//!
//! 1. Current rises above the limit; the relay starts its trip timer.
//! 2. If the current is still above the limit when the delay expires (or
//!    the temperature limit is crossed at any time) the relay trips.
//! 3. The reducer latches `overload_tripped`; the relay stays quiet while
//!    the latch is set.
//! 4. `ResetOverload` clears the latch and the relay re-arms.

use core::fmt;

use log::{error, info};

use crate::config::StarterConfig;
use crate::error::Interlock;
use crate::fsm::MotorSnapshot;

/// Evaluate the start guards in priority order
/// (emergency > overload > breaker).
///
/// Returns the highest-priority failing interlock, or `None` when a start
/// is allowed.
pub fn start_interlock(snap: &MotorSnapshot) -> Option<Interlock> {
    if snap.is_emergency_stop_active {
        Some(Interlock::EmergencyActive)
    } else if snap.overload_tripped {
        Some(Interlock::OverloadTripped)
    } else if !snap.mcb_closed {
        Some(Interlock::McbOpen)
    } else {
        None
    }
}

/// Why the relay tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayTrip {
    /// Current above the limit for longer than the trip delay.
    OverCurrent,
    /// Winding temperature above the limit.
    OverTemperature,
}

impl fmt::Display for RelayTrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverCurrent => write!(f, "over-current"),
            Self::OverTemperature => write!(f, "over-temperature"),
        }
    }
}

/// Simulated thermal-magnetic overload relay.
#[derive(Debug, Clone)]
pub struct OverloadRelay {
    current_limit_a: f32,
    trip_delay_ms: u64,
    temperature_limit_c: f32,
    /// Timestamp at which the current first exceeded the limit.
    over_current_since_ms: Option<u64>,
}

impl OverloadRelay {
    pub fn new(config: &StarterConfig) -> Self {
        Self {
            current_limit_a: config.overload_current_limit_a,
            trip_delay_ms: u64::from(config.overload_trip_delay_ms),
            temperature_limit_c: config.overload_temperature_limit_c,
            over_current_since_ms: None,
        }
    }

    /// Evaluate the relay against the latest snapshot.
    pub fn evaluate(&mut self, snap: &MotorSnapshot, now_ms: u64) -> Option<RelayTrip> {
        if snap.overload_tripped {
            self.over_current_since_ms = None;
            return None;
        }

        if snap.motor_temperature > self.temperature_limit_c {
            error!(
                "OVERLOAD RELAY: winding at {:.1}\u{00b0}C > {:.1}\u{00b0}C",
                snap.motor_temperature, self.temperature_limit_c
            );
            self.over_current_since_ms = None;
            return Some(RelayTrip::OverTemperature);
        }

        if snap.system_current > self.current_limit_a {
            let since = *self.over_current_since_ms.get_or_insert_with(|| {
                info!(
                    "OVERLOAD RELAY: {:.2} A above {:.2} A limit, timing trip",
                    snap.system_current, self.current_limit_a
                );
                now_ms
            });
            if now_ms.saturating_sub(since) >= self.trip_delay_ms {
                error!(
                    "OVERLOAD RELAY: {:.2} A for {} ms, tripping",
                    snap.system_current,
                    now_ms.saturating_sub(since)
                );
                self.over_current_since_ms = None;
                return Some(RelayTrip::OverCurrent);
            }
        } else if self.over_current_since_ms.take().is_some() {
            info!("OVERLOAD RELAY: current back within limit");
        }

        None
    }

    /// Whether the relay is currently timing an over-current.
    pub fn is_timing(&self) -> bool {
        self.over_current_since_ms.is_some()
    }

    /// Drop any in-progress trip timing.
    pub fn reset(&mut self) {
        self.over_current_since_ms = None;
    }
}
