//! Simulation driver.
//!
//! Watches the snapshot after every dispatch and keeps exactly the timers
//! the current phase needs armed:
//!
//! | Phase         | Timer         | On fire                           |
//! |---------------|---------------|-----------------------------------|
//! | STARTING      | accel sample  | `SetRpm(accel curve)`             |
//! | STOPPING      | decel sample  | `SetRpm(decel curve from v₀)`     |
//! | RUNNING       | runtime tick  | `TickRuntime`                     |
//! | anything else | none          |                                   |
//!
//! A phase is identified by `(motor_state, start_time_ms)`.  When that key
//! changes the old timer is cancelled before the new one is armed, so at
//! most one driver timer exists at any time.

use log::{debug, info, warn};

use super::ramp::RampProfile;
use crate::config::StarterConfig;
use crate::fsm::{Action, MotorSnapshot, MotorState};
use crate::scheduler::{TimerFired, TimerId, TimerKind, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PhaseKey {
    state: MotorState,
    start_time_ms: Option<u64>,
}

impl PhaseKey {
    fn of(snap: &MotorSnapshot) -> Self {
        Self {
            state: snap.motor_state,
            start_time_ms: snap.start_time_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Accelerating { since_ms: u64 },
    /// `from_rpm` is the rotor speed captured when stop was pressed.
    Decelerating { since_ms: u64, from_rpm: u32 },
    Running,
}

/// Turns motor phases into periodic simulation actions.
#[derive(Debug)]
pub struct SimulationDriver {
    profile: RampProfile,
    runtime_tick_ms: u32,
    key: PhaseKey,
    phase: Phase,
    timer: Option<TimerId>,
}

impl SimulationDriver {
    pub fn new(config: &StarterConfig) -> Self {
        Self {
            profile: RampProfile::from_config(config),
            runtime_tick_ms: config.runtime_tick_ms,
            key: PhaseKey {
                state: MotorState::Stopped,
                start_time_ms: None,
            },
            phase: Phase::Idle,
            timer: None,
        }
    }

    /// Re-align armed timers with the phase of `snap`.
    ///
    /// Call after every dispatch.  Does nothing while the phase key is
    /// unchanged, so sample dispatches never restart their own ramp.
    pub fn sync(&mut self, snap: &MotorSnapshot, timers: &mut TimerQueue, now_ms: u64) {
        let key = PhaseKey::of(snap);
        if key == self.key {
            return;
        }
        self.key = key;
        self.disarm(timers);

        let since_ms = snap.start_time_ms.unwrap_or(now_ms);
        self.phase = match snap.motor_state {
            MotorState::Starting => Phase::Accelerating { since_ms },
            MotorState::Stopping => Phase::Decelerating {
                since_ms,
                from_rpm: snap.motor_rpm,
            },
            MotorState::Running => Phase::Running,
            _ => Phase::Idle,
        };

        let (kind, period_ms) = match self.phase {
            Phase::Idle => {
                debug!("Sim: idle in {}", snap.motor_state);
                return;
            }
            Phase::Accelerating { .. } => (TimerKind::AccelSample, self.profile.accel_interval_ms),
            Phase::Decelerating { from_rpm, .. } => {
                info!(
                    "Sim: decelerating from {} RPM over {} ms",
                    from_rpm, self.profile.ramp_down_ms
                );
                (TimerKind::DecelSample, self.profile.decel_interval_ms)
            }
            Phase::Running => (TimerKind::RuntimeTick, self.runtime_tick_ms),
        };

        self.timer = timers.schedule_every(kind, period_ms, now_ms);
        if self.timer.is_none() {
            warn!("Sim: could not arm {:?} for {}", kind, snap.motor_state);
        }
    }

    /// Translate a fired timer into the action to dispatch.
    ///
    /// Returns `None` for timers the driver does not own.
    pub fn on_timer(&self, fired: &TimerFired, snap: &MotorSnapshot) -> Option<Action> {
        if self.timer != Some(fired.id) {
            return None;
        }
        match (fired.kind, self.phase) {
            (TimerKind::AccelSample, Phase::Accelerating { since_ms }) => {
                let elapsed = fired.at_ms.saturating_sub(since_ms);
                Some(Action::SetRpm(self.profile.accel_rpm(elapsed, snap.rated_rpm)))
            }
            (TimerKind::DecelSample, Phase::Decelerating { since_ms, from_rpm }) => {
                let elapsed = fired.at_ms.saturating_sub(since_ms);
                Some(Action::SetRpm(self.profile.decel_rpm(elapsed, from_rpm)))
            }
            (TimerKind::RuntimeTick, Phase::Running) => Some(Action::TickRuntime),
            (kind, phase) => {
                warn!("Sim: {:?} fired in {:?}, ignored", kind, phase);
                None
            }
        }
    }

    /// Whether a driver timer is armed.
    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Cancel the driver's timer and return to idle.
    ///
    /// The phase key is forgotten too, so a later `sync` re-arms from scratch.
    pub fn shutdown(&mut self, timers: &mut TimerQueue) {
        self.disarm(timers);
        self.phase = Phase::Idle;
        self.key = PhaseKey {
            state: MotorState::Stopped,
            start_time_ms: None,
        };
    }

    fn disarm(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
    }
}
