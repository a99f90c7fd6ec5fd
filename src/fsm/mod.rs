//! Motor-state reducer.
//!
//! The single authoritative owner of control-circuit and power-circuit
//! state.  Every change goes through one pure function:
//!
//! ```text
//!   (MotorSnapshot, Action, now_ms) ──▶ transition() ──▶ MotorSnapshot'
//! ```
//!
//! The reducer schedules nothing and keeps no timers; time enters only as
//! the `now_ms` argument.  Snapshots are `Copy` values that are replaced
//! wholesale, never patched field-by-field.
//!
//! ```text
//!  STOPPED ──[start, guards ok]──▶ STARTING ──[rpm ≥ 95%]──▶ RUNNING
//!     ▲                               │                          │
//!     │                             [stop]                     [stop]
//!     │                               ▼                          │
//!     └─────────[rpm = 0]───────── STOPPING ◀────────────────────┘
//!
//!  any ──[e-stop]──▶ EMERGENCY_STOP ──[reset]──▶ STOPPED
//!  any ──[trip]────▶ OVERLOAD/FAULT ──[reset]──▶ STOPPED
//! ```

pub mod actions;
pub mod snapshot;
pub mod transitions;

use serde::{Deserialize, Serialize};

pub use actions::Action;
pub use snapshot::MotorSnapshot;
pub use transitions::transition;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all motor states.  Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum MotorState {
    Stopped = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
    Fault = 4,
    Overload = 5,
    EmergencyStop = 6,
}

impl MotorState {
    /// Total number of states.
    pub const COUNT: usize = 7;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Stopped,
        Self::Starting,
        Self::Running,
        Self::Stopping,
        Self::Fault,
        Self::Overload,
        Self::EmergencyStop,
    ];

    /// States in which the rotor must be at standstill.
    pub fn is_at_rest(self) -> bool {
        matches!(
            self,
            Self::Stopped | Self::Fault | Self::Overload | Self::EmergencyStop
        )
    }

    /// States in which the contactor may carry current.
    pub fn is_energised(self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }

    /// States held by a latch until an explicit reset.
    pub fn is_latched(self) -> bool {
        matches!(self, Self::Fault | Self::Overload | Self::EmergencyStop)
    }

    /// States in which the rotor is being ramped.
    pub fn is_ramping(self) -> bool {
        matches!(self, Self::Starting | Self::Stopping)
    }

    /// Upper-case label, matching the serialised form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "STOPPED",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Fault => "FAULT",
            Self::Overload => "OVERLOAD",
            Self::EmergencyStop => "EMERGENCY_STOP",
        }
    }
}

impl core::fmt::Display for MotorState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Reducer parameters
// ---------------------------------------------------------------------------

/// Illustrative electrical and thermal model.
///
/// Current and temperature are pure functions of rotor speed, recomputed in
/// the same dispatch that changes the speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectricalModel {
    /// Line current at rated speed (A).
    pub full_load_current_a: f32,
    /// Load factor at the bottom of the speed range.
    pub baseline_load_factor: f32,
    /// Ambient temperature (°C).
    pub ambient_temperature_c: f32,
    /// Winding temperature at rated speed (°C).
    pub max_temperature_c: f32,
    /// Cooling per zero-speed update (°C).
    pub cooling_step_c: f32,
}

impl ElectricalModel {
    /// Line current at `rpm`: nonzero baseline plus a share proportional to speed.
    pub fn current_at(&self, rpm: u32, rated_rpm: u32) -> f32 {
        if rpm == 0 || rated_rpm == 0 {
            return 0.0;
        }
        let ratio = rpm as f32 / rated_rpm as f32;
        let load_factor = self.baseline_load_factor + ratio * (1.0 - self.baseline_load_factor);
        self.full_load_current_a * load_factor
    }

    /// Winding temperature at `rpm`, given the temperature before the update.
    ///
    /// Rises toward the ceiling in proportion to speed; at standstill decays
    /// one cooling step toward ambient.
    pub fn temperature_at(&self, rpm: u32, rated_rpm: u32, previous_c: f32) -> f32 {
        if rpm == 0 || rated_rpm == 0 {
            return (previous_c - self.cooling_step_c).max(self.ambient_temperature_c);
        }
        let ratio = rpm as f32 / rated_rpm as f32;
        let span = self.max_temperature_c - self.ambient_temperature_c;
        (self.ambient_temperature_c + ratio * span).min(self.max_temperature_c)
    }
}

/// Constants the reducer needs, derived from
/// [`StarterConfig`](crate::config::StarterConfig).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorParams {
    pub rated_rpm: u32,
    pub system_voltage: u32,
    /// Fraction of rated speed at which STARTING becomes RUNNING.
    pub running_threshold: f32,
    /// State entered on an overload trip.
    pub trip_state: MotorState,
    pub electrical: ElectricalModel,
}

impl MotorParams {
    /// Lowest RPM that counts as running for a motor rated at `rated_rpm`.
    pub fn running_rpm(&self, rated_rpm: u32) -> u32 {
        ((rated_rpm as f32 * self.running_threshold).ceil() as u32).min(rated_rpm)
    }

    /// Trip target, normalised to one of the two latched trip states.
    pub fn trip_target(&self) -> MotorState {
        if self.trip_state == MotorState::Fault {
            MotorState::Fault
        } else {
            MotorState::Overload
        }
    }
}

impl Default for MotorParams {
    fn default() -> Self {
        crate::config::StarterConfig::default().motor_params()
    }
}
