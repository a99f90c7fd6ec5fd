//! The single state record read by every control surface.
//!
//! `MotorSnapshot` holds the control circuit (contactor, pushbuttons,
//! latches), the power circuit (breaker, current flow) and the simulated
//! physical quantities.  It is created once at session start and then only
//! ever replaced by [`transition`](super::transition).

use serde::Serialize;

use super::{MotorParams, MotorState};

/// A point-in-time view of the whole starter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorSnapshot {
    // -- Motor --
    pub motor_state: MotorState,
    /// Rotor speed, `0..=rated_rpm`.
    #[serde(rename = "motorRPM")]
    pub motor_rpm: u32,
    /// Nameplate speed; fixed for the lifetime of the session.
    #[serde(rename = "ratedRPM")]
    pub rated_rpm: u32,

    // -- Control circuit --
    pub is_contactor_energized: bool,
    /// Momentary: start pushbutton is held down.
    pub is_start_button_pressed: bool,
    /// Momentary: stop pushbutton is held down.
    pub is_stop_button_pressed: bool,
    /// Latch: set by an emergency stop, cleared only by its reset.
    pub is_emergency_stop_active: bool,

    // -- Power circuit --
    /// True iff the contactor is energised and the breaker is closed.
    pub current_flow: bool,
    #[serde(rename = "mcbClosed")]
    pub mcb_closed: bool,
    /// Latch: set by an overload trip, cleared only by its reset.
    pub overload_tripped: bool,

    // -- Monitoring --
    /// Whole seconds accumulated in RUNNING.
    pub running_time: u64,
    /// Monotonic timestamp (ms) at which the current ramp began.
    #[serde(rename = "startTime")]
    pub start_time_ms: Option<u64>,
    /// Text of the latest guard violation or latched fault.
    pub fault_condition: Option<&'static str>,

    // -- Electrical --
    /// Supply voltage (V); never changed by a transition.
    pub system_voltage: u32,
    /// Line current (A), derived from rotor speed.
    pub system_current: f32,
    /// Winding temperature (°C), derived from rotor speed.
    pub motor_temperature: f32,
}

impl MotorSnapshot {
    /// Everything at rest: STOPPED, standstill, breaker closed, no faults.
    pub fn initial(params: &MotorParams) -> Self {
        Self {
            motor_state: MotorState::Stopped,
            motor_rpm: 0,
            rated_rpm: params.rated_rpm,
            is_contactor_energized: false,
            is_start_button_pressed: false,
            is_stop_button_pressed: false,
            is_emergency_stop_active: false,
            current_flow: false,
            mcb_closed: true,
            overload_tripped: false,
            running_time: 0,
            start_time_ms: None,
            fault_condition: None,
            system_voltage: params.system_voltage,
            system_current: 0.0,
            motor_temperature: params.electrical.ambient_temperature_c,
        }
    }

    /// Rotor speed as a fraction of rated speed.
    pub fn rpm_ratio(&self) -> f32 {
        if self.rated_rpm == 0 {
            return 0.0;
        }
        self.motor_rpm as f32 / self.rated_rpm as f32
    }

    /// Whether pressing start right now would begin a start.
    ///
    /// This is the rule a control panel uses to enable its start button.
    pub fn start_permitted(&self) -> bool {
        self.motor_state == MotorState::Stopped
            && self.mcb_closed
            && !self.overload_tripped
            && !self.is_emergency_stop_active
    }

    /// Running time as `HH:MM:SS`.
    pub fn formatted_runtime(&self) -> String {
        let hrs = self.running_time / 3600;
        let mins = (self.running_time % 3600) / 60;
        let secs = self.running_time % 60;
        format!("{hrs:02}:{mins:02}:{secs:02}")
    }

    /// Check the structural invariants every reachable snapshot satisfies.
    ///
    /// Returns the first violated invariant, if any.
    pub fn check_invariants(&self) -> Option<&'static str> {
        if self.is_contactor_energized && !self.motor_state.is_energised() {
            return Some("contactor energised outside STARTING/RUNNING");
        }
        if self.motor_state.is_at_rest() && self.motor_rpm != 0 {
            return Some("rotor turning in an at-rest state");
        }
        if self.current_flow != (self.is_contactor_energized && self.mcb_closed) {
            return Some("current flow does not match contactor and breaker");
        }
        if self.motor_rpm > self.rated_rpm {
            return Some("rotor speed above rated");
        }
        if self.motor_state == MotorState::EmergencyStop && !self.is_emergency_stop_active {
            return Some("EMERGENCY_STOP without its latch");
        }
        if matches!(self.motor_state, MotorState::Overload | MotorState::Fault)
            && !self.overload_tripped
        {
            return Some("trip state without the overload latch");
        }
        None
    }
}
