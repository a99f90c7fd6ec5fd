//! Outbound starter events.
//!
//! [`MotorStarter`](super::service::MotorStarter) emits these through the
//! [`EventSink`](super::ports::EventSink) port after each dispatch.

use serde::Serialize;

use crate::fsm::MotorState;

/// Structured events emitted by the starter core.
#[derive(Debug, Clone, PartialEq)]
pub enum StarterEvent {
    /// The session was created (carries the initial state).
    Started(MotorState),

    /// The motor moved between states.
    StateChanged { from: MotorState, to: MotorState },

    /// A fault text appeared or changed.
    FaultRaised(&'static str),

    /// The fault text was cleared.
    FaultCleared,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry record suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryData {
    pub state: MotorState,
    pub rpm: u32,
    pub rated_rpm: u32,
    /// Rotor speed as a fraction of rated speed, for the tachometer gauge.
    pub rpm_ratio: f32,
    pub voltage_v: u32,
    pub current_a: f32,
    pub temperature_c: f32,
    pub contactor_energized: bool,
    pub mcb_closed: bool,
    pub overload_tripped: bool,
    pub emergency_stop_active: bool,
    /// Running time as `HH:MM:SS`.
    pub running_time: String,
    pub fault: Option<&'static str>,
}
