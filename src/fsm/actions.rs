//! Actions that drive the reducer.

/// Every input the reducer accepts.  The set is closed: an action that
/// does not apply in the current state maps to an unchanged snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Operator pushbuttons
    /// Start pushbutton pressed; arms the start transition.
    PressStart,
    /// Start pushbutton released; clears the pressed flag only.
    ReleaseStart,
    /// Stop pushbutton pressed; begins the deceleration ramp.
    PressStop,
    /// Stop pushbutton released; clears the pressed flag only.
    ReleaseStop,

    // Operator protective controls
    TriggerEmergencyStop,
    ResetEmergencyStop,
    /// Flip the main circuit breaker.
    ToggleMcb,
    ResetOverload,
    /// Zero the running-time accumulator.
    ResetRuntime,

    // Sensor / simulation inputs
    /// Overload relay trip (sensor event).
    TripOverload,
    /// New rotor speed sample from the simulation driver.
    SetRpm(u32),
    /// One runtime-accounting period elapsed.
    TickRuntime,
}

impl Action {
    /// Check if this action comes from an operator control
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Action::PressStart
                | Action::ReleaseStart
                | Action::PressStop
                | Action::ReleaseStop
                | Action::TriggerEmergencyStop
                | Action::ResetEmergencyStop
                | Action::ToggleMcb
                | Action::ResetOverload
                | Action::ResetRuntime
        )
    }

    /// Check if this action is produced by the simulation driver
    pub fn is_simulation(&self) -> bool {
        matches!(self, Action::SetRpm(_) | Action::TickRuntime)
    }
}
