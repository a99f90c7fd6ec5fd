//! The transition function and its per-action handlers.
//!
//! Each handler takes the current snapshot by reference and builds the
//! next one with struct-update syntax, so the input is never modified.
//! Handlers are total: an action that does not apply returns the input
//! unchanged.

use log::{debug, warn};

use super::{Action, MotorParams, MotorSnapshot, MotorState};
use crate::error::{Interlock, LatchedFault};
use crate::safety::start_interlock;

/// Compute the snapshot that follows `snap` when `action` is applied at
/// monotonic time `now_ms`.
pub fn transition(
    snap: &MotorSnapshot,
    action: Action,
    now_ms: u64,
    params: &MotorParams,
) -> MotorSnapshot {
    match action {
        Action::PressStart => press_start(snap, now_ms),
        Action::ReleaseStart => MotorSnapshot {
            is_start_button_pressed: false,
            ..*snap
        },
        Action::PressStop => press_stop(snap, now_ms),
        Action::ReleaseStop => MotorSnapshot {
            is_stop_button_pressed: false,
            ..*snap
        },
        Action::TriggerEmergencyStop => trigger_emergency_stop(snap, params),
        Action::ResetEmergencyStop => reset_emergency_stop(snap, params),
        Action::ToggleMcb => toggle_mcb(snap, params),
        Action::TripOverload => trip_overload(snap, params),
        Action::ResetOverload => reset_overload(snap),
        Action::ResetRuntime => reset_runtime(snap, now_ms),
        Action::SetRpm(rpm) => set_rpm(snap, rpm, params),
        Action::TickRuntime => tick_runtime(snap),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Pushbuttons
// ═══════════════════════════════════════════════════════════════════════════

fn press_start(snap: &MotorSnapshot, now_ms: u64) -> MotorSnapshot {
    if let Some(interlock) = start_interlock(snap) {
        warn!("START refused in {}: {}", snap.motor_state, interlock);
        return MotorSnapshot {
            fault_condition: Some(interlock.message()),
            ..*snap
        };
    }

    match snap.motor_state {
        MotorState::Stopped => MotorSnapshot {
            motor_state: MotorState::Starting,
            is_start_button_pressed: true,
            is_stop_button_pressed: false,
            is_contactor_energized: true,
            current_flow: snap.mcb_closed,
            start_time_ms: Some(now_ms),
            fault_condition: None,
            ..*snap
        },
        // Already moving (or still coasting down): the press is only visual.
        _ => MotorSnapshot {
            is_start_button_pressed: true,
            ..*snap
        },
    }
}

fn press_stop(snap: &MotorSnapshot, now_ms: u64) -> MotorSnapshot {
    match snap.motor_state {
        MotorState::Starting | MotorState::Running => MotorSnapshot {
            motor_state: MotorState::Stopping,
            is_stop_button_pressed: true,
            is_start_button_pressed: false,
            is_contactor_energized: false,
            current_flow: false,
            start_time_ms: Some(now_ms),
            ..*snap
        },
        _ => MotorSnapshot {
            is_stop_button_pressed: true,
            ..*snap
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Emergency stop
// ═══════════════════════════════════════════════════════════════════════════

fn trigger_emergency_stop(snap: &MotorSnapshot, params: &MotorParams) -> MotorSnapshot {
    if snap.motor_state == MotorState::EmergencyStop {
        return *snap;
    }

    let next = MotorSnapshot {
        motor_state: MotorState::EmergencyStop,
        is_contactor_energized: false,
        current_flow: false,
        is_emergency_stop_active: true,
        is_start_button_pressed: false,
        is_stop_button_pressed: false,
        start_time_ms: None,
        fault_condition: Some(LatchedFault::EmergencyStop.message()),
        ..*snap
    };
    // No deceleration ramp: the rotor is at standstill in the same dispatch.
    with_rpm(next, 0, params)
}

fn reset_emergency_stop(snap: &MotorSnapshot, params: &MotorParams) -> MotorSnapshot {
    if !snap.is_emergency_stop_active {
        return *snap;
    }

    // An overload that tripped while the stop was latched is still latched.
    let (motor_state, fault_condition) = if snap.overload_tripped {
        (params.trip_target(), Some(LatchedFault::Overload.message()))
    } else {
        (MotorState::Stopped, None)
    };

    MotorSnapshot {
        motor_state,
        is_emergency_stop_active: false,
        fault_condition,
        motor_rpm: 0,
        start_time_ms: None,
        ..*snap
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Breaker
// ═══════════════════════════════════════════════════════════════════════════

fn toggle_mcb(snap: &MotorSnapshot, params: &MotorParams) -> MotorSnapshot {
    if !snap.mcb_closed {
        return MotorSnapshot {
            mcb_closed: true,
            // The emergency latch keeps the text of its own cause.
            fault_condition: if snap.motor_state == MotorState::EmergencyStop {
                snap.fault_condition
            } else {
                None
            },
            ..*snap
        };
    }

    let opened = MotorSnapshot {
        mcb_closed: false,
        is_contactor_energized: false,
        current_flow: false,
        ..*snap
    };
    if snap.motor_state == MotorState::EmergencyStop {
        return opened;
    }

    // Forced stop: supply is isolated, the rotor is treated as stopped.
    // An overload latch survives and still blocks the next start.
    let forced = MotorSnapshot {
        motor_state: MotorState::Stopped,
        start_time_ms: None,
        fault_condition: Some(LatchedFault::McbOpened.message()),
        ..opened
    };
    if forced.motor_rpm == 0 {
        forced
    } else {
        with_rpm(forced, 0, params)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Overload
// ═══════════════════════════════════════════════════════════════════════════

fn trip_overload(snap: &MotorSnapshot, params: &MotorParams) -> MotorSnapshot {
    if snap.motor_state == MotorState::EmergencyStop {
        // The emergency latch wins; remember the trip for after its reset.
        return MotorSnapshot {
            overload_tripped: true,
            ..*snap
        };
    }

    let tripped = MotorSnapshot {
        motor_state: params.trip_target(),
        is_contactor_energized: false,
        current_flow: false,
        overload_tripped: true,
        is_start_button_pressed: false,
        start_time_ms: None,
        fault_condition: Some(LatchedFault::Overload.message()),
        ..*snap
    };
    if tripped.motor_rpm == 0 {
        tripped
    } else {
        with_rpm(tripped, 0, params)
    }
}

fn reset_overload(snap: &MotorSnapshot) -> MotorSnapshot {
    if !snap.overload_tripped {
        return *snap;
    }

    match snap.motor_state {
        MotorState::Overload | MotorState::Fault => MotorSnapshot {
            motor_state: MotorState::Stopped,
            overload_tripped: false,
            fault_condition: None,
            ..*snap
        },
        MotorState::EmergencyStop => MotorSnapshot {
            overload_tripped: false,
            ..*snap
        },
        // Forced out of the trip state by the breaker: only overload text goes.
        _ => MotorSnapshot {
            overload_tripped: false,
            fault_condition: match snap.fault_condition {
                Some(text)
                    if text == LatchedFault::Overload.message()
                        || text == Interlock::OverloadTripped.message() =>
                {
                    None
                }
                other => other,
            },
            ..*snap
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Runtime accounting
// ═══════════════════════════════════════════════════════════════════════════

fn reset_runtime(snap: &MotorSnapshot, now_ms: u64) -> MotorSnapshot {
    MotorSnapshot {
        running_time: 0,
        start_time_ms: if snap.motor_state == MotorState::Running {
            Some(now_ms)
        } else {
            snap.start_time_ms
        },
        ..*snap
    }
}

fn tick_runtime(snap: &MotorSnapshot) -> MotorSnapshot {
    if snap.motor_state != MotorState::Running {
        return *snap;
    }
    MotorSnapshot {
        running_time: snap.running_time.saturating_add(1),
        ..*snap
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Rotor speed
// ═══════════════════════════════════════════════════════════════════════════

fn set_rpm(snap: &MotorSnapshot, rpm: u32, params: &MotorParams) -> MotorSnapshot {
    let requested = rpm.min(snap.rated_rpm);
    let running_rpm = params.running_rpm(snap.rated_rpm);

    match snap.motor_state {
        MotorState::Starting if requested >= running_rpm => {
            debug!("RPM {} reached running threshold {}", requested, running_rpm);
            let running = MotorSnapshot {
                motor_state: MotorState::Running,
                ..*snap
            };
            with_rpm(running, snap.rated_rpm, params)
        }
        MotorState::Starting => with_rpm(*snap, requested, params),
        MotorState::Stopping if requested == 0 => {
            let stopped = MotorSnapshot {
                motor_state: MotorState::Stopped,
                start_time_ms: None,
                ..*snap
            };
            with_rpm(stopped, 0, params)
        }
        MotorState::Stopping => with_rpm(*snap, requested, params),
        MotorState::Running => with_rpm(*snap, requested.max(running_rpm), params),
        // At rest: a late sample can never spin the rotor back up.
        MotorState::Stopped
        | MotorState::Fault
        | MotorState::Overload
        | MotorState::EmergencyStop => with_rpm(*snap, 0, params),
    }
}

/// Set the rotor speed and recompute the derived electrical quantities.
fn with_rpm(snap: MotorSnapshot, rpm: u32, params: &MotorParams) -> MotorSnapshot {
    let model = &params.electrical;
    MotorSnapshot {
        motor_rpm: rpm,
        system_current: model.current_at(rpm, snap.rated_rpm),
        motor_temperature: model.temperature_at(rpm, snap.rated_rpm, snap.motor_temperature),
        ..snap
    }
}
