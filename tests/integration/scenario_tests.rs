//! Operator scenarios through the full service pipeline.

use super::mock_ports::{make_starter, make_starter_with, quiet_config, running_starter};

use dolstarter::app::commands::StarterCommand;
use dolstarter::fsm::MotorState;

// ── Start / run ───────────────────────────────────────────────

#[test]
fn press_start_energises_and_ramp_reaches_running() {
    let mut starter = make_starter();
    let snap = *starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Stopped);
    assert!(snap.mcb_closed);
    assert!(!snap.overload_tripped);

    starter.press_start();
    let snap = *starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Starting);
    assert!(snap.is_contactor_energized);
    assert!(snap.current_flow);
    assert!(snap.fault_condition.is_none());
    assert_eq!(snap.start_time_ms, Some(0));

    starter.advance_to(2_050);
    let snap = starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Running);
    assert_eq!(snap.motor_rpm, snap.rated_rpm);
}

#[test]
fn release_start_never_transitions() {
    let mut starter = make_starter();
    starter.release_start();
    assert_eq!(starter.state(), MotorState::Stopped);

    starter.press_start();
    starter.release_start();
    let snap = starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Starting);
    assert!(!snap.is_start_button_pressed);
}

// ── Breaker ───────────────────────────────────────────────────

#[test]
fn start_with_open_breaker_is_refused() {
    let mut starter = make_starter();
    starter.toggle_mcb();
    starter.press_start();

    let snap = starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Stopped);
    let fault = snap.fault_condition.expect("fault text");
    assert!(fault.contains("MCB"), "fault should mention the breaker: {fault}");
    assert_eq!(starter.armed_timers(), 0);
}

#[test]
fn opening_breaker_while_running_forces_stop() {
    let mut starter = running_starter();
    starter.toggle_mcb();

    let snap = *starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Stopped);
    assert_eq!(snap.motor_rpm, 0);
    assert!(!snap.is_contactor_energized);
    assert!(!snap.current_flow);
    assert_eq!(snap.fault_condition, Some("MCB opened"));
    assert_eq!(starter.armed_timers(), 0);

    starter.toggle_mcb();
    let snap = starter.snapshot();
    assert!(snap.mcb_closed);
    assert!(snap.fault_condition.is_none());
    assert!(snap.start_permitted());
}

#[test]
fn opening_breaker_in_overload_forces_stop_but_keeps_latch() {
    let mut starter = running_starter();
    starter.trip_overload();
    starter.toggle_mcb();

    let snap = *starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Stopped);
    assert_eq!(snap.motor_rpm, 0);
    assert!(snap.overload_tripped);
    assert_eq!(snap.fault_condition, Some("MCB opened"));

    starter.toggle_mcb();
    assert!(starter.snapshot().fault_condition.is_none());
    starter.press_start();
    assert_eq!(starter.state(), MotorState::Stopped);
    assert_eq!(
        starter.snapshot().fault_condition,
        Some("Cannot start: Overload tripped - reset required")
    );

    starter.reset_overload();
    starter.press_start();
    assert_eq!(starter.state(), MotorState::Starting);
}

#[test]
fn opening_breaker_during_ramps_cancels_timers() {
    let mut starter = make_starter();
    starter.press_start();
    starter.advance_by(700);
    starter.toggle_mcb();
    assert_eq!(starter.state(), MotorState::Stopped);
    assert_eq!(starter.snapshot().motor_rpm, 0);
    assert_eq!(starter.armed_timers(), 0);

    starter.toggle_mcb();
    starter.press_start();
    starter.advance_by(2_100);
    starter.press_stop();
    starter.advance_by(300);
    assert_eq!(starter.state(), MotorState::Stopping);
    starter.toggle_mcb();
    assert_eq!(starter.state(), MotorState::Stopped);
    assert_eq!(starter.snapshot().motor_rpm, 0);
    assert_eq!(starter.armed_timers(), 0);
}

// ── Emergency stop ────────────────────────────────────────────

#[test]
fn emergency_stop_from_running_is_immediate() {
    let mut starter = running_starter();
    starter.trigger_emergency_stop();

    let snap = *starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::EmergencyStop);
    assert_eq!(snap.motor_rpm, 0);
    assert!(!snap.is_contactor_energized);
    assert!(snap.is_emergency_stop_active);
    assert_eq!(starter.armed_timers(), 0);

    // No stale timer can revive the rotor.
    starter.advance_by(10_000);
    assert_eq!(*starter.snapshot(), snap);
}

#[test]
fn emergency_stop_latches_against_start_presses() {
    let mut starter = make_starter();
    starter.press_start();
    starter.advance_by(400);
    starter.trigger_emergency_stop();

    for _ in 0..5 {
        starter.press_start();
        starter.release_start();
        starter.advance_by(100);
        assert_eq!(starter.state(), MotorState::EmergencyStop);
    }
    assert_eq!(
        starter.snapshot().fault_condition,
        Some("Cannot start: Emergency stop is active")
    );

    starter.reset_emergency_stop();
    assert_eq!(starter.state(), MotorState::Stopped);
    starter.press_start();
    assert_eq!(starter.state(), MotorState::Starting);
}

// ── Overload ──────────────────────────────────────────────────

#[test]
fn start_from_overload_only_updates_fault() {
    let mut starter = running_starter();
    starter.trip_overload();
    let tripped = *starter.snapshot();
    assert_eq!(tripped.motor_state, MotorState::Overload);
    assert_eq!(tripped.motor_rpm, 0);

    starter.press_start();
    let after = *starter.snapshot();
    assert_eq!(after.motor_state, MotorState::Overload);
    let fault = after.fault_condition.expect("fault text");
    assert!(fault.contains("Overload"), "fault should mention overload: {fault}");
    assert_eq!(
        after,
        dolstarter::fsm::MotorSnapshot {
            fault_condition: after.fault_condition,
            ..tripped
        }
    );
}

#[test]
fn reset_overload_allows_restart() {
    let mut starter = running_starter();
    starter.trip_overload();
    starter.reset_overload();

    let snap = starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Stopped);
    assert!(!snap.overload_tripped);
    assert!(snap.fault_condition.is_none());

    starter.press_start();
    assert_eq!(starter.state(), MotorState::Starting);
}

#[test]
fn reset_overload_without_trip_is_a_no_op() {
    let mut starter = running_starter();
    let before = *starter.snapshot();
    starter.reset_overload();
    assert_eq!(*starter.snapshot(), before);
}

#[test]
fn fault_variant_trips_into_fault_state() {
    let config = dolstarter::config::StarterConfig {
        trip_state: MotorState::Fault,
        ..quiet_config()
    };
    let mut starter = make_starter_with(config);
    starter.press_start();
    starter.advance_by(800);
    starter.trip_overload();
    assert_eq!(starter.state(), MotorState::Fault);
    starter.reset_overload();
    assert_eq!(starter.state(), MotorState::Stopped);
}

// ── Runtime accounting ────────────────────────────────────────

#[test]
fn reset_runtime_keeps_running() {
    let mut starter = running_starter();
    starter.advance_by(120_000);
    assert!(starter.snapshot().running_time >= 119);

    starter.reset_runtime();
    let snap = starter.snapshot();
    assert_eq!(snap.running_time, 0);
    assert_eq!(snap.motor_state, MotorState::Running);
    assert_eq!(snap.start_time_ms, Some(starter.now_ms()));

    starter.advance_by(3_000);
    assert_eq!(starter.snapshot().running_time, 3);
}

#[test]
fn runtime_survives_stop_and_formats() {
    let mut starter = running_starter();
    starter.advance_by(65_000);
    starter.press_stop();
    starter.advance_by(2_000);

    let snap = starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Stopped);
    assert_eq!(snap.running_time, 65);
    assert_eq!(snap.formatted_runtime(), "00:01:05");
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn script_commands_drive_the_same_pipeline() {
    let mut starter = make_starter();
    let steps = dolstarter::app::commands::parse_script(
        "0:press-start,100:release-start,3000:press-stop,3100:release-stop",
    )
    .unwrap();
    for step in steps {
        starter.advance_to(step.at_ms);
        starter.handle_command(step.command);
    }
    starter.advance_to(6_000);

    assert_eq!(
        starter.sink().state_changes(),
        [
            (MotorState::Stopped, MotorState::Starting),
            (MotorState::Starting, MotorState::Running),
            (MotorState::Running, MotorState::Stopping),
            (MotorState::Stopping, MotorState::Stopped),
        ]
    );

    starter.handle_command(StarterCommand::EmergencyStop);
    assert_eq!(starter.state(), MotorState::EmergencyStop);
}
