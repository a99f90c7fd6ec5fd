//! Timer-driven behaviour: ramps, runtime ticks, telemetry, relay trips.

use super::mock_ports::{make_starter, make_starter_with, quiet_config, running_starter};

use dolstarter::config::StarterConfig;
use dolstarter::fsm::MotorState;

const ACCEL_SAMPLE_MS: u64 = 50;
const DECEL_SAMPLE_MS: u64 = 30;

#[test]
fn accel_samples_are_monotonic_and_converge_within_ramp() {
    let mut starter = make_starter();
    starter.press_start();

    let mut last_rpm = 0;
    let mut running_at = None;
    while starter.now_ms() < 2_000 + ACCEL_SAMPLE_MS {
        starter.advance_by(ACCEL_SAMPLE_MS);
        let snap = starter.snapshot();
        assert!(
            snap.motor_rpm >= last_rpm,
            "rpm fell from {} to {} at {} ms",
            last_rpm,
            snap.motor_rpm,
            starter.now_ms()
        );
        last_rpm = snap.motor_rpm;
        if snap.motor_state == MotorState::Running && running_at.is_none() {
            running_at = Some(starter.now_ms());
        }
    }

    assert_eq!(last_rpm, 1480);
    let running_at = running_at.expect("never reached RUNNING");
    assert!(running_at <= 2_000 + ACCEL_SAMPLE_MS);
}

#[test]
fn decel_reaches_standstill_within_ramp_down() {
    let mut starter = running_starter();
    let stop_at = starter.now_ms();
    starter.press_stop();
    assert_eq!(starter.state(), MotorState::Stopping);

    let mut last_rpm = starter.snapshot().motor_rpm;
    while starter.state() == MotorState::Stopping {
        starter.advance_by(DECEL_SAMPLE_MS);
        let rpm = starter.snapshot().motor_rpm;
        assert!(rpm <= last_rpm);
        last_rpm = rpm;
        assert!(starter.now_ms() - stop_at <= 1_600 + DECEL_SAMPLE_MS);
    }
    assert_eq!(starter.state(), MotorState::Stopped);
    assert_eq!(starter.armed_timers(), 0);
}

#[test]
fn stop_during_start_decelerates_from_partial_speed() {
    let mut starter = make_starter();
    starter.press_start();
    starter.advance_by(1_000);
    let partial = starter.snapshot().motor_rpm;
    assert!(partial > 0 && partial < 1480);

    starter.press_stop();
    starter.advance_by(DECEL_SAMPLE_MS);
    assert!(starter.snapshot().motor_rpm < partial);
    starter.advance_by(2_000);
    assert_eq!(starter.state(), MotorState::Stopped);
}

#[test]
fn derived_quantities_track_speed() {
    let mut starter = running_starter();
    let snap = *starter.snapshot();
    assert!((snap.system_current - 5.0).abs() < 1e-3);
    assert!((snap.motor_temperature - 90.0).abs() < 1e-3);

    starter.press_stop();
    starter.advance_by(2_000);
    let snap = starter.snapshot();
    assert_eq!(snap.system_current, 0.0);
    assert!(snap.motor_temperature < 90.0);
    assert!(snap.motor_temperature >= 25.0);
}

#[test]
fn emergency_stop_during_decel_cancels_ramp() {
    let mut starter = running_starter();
    starter.press_stop();
    starter.advance_by(300);
    starter.trigger_emergency_stop();
    assert_eq!(starter.snapshot().motor_rpm, 0);
    assert_eq!(starter.armed_timers(), 0);
    starter.advance_by(5_000);
    assert_eq!(starter.state(), MotorState::EmergencyStop);
}

#[test]
fn relay_trips_on_sustained_over_current() {
    let config = StarterConfig {
        overload_current_limit_a: 4.0,
        overload_trip_delay_ms: 300,
        ..quiet_config()
    };
    let mut starter = make_starter_with(config);
    starter.press_start();
    starter.advance_by(5_000);

    let snap = starter.snapshot();
    assert_eq!(snap.motor_state, MotorState::Overload);
    assert!(snap.overload_tripped);
    assert_eq!(snap.motor_rpm, 0);
    assert_eq!(
        starter.sink().faults().last(),
        Some(&"OVERLOAD: Motor current exceeded safe limits")
    );
}

#[test]
fn relay_trips_running_motor_on_temperature() {
    let config = StarterConfig {
        overload_temperature_limit_c: 80.0,
        ..quiet_config()
    };
    let mut starter = make_starter_with(config);
    starter.press_start();
    starter.advance_by(3_000);
    assert_eq!(starter.state(), MotorState::Overload);
}

#[test]
fn healthy_motor_runs_without_tripping() {
    let mut starter = running_starter();
    starter.advance_by(60_000);
    assert_eq!(starter.state(), MotorState::Running);
    assert!(starter.sink().faults().is_empty());
}

#[test]
fn telemetry_reports_at_interval() {
    let config = StarterConfig {
        telemetry_interval_ms: 250,
        ..StarterConfig::default()
    };
    let mut starter = make_starter_with(config);
    starter.press_start();
    starter.advance_to(2_500);

    let telemetry = starter.sink().telemetry();
    assert_eq!(telemetry.len(), 10);
    assert_eq!(telemetry[0].state, MotorState::Starting);
    let last = telemetry.last().unwrap();
    assert_eq!(last.state, MotorState::Running);
    assert_eq!(last.rpm, 1480);
    assert_eq!(last.voltage_v, 400);
}

#[test]
fn shutdown_hands_back_the_final_snapshot() {
    let mut starter = running_starter();
    starter.advance_by(5_000);
    let before = *starter.snapshot();
    let last = starter.shutdown();
    assert_eq!(last, before);
    assert_eq!(last.motor_state, MotorState::Running);
    assert_eq!(last.check_invariants(), None);
}
