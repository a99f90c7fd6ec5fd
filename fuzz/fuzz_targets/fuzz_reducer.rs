//! Fuzz target: reducer and service under arbitrary action sequences
//!
//! Each input byte pair selects an action (or a time step) and feeds it
//! through a full `MotorStarter`, verifying:
//! - No panics for any sequence
//! - Every snapshot passes `check_invariants()`
//! - An at-rest state never carries rotor speed
//!
//! cargo fuzz run fuzz_reducer

#![no_main]

use dolstarter::app::events::StarterEvent;
use dolstarter::app::ports::EventSink;
use dolstarter::app::service::MotorStarter;
use dolstarter::config::StarterConfig;
use libfuzzer_sys::fuzz_target;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &StarterEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = StarterConfig {
        // Low limits so the relay path is exercised too.
        overload_current_limit_a: 4.5,
        overload_trip_delay_ms: 200,
        ..StarterConfig::default()
    };
    let mut starter = MotorStarter::new(config, Discard);

    for pair in data.chunks(2) {
        let op = pair[0];
        let arg = pair.get(1).copied().unwrap_or(0);
        match op % 14 {
            0 => starter.press_start(),
            1 => starter.release_start(),
            2 => starter.press_stop(),
            3 => starter.release_stop(),
            4 => starter.trigger_emergency_stop(),
            5 => starter.reset_emergency_stop(),
            6 => starter.toggle_mcb(),
            7 => starter.trip_overload(),
            8 => starter.reset_overload(),
            9 => starter.reset_runtime(),
            10 => starter.set_rpm(u32::from(arg) * 8),
            _ => starter.advance_by(u64::from(arg) * 20),
        }

        let snap = starter.snapshot();
        assert_eq!(snap.check_invariants(), None, "{snap:?}");
        if snap.motor_state.is_at_rest() {
            assert_eq!(snap.motor_rpm, 0);
        }
    }

    let before = *starter.snapshot();
    let last = starter.shutdown();
    assert_eq!(last, before);
    assert_eq!(last.check_invariants(), None);
});
