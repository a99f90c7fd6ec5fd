//! Starter service: the hexagonal core.
//!
//! [`MotorStarter`] owns the motor snapshot, the timer queue, the
//! simulation driver and the overload relay.  It is the single session
//! object; nothing lives in globals.  Output flows through the
//! [`EventSink`] port, so the whole service runs under test with a
//! recording sink and a stepped virtual clock.
//!
//! ```text
//!  operator ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!               │         MotorStarter          │
//!  advance_to ─▶│ reducer · driver · relay      │
//!               └──────────────────────────────┘
//! ```
//!
//! Every dispatch runs the same pipeline:
//!
//! 1. `transition()` computes the next snapshot.
//! 2. The simulation driver re-aligns its timers with the new phase.
//! 3. After simulation actions the overload relay is evaluated; a trip is
//!    dispatched as `TripOverload` through the same pipeline.
//! 4. State and fault changes are emitted as events.

use log::{debug, error, info, warn};

use crate::config::StarterConfig;
use crate::error::Result;
use crate::fsm::{Action, MotorParams, MotorSnapshot, MotorState, transition};
use crate::safety::OverloadRelay;
use crate::scheduler::TimerQueue;
use crate::sim::SimulationDriver;

use super::commands::StarterCommand;
use super::events::{StarterEvent, TelemetryData};
use super::ports::{ConfigPort, EventSink};

// ───────────────────────────────────────────────────────────────
// MotorStarter
// ───────────────────────────────────────────────────────────────

/// A DOL starter session.
pub struct MotorStarter<S: EventSink> {
    config: StarterConfig,
    params: MotorParams,
    snap: MotorSnapshot,
    timers: TimerQueue,
    driver: SimulationDriver,
    relay: OverloadRelay,
    sink: S,
    /// Virtual time of the last dispatch or advance.
    now_ms: u64,
    next_telemetry_ms: Option<u64>,
    dispatch_count: u64,
}

impl<S: EventSink> MotorStarter<S> {
    /// Create a session at virtual time 0 with everything at rest.
    ///
    /// The configuration is taken as given; use [`from_port`] to load and
    /// validate one.
    ///
    /// [`from_port`]: Self::from_port
    pub fn new(config: StarterConfig, mut sink: S) -> Self {
        let params = config.motor_params();
        let snap = MotorSnapshot::initial(&params);
        let next_telemetry_ms =
            (config.telemetry_interval_ms > 0).then_some(u64::from(config.telemetry_interval_ms));

        sink.emit(&StarterEvent::Started(snap.motor_state));
        info!(
            "MotorStarter started in {} ({} RPM rated, {} V)",
            snap.motor_state, snap.rated_rpm, snap.system_voltage
        );

        Self {
            driver: SimulationDriver::new(&config),
            relay: OverloadRelay::new(&config),
            timers: TimerQueue::new(),
            config,
            params,
            snap,
            sink,
            now_ms: 0,
            next_telemetry_ms,
            dispatch_count: 0,
        }
    }

    /// Load configuration through `port`, validate it, and start a session.
    pub fn from_port(port: &impl ConfigPort, sink: S) -> Result<Self> {
        let config = port.load()?;
        config.validate()?;
        Ok(Self::new(config, sink))
    }

    // ── Operator actions ──────────────────────────────────────

    pub fn press_start(&mut self) {
        self.dispatch_now(Action::PressStart);
    }

    pub fn release_start(&mut self) {
        self.dispatch_now(Action::ReleaseStart);
    }

    pub fn press_stop(&mut self) {
        self.dispatch_now(Action::PressStop);
    }

    pub fn release_stop(&mut self) {
        self.dispatch_now(Action::ReleaseStop);
    }

    pub fn trigger_emergency_stop(&mut self) {
        self.dispatch_now(Action::TriggerEmergencyStop);
    }

    pub fn reset_emergency_stop(&mut self) {
        self.dispatch_now(Action::ResetEmergencyStop);
    }

    pub fn toggle_mcb(&mut self) {
        self.dispatch_now(Action::ToggleMcb);
    }

    pub fn reset_overload(&mut self) {
        self.dispatch_now(Action::ResetOverload);
    }

    pub fn reset_runtime(&mut self) {
        self.dispatch_now(Action::ResetRuntime);
    }

    /// Simulate the overload relay tripping.
    pub fn trip_overload(&mut self) {
        self.dispatch_now(Action::TripOverload);
    }

    /// Inject a rotor speed sample.
    pub fn set_rpm(&mut self, rpm: u32) {
        self.dispatch_now(Action::SetRpm(rpm));
    }

    /// Process an operator command at the current virtual time.
    pub fn handle_command(&mut self, cmd: StarterCommand) {
        debug!("Command {:?} at {} ms", cmd, self.now_ms);
        self.dispatch_now(cmd.into_action());
    }

    // ── Time ──────────────────────────────────────────────────

    /// Advance virtual time to `now_ms`, firing every timer due on the way
    /// in time order.
    ///
    /// Each fire is dispatched at its own due time.  Telemetry is emitted
    /// at its interval boundaries, after any timer due at the same instant.
    /// Going backwards is ignored.
    pub fn advance_to(&mut self, now_ms: u64) {
        if now_ms < self.now_ms {
            warn!("advance_to({}) is behind current time {}, ignored", now_ms, self.now_ms);
            return;
        }

        loop {
            let timer_due = self.timers.next_due().filter(|t| *t <= now_ms);
            let telemetry_due = self.next_telemetry_ms.filter(|t| *t <= now_ms);
            match (timer_due, telemetry_due) {
                (Some(timer), Some(telemetry)) if telemetry < timer => {
                    self.emit_telemetry(telemetry);
                }
                (Some(_), _) => {
                    let Some(fired) = self.timers.pop_due(now_ms) else {
                        break;
                    };
                    self.now_ms = fired.at_ms;
                    if let Some(action) = self.driver.on_timer(&fired, &self.snap) {
                        self.dispatch(action, fired.at_ms);
                    }
                }
                (None, Some(telemetry)) => self.emit_telemetry(telemetry),
                (None, None) => break,
            }
        }
        self.now_ms = now_ms;
    }

    /// Advance virtual time by `delta_ms`.
    pub fn advance_by(&mut self, delta_ms: u64) {
        self.advance_to(self.now_ms.saturating_add(delta_ms));
    }

    // ── Queries ───────────────────────────────────────────────

    /// The current snapshot.
    pub fn snapshot(&self) -> &MotorSnapshot {
        &self.snap
    }

    /// Current motor state.
    pub fn state(&self) -> MotorState {
        self.snap.motor_state
    }

    /// Current virtual time (ms).
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Earliest pending timer, if any.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.timers.next_due()
    }

    /// Number of armed timers.
    pub fn armed_timers(&self) -> usize {
        self.timers.armed_count()
    }

    /// Total actions dispatched since the session started.
    pub fn dispatch_count(&self) -> u64 {
        self.dispatch_count
    }

    pub fn config(&self) -> &StarterConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Build a telemetry record from the current snapshot.
    pub fn build_telemetry(&self) -> TelemetryData {
        let s = &self.snap;
        TelemetryData {
            state: s.motor_state,
            rpm: s.motor_rpm,
            rated_rpm: s.rated_rpm,
            rpm_ratio: s.rpm_ratio(),
            voltage_v: s.system_voltage,
            current_a: s.system_current,
            temperature_c: s.motor_temperature,
            contactor_energized: s.is_contactor_energized,
            mcb_closed: s.mcb_closed,
            overload_tripped: s.overload_tripped,
            emergency_stop_active: s.is_emergency_stop_active,
            running_time: s.formatted_runtime(),
            fault: s.fault_condition,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// End the session: cancel every pending timer and hand back the final
    /// snapshot.  The starter cannot be driven afterwards.
    pub fn shutdown(mut self) -> MotorSnapshot {
        self.driver.shutdown(&mut self.timers);
        self.timers.cancel_all();
        self.next_telemetry_ms = None;
        info!(
            "MotorStarter shut down in {} after {} dispatches",
            self.snap.motor_state, self.dispatch_count
        );
        self.snap
    }

    // ── Internal ──────────────────────────────────────────────

    fn dispatch_now(&mut self, action: Action) {
        self.dispatch(action, self.now_ms);
    }

    fn dispatch(&mut self, action: Action, at_ms: u64) {
        self.apply(action, at_ms);

        if action == Action::ResetOverload {
            self.relay.reset();
        }
        if action.is_simulation() {
            if let Some(trip) = self.relay.evaluate(&self.snap, at_ms) {
                warn!(
                    "Overload relay tripped ({}) at {} RPM, {:.2} A",
                    trip, self.snap.motor_rpm, self.snap.system_current
                );
                self.apply(Action::TripOverload, at_ms);
            }
        }
    }

    fn apply(&mut self, action: Action, at_ms: u64) {
        let prev = self.snap;
        let next = transition(&prev, action, at_ms, &self.params);
        self.snap = next;
        self.dispatch_count += 1;

        if let Some(violation) = next.check_invariants() {
            error!("Snapshot invariant violated after {:?}: {}", action, violation);
        }

        self.driver.sync(&next, &mut self.timers, at_ms);
        self.publish(&prev, &next, action);
    }

    fn publish(&mut self, prev: &MotorSnapshot, next: &MotorSnapshot, action: Action) {
        if prev.motor_state != next.motor_state {
            info!(
                "{} -> {} on {:?} at {} RPM",
                prev.motor_state, next.motor_state, action, next.motor_rpm
            );
            self.sink.emit(&StarterEvent::StateChanged {
                from: prev.motor_state,
                to: next.motor_state,
            });
        } else if action.is_simulation() {
            debug!("{:?} -> {} RPM in {}", action, next.motor_rpm, next.motor_state);
        }

        if prev.fault_condition != next.fault_condition {
            match next.fault_condition {
                Some(text) => self.sink.emit(&StarterEvent::FaultRaised(text)),
                None => self.sink.emit(&StarterEvent::FaultCleared),
            }
        }
    }

    fn emit_telemetry(&mut self, at_ms: u64) {
        self.now_ms = at_ms;
        let telemetry = self.build_telemetry();
        self.sink.emit(&StarterEvent::Telemetry(telemetry));
        self.next_telemetry_ms = at_ms.checked_add(u64::from(self.config.telemetry_interval_ms));
    }
}
