//! Recording port implementations for integration tests.

use std::cell::RefCell;

use dolstarter::app::events::{StarterEvent, TelemetryData};
use dolstarter::app::ports::{ConfigError, ConfigPort, EventSink};
use dolstarter::app::service::MotorStarter;
use dolstarter::config::StarterConfig;
use dolstarter::fsm::MotorState;

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps every event in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<StarterEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_changes(&self) -> Vec<(MotorState, MotorState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StarterEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn faults(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StarterEvent::FaultRaised(text) => Some(*text),
                _ => None,
            })
            .collect()
    }

    pub fn telemetry(&self) -> Vec<&TelemetryData> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StarterEvent::Telemetry(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &StarterEvent) {
        self.events.push(event.clone());
    }
}

// ── MemoryConfig ──────────────────────────────────────────────

/// In-memory [`ConfigPort`] that validates like the file adapter.
#[derive(Debug, Default)]
pub struct MemoryConfig {
    stored: RefCell<Option<StarterConfig>>,
}

#[allow(dead_code)]
impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `config` without validation, as a corrupted backend would.
    pub fn with_raw(config: StarterConfig) -> Self {
        Self {
            stored: RefCell::new(Some(config)),
        }
    }
}

impl ConfigPort for MemoryConfig {
    fn load(&self) -> Result<StarterConfig, ConfigError> {
        Ok(self.stored.borrow().clone().unwrap_or_default())
    }

    fn save(&self, config: &StarterConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.stored.borrow_mut() = Some(config.clone());
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Default configuration with periodic telemetry disabled.
pub fn quiet_config() -> StarterConfig {
    StarterConfig {
        telemetry_interval_ms: 0,
        ..StarterConfig::default()
    }
}

pub fn make_starter() -> MotorStarter<RecordingSink> {
    MotorStarter::new(quiet_config(), RecordingSink::new())
}

pub fn make_starter_with(config: StarterConfig) -> MotorStarter<RecordingSink> {
    MotorStarter::new(config, RecordingSink::new())
}

/// Start from rest and run until the ramp has completed.
#[allow(dead_code)]
pub fn running_starter() -> MotorStarter<RecordingSink> {
    let mut starter = make_starter();
    starter.press_start();
    starter.release_start();
    starter.advance_by(2_100);
    assert_eq!(starter.state(), MotorState::Running);
    starter
}
