//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured starter events through
//! the `log` facade.  The host binary routes these to the terminal; a
//! panel or network adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::StarterEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`StarterEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &StarterEvent) {
        self.emitted += 1;
        match event {
            StarterEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={} | {:>4}/{} RPM | {} V {:.2} A | \
                     T={:.1}\u{00b0}C | KM={} MCB={} OL={} ES={} | run={}",
                    t.state,
                    t.rpm,
                    t.rated_rpm,
                    t.voltage_v,
                    t.current_a,
                    t.temperature_c,
                    if t.contactor_energized { "ON" } else { "off" },
                    if t.mcb_closed { "closed" } else { "OPEN" },
                    if t.overload_tripped { "TRIPPED" } else { "ok" },
                    if t.emergency_stop_active { "ACTIVE" } else { "ok" },
                    t.running_time,
                );
            }
            StarterEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            StarterEvent::FaultRaised(text) => {
                warn!("FAULT | {}", text);
            }
            StarterEvent::FaultCleared => {
                info!("FAULT | cleared");
            }
            StarterEvent::Started(state) => {
                info!("START | initial_state={}", state);
            }
        }
    }
}
