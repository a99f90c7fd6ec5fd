//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements  | Connects to                   |
//! |---------------|-------------|-------------------------------|
//! | `json_config` | ConfigPort  | JSON file on disk             |
//! | `log_sink`    | EventSink   | `log` facade (terminal)       |
//! | `time`        | ClockPort   | `std::time::Instant` / manual |

pub mod json_config;
pub mod log_sink;
pub mod time;

pub use json_config::JsonConfigFile;
pub use log_sink::LogEventSink;
pub use time::{HostClock, ManualClock};
