//! Port traits: the hexagonal boundary between the starter core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MotorStarter (domain)
//! ```
//!
//! Driven adapters (event sinks, configuration storage, clocks) implement
//! these traits.  [`MotorStarter`](super::service::MotorStarter) consumes
//! them via generics, so the core never touches the file system or the
//! wall clock directly.

use crate::config::StarterConfig;

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → control surface)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`StarterEvent`](super::events::StarterEvent)s
/// through this port.  This is the subscription surface a control panel
/// renders from.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::StarterEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists starter configuration.
///
/// Implementations MUST validate before returning or persisting.  Invalid
/// values are rejected with [`ConfigError::ValidationFailed`], not silently
/// clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`StarterConfig::default()`] if nothing
    /// is stored yet.
    fn load(&self) -> Result<StarterConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &StarterConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: monotonic time source)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
///
/// Only the outer loop reads it; the reducer receives time as an argument.
pub trait ClockPort {
    /// Milliseconds since an arbitrary fixed origin.  Never decreases.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
