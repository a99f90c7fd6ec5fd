//! Fault and error types for the starter.
//!
//! Two families live here:
//!
//! - **Faults** ([`Interlock`], [`LatchedFault`]) are never returned as
//!   `Err`.  The reducer records their text in
//!   [`MotorSnapshot::fault_condition`](crate::fsm::MotorSnapshot) and the
//!   control surface renders it.
//! - **Errors** ([`Error`], [`CommandError`]) cover the fallible edges of
//!   the crate: configuration loading and parsing operator scripts.
//!
//! All variants are `Copy` so they travel through the reducer without
//! allocation.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Start interlocks
// ---------------------------------------------------------------------------

/// A start guard that failed.
///
/// Declared in reporting priority order: when several guards fail at once
/// only the first one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Interlock {
    /// Emergency stop latch is set.
    EmergencyActive,
    /// Overload relay latch is set.
    OverloadTripped,
    /// Main circuit breaker is open.
    McbOpen,
}

impl Interlock {
    /// Fault text shown on the control surface.
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmergencyActive => "Cannot start: Emergency stop is active",
            Self::OverloadTripped => "Cannot start: Overload tripped - reset required",
            Self::McbOpen => "Cannot start: MCB is open",
        }
    }
}

impl fmt::Display for Interlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ---------------------------------------------------------------------------
// Latched / forced faults
// ---------------------------------------------------------------------------

/// Faults raised by a protective action rather than a refused start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchedFault {
    /// Emergency stop pushed.
    EmergencyStop,
    /// Overload relay tripped.
    Overload,
    /// Breaker opened by the operator.
    McbOpened,
}

impl LatchedFault {
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmergencyStop => "EMERGENCY STOP ACTIVATED",
            Self::Overload => "OVERLOAD: Motor current exceeded safe limits",
            Self::McbOpened => "MCB opened",
        }
    }
}

impl fmt::Display for LatchedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ---------------------------------------------------------------------------
// Operator script errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Command name is not one of the operator actions.
    UnknownCommand,
    /// Script step is not `<ms>:<command>`.
    MalformedStep,
    /// Step timestamp is not a non-negative integer.
    InvalidTimestamp,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::MalformedStep => write!(f, "script step must be <ms>:<command>"),
            Self::InvalidTimestamp => write!(f, "invalid step timestamp"),
        }
    }
}

impl std::error::Error for CommandError {}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation outside the reducer funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// Operator command or script could not be parsed.
    Command(CommandError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interlock_priority_order() {
        let mut failing = [
            Interlock::McbOpen,
            Interlock::EmergencyActive,
            Interlock::OverloadTripped,
        ];
        failing.sort();
        assert_eq!(failing[0], Interlock::EmergencyActive);
        assert_eq!(failing[2], Interlock::McbOpen);
    }

    #[test]
    fn interlock_messages_name_the_cause() {
        assert!(Interlock::McbOpen.to_string().contains("MCB"));
        assert!(Interlock::OverloadTripped.to_string().contains("Overload"));
        assert!(Interlock::EmergencyActive.to_string().contains("Emergency"));
    }

    #[test]
    fn error_wraps_sources() {
        let e: Error = CommandError::UnknownCommand.into();
        assert_eq!(e.to_string(), "command: unknown command");
        let e: Error = ConfigError::ValidationFailed("rated_rpm must be > 0").into();
        assert!(e.to_string().starts_with("config: "));
    }
}
