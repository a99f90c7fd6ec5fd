//! Inbound commands to the starter.
//!
//! These are the operator actions a control surface (or a script on the
//! command line) can request.  [`MotorStarter`](super::service::MotorStarter)
//! turns each one into a reducer [`Action`].

use core::str::FromStr;

use crate::error::CommandError;
use crate::fsm::Action;

/// Commands that external adapters can send into the starter core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarterCommand {
    PressStart,
    ReleaseStart,
    PressStop,
    ReleaseStop,
    EmergencyStop,
    ResetEmergencyStop,
    ToggleMcb,
    /// Simulate the overload relay tripping.
    TripOverload,
    ResetOverload,
    ResetRuntime,
    /// Inject a rotor speed sample (test and diagnostics only).
    SetRpm(u32),
}

impl StarterCommand {
    /// Every parameterless command with its command-line name.
    pub const NAMED: [(&'static str, Self); 10] = [
        ("press-start", Self::PressStart),
        ("release-start", Self::ReleaseStart),
        ("press-stop", Self::PressStop),
        ("release-stop", Self::ReleaseStop),
        ("emergency-stop", Self::EmergencyStop),
        ("reset-emergency-stop", Self::ResetEmergencyStop),
        ("toggle-mcb", Self::ToggleMcb),
        ("trip-overload", Self::TripOverload),
        ("reset-overload", Self::ResetOverload),
        ("reset-runtime", Self::ResetRuntime),
    ];

    /// The reducer action this command dispatches.
    pub fn into_action(self) -> Action {
        match self {
            Self::PressStart => Action::PressStart,
            Self::ReleaseStart => Action::ReleaseStart,
            Self::PressStop => Action::PressStop,
            Self::ReleaseStop => Action::ReleaseStop,
            Self::EmergencyStop => Action::TriggerEmergencyStop,
            Self::ResetEmergencyStop => Action::ResetEmergencyStop,
            Self::ToggleMcb => Action::ToggleMcb,
            Self::TripOverload => Action::TripOverload,
            Self::ResetOverload => Action::ResetOverload,
            Self::ResetRuntime => Action::ResetRuntime,
            Self::SetRpm(rpm) => Action::SetRpm(rpm),
        }
    }
}

impl FromStr for StarterCommand {
    type Err = CommandError;

    /// Parse a kebab-case command name, or `set-rpm=<value>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(value) = s.strip_prefix("set-rpm=") {
            return value
                .trim()
                .parse()
                .map(Self::SetRpm)
                .map_err(|_| CommandError::UnknownCommand);
        }
        Self::NAMED
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, cmd)| *cmd)
            .ok_or(CommandError::UnknownCommand)
    }
}

/// One step of an operator script: a command issued at a virtual time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub at_ms: u64,
    pub command: StarterCommand,
}

impl FromStr for ScriptStep {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (at, cmd) = s.split_once(':').ok_or(CommandError::MalformedStep)?;
        let at_ms = at
            .trim()
            .parse()
            .map_err(|_| CommandError::InvalidTimestamp)?;
        Ok(Self {
            at_ms,
            command: cmd.parse()?,
        })
    }
}

/// Parse `"<ms>:<command>,<ms>:<command>,…"` into steps sorted by time.
///
/// Steps sharing a timestamp keep their written order.  Empty segments
/// are skipped.
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>, CommandError> {
    let mut steps = script
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<ScriptStep>, _>>()?;
    steps.sort_by_key(|step| step.at_ms);
    Ok(steps)
}
