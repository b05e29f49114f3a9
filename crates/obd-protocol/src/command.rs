//! Command classification
//!
//! An adapter receives two kinds of text commands: AT directives that
//! configure the adapter itself, and OBD requests forwarded to the vehicle.
//! This module only covers Mode 01 requests (`01` followed by a PID code).

/// Two-character prefix of a Mode 01 (current data) request
pub const MODE_01_PREFIX: &str = "01";

/// Reply line for any command the adapter does not understand
pub const NOT_SUPPORTED: &str = "NOT SUPPORTED";

/// AT directives recognized by exact match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtCommand {
    /// `ATSP0`: select protocol automatically
    SelectProtocolAuto,
    /// `AT@1`: display device description
    DeviceDescription,
    /// `AT RV`: read input voltage
    ReadVoltage,
}

impl AtCommand {
    /// Every recognized directive
    pub const ALL: [AtCommand; 3] = [
        AtCommand::SelectProtocolAuto,
        AtCommand::DeviceDescription,
        AtCommand::ReadVoltage,
    ];

    /// Literal command text
    pub fn as_str(&self) -> &'static str {
        match self {
            AtCommand::SelectProtocolAuto => "ATSP0",
            AtCommand::DeviceDescription => "AT@1",
            AtCommand::ReadVoltage => "AT RV",
        }
    }

    /// Match a command by exact string equality
    pub fn from_exact(command: &str) -> Option<AtCommand> {
        Self::ALL.into_iter().find(|at| at.as_str() == command)
    }
}

/// A classified command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// A recognized AT directive
    At(AtCommand),
    /// A Mode 01 request; `pid` is everything after the mode prefix
    CurrentData { pid: &'a str },
    /// Anything else
    Unsupported(&'a str),
}

impl<'a> Command<'a> {
    /// Classify a raw command string
    ///
    /// AT directives are matched exactly before the Mode 01 prefix is tried,
    /// so no directive can be shadowed by a request.
    pub fn classify(raw: &'a str) -> Self {
        if let Some(at) = AtCommand::from_exact(raw) {
            return Command::At(at);
        }
        match raw.strip_prefix(MODE_01_PREFIX) {
            Some(pid) => Command::CurrentData { pid },
            None => Command::Unsupported(raw),
        }
    }
}
