//! Result envelope for mocked commands

use std::time::Duration;

use obd_protocol::{DeviceError, RawResult};

const BANNER: &str = "=======================================";

/// How the dispatcher answered a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Constant reply (AT directive or fixed PID)
    Fixed,
    /// Reply taken from the waveform generator
    Cyclic,
    /// The "NOT SUPPORTED" sentinel
    Unsupported,
}

/// Reply lines of one mocked command plus timing placeholders
///
/// Timings are always zero; they exist so callers can read a mocked result
/// the same way they read one from a real transport.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResult {
    input: String,
    outputs: Vec<String>,
    kind: ResponseKind,
    error: Option<DeviceError>,
    write_time: Duration,
    read_time: Duration,
    total_time: Duration,
}

impl MockResult {
    /// A successful result
    pub fn new(input: impl Into<String>, kind: ResponseKind, outputs: Vec<String>) -> Self {
        Self {
            input: input.into(),
            outputs,
            kind,
            error: None,
            write_time: Duration::ZERO,
            read_time: Duration::ZERO,
            total_time: Duration::ZERO,
        }
    }

    /// A failed result with no reply lines
    pub fn failure(input: impl Into<String>, kind: ResponseKind, error: DeviceError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(input, kind, Vec::new())
        }
    }

    /// The command text that produced this result
    pub fn input(&self) -> &str {
        &self.input
    }

    /// How the command was answered
    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// Whether the command failed
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&DeviceError> {
        self.error.as_ref()
    }

    /// Reply lines
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Consume the result, keeping only the reply lines
    pub fn into_outputs(self) -> Vec<String> {
        self.outputs
    }

    /// Time spent writing the command (always zero)
    pub fn write_time(&self) -> Duration {
        self.write_time
    }

    /// Time spent reading the reply (always zero)
    pub fn read_time(&self) -> Duration {
        self.read_time
    }

    /// Total round-trip time (always zero)
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// Banner naming the mocked command
    pub fn format_overview(&self) -> String {
        format!("{BANNER}\n Mocked command \"{}\"\n{BANNER}", self.input)
    }
}

impl RawResult for MockResult {
    fn error(&self) -> Option<&DeviceError> {
        MockResult::error(self)
    }

    fn outputs(&self) -> &[String] {
        MockResult::outputs(self)
    }

    fn format_overview(&self) -> String {
        MockResult::format_overview(self)
    }
}
