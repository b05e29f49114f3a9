//! Mock adapter command dispatcher
//!
//! Classifies each command, answers AT directives from the device
//! configuration and routes Mode 01 requests through the PID table.

use std::path::Path;

use obd_protocol::{AtCommand, Command, RawDevice, RawResult, NOT_SUPPORTED};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimError;
use crate::result::{MockResult, ResponseKind};
use crate::table;
use crate::waveform::WaveformGenerator;

/// Configuration for creating a mock device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MockDeviceConfig {
    /// Display name/identifier
    pub id: String,
    /// Reply to `AT@1`
    #[serde(default = "default_description")]
    pub description: String,
    /// Reply to `AT RV`
    #[serde(default = "default_voltage")]
    pub voltage: String,
}

fn default_description() -> String {
    "OBDII by elm329@gmail.com".to_string()
}

fn default_voltage() -> String {
    "12.1234".to_string()
}

impl Default for MockDeviceConfig {
    fn default() -> Self {
        Self {
            id: "Mock Device".to_string(),
            description: default_description(),
            voltage: default_voltage(),
        }
    }
}

impl MockDeviceConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// A simulated adapter with its own waveform state
#[derive(Debug, Clone)]
pub struct MockDevice {
    config: MockDeviceConfig,
    waveform: WaveformGenerator,
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDevice {
    /// Create a mock device with default settings
    pub fn new() -> Self {
        Self::from_config(MockDeviceConfig::default())
    }

    /// Create a mock device from configuration
    pub fn from_config(config: MockDeviceConfig) -> Self {
        Self {
            config,
            waveform: WaveformGenerator::new(),
        }
    }

    /// Get the device's identifier
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Get the device configuration
    pub fn config(&self) -> &MockDeviceConfig {
        &self.config
    }

    /// Waveform state shared by engine speed and vehicle speed
    pub fn waveform(&self) -> &WaveformGenerator {
        &self.waveform
    }

    /// Rewind the waveform to its power-on state
    pub fn reset(&mut self) {
        self.waveform.reset();
    }

    /// Run a command and wrap the reply
    pub fn run(&mut self, command: &str) -> MockResult {
        match Command::classify(command) {
            Command::At(at) => {
                let line = self.at_reply(at);
                debug!("{}: {} -> {:?}", self.config.id, command, line);
                MockResult::new(command, ResponseKind::Fixed, vec![line])
            }
            Command::CurrentData { pid } => self.run_current_data(command, pid),
            Command::Unsupported(_) => unsupported(command),
        }
    }

    fn run_current_data(&mut self, command: &str, pid: &str) -> MockResult {
        let Some(entry) = table::lookup(pid) else {
            return unsupported(command);
        };
        let kind = if entry.reading.is_cyclic() {
            ResponseKind::Cyclic
        } else {
            ResponseKind::Fixed
        };

        match entry.respond(&mut self.waveform) {
            Ok(frame) => {
                debug!(
                    "{}: {} -> {} ({}, {:?})",
                    self.config.id,
                    command,
                    frame,
                    entry.pid.name(),
                    kind
                );
                MockResult::new(command, kind, vec![frame.to_string()])
            }
            Err(e) => MockResult::failure(command, kind, e.into()),
        }
    }

    fn at_reply(&self, at: AtCommand) -> String {
        match at {
            AtCommand::SelectProtocolAuto => "OK".to_string(),
            AtCommand::DeviceDescription => self.config.description.clone(),
            AtCommand::ReadVoltage => self.config.voltage.clone(),
        }
    }
}

fn unsupported(command: &str) -> MockResult {
    debug!("Unsupported command: {:?}", command);
    MockResult::new(
        command,
        ResponseKind::Unsupported,
        vec![NOT_SUPPORTED.to_string()],
    )
}

impl RawDevice for MockDevice {
    fn run_command(&mut self, command: &str) -> Box<dyn RawResult> {
        Box::new(self.run(command))
    }
}
