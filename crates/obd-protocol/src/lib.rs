//! OBD-II Protocol Library
//!
//! This crate provides the vocabulary shared by OBD-II adapter clients and
//! simulated adapters:
//!
//! - **Commands**: classification of AT directives and Mode 01 requests
//! - **PIDs**: wire codes, data lengths and standard scale/offset decoding
//! - **Frames**: formatting and parsing of `41 <PID> <data>` reply lines
//! - **Transport contract**: [`RawDevice`] and [`RawResult`], implemented by
//!   real transports and by simulators alike
//!
//! # Example
//!
//! ```rust
//! use obd_protocol::{Command, Pid, ResponseFrame};
//!
//! assert_eq!(Command::classify("010C"), Command::CurrentData { pid: "0C" });
//!
//! let frame = ResponseFrame::parse("41 0C 13 40").unwrap();
//! assert_eq!(frame.pid(), Pid::EngineSpeed);
//! assert_eq!(frame.value(), Some(1232.0));
//! ```

pub mod command;
pub mod error;
pub mod frame;
pub mod pid;

pub use command::{AtCommand, Command, MODE_01_PREFIX, NOT_SUPPORTED};
pub use error::{DeviceError, ParseError};
pub use frame::{ResponseFrame, MODE_01_RESPONSE};
pub use pid::Pid;

/// Outcome of running one raw command against a device
///
/// Carries the reply lines together with enough context to explain a
/// failure. Object-safe so callers can hold `Box<dyn RawResult>` without
/// caring whether the device is real or simulated.
pub trait RawResult: Send {
    /// Whether the command failed
    fn failed(&self) -> bool {
        self.error().is_some()
    }

    /// The error that made the command fail, if any
    fn error(&self) -> Option<&DeviceError>;

    /// Reply lines in the order the device produced them
    fn outputs(&self) -> &[String];

    /// Human-readable summary of what ran
    fn format_overview(&self) -> String;
}

/// A device that accepts raw AT/OBD commands
pub trait RawDevice {
    /// Run a command and collect the reply
    fn run_command(&mut self, command: &str) -> Box<dyn RawResult>;
}
