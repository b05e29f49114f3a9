//! Error types for OBD-II frame parsing and device communication

use thiserror::Error;

/// Errors that can occur while parsing a response frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token was not a two-digit hex byte
    #[error("invalid hex byte: {0:?}")]
    InvalidHex(String),

    /// Frame has fewer bytes than mode + PID
    #[error("frame too short: {len} bytes")]
    FrameTooShort { len: usize },

    /// Mode byte is not a Mode 01 response
    #[error("unexpected mode byte: 0x{0:02X}")]
    UnexpectedMode(u8),

    /// PID is not one this crate knows how to describe
    #[error("unknown PID: 0x{0:02X}")]
    UnknownPid(u8),

    /// Data length does not match the PID definition
    #[error("PID 0x{pid:02X} expects {expected} data bytes, got {actual}")]
    DataLength {
        pid: u8,
        expected: usize,
        actual: usize,
    },
}

/// Errors a diagnostics device can report for a command
///
/// The simulator only ever produces `Parse`. The other variants belong to
/// the `RawDevice` contract and are reported by adapters on a real bus.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The adapter did not answer in time (real transports only)
    #[error("communication timeout after {0}ms")]
    Timeout(u64),

    /// The vehicle bus produced no answer for the request (real transports only)
    #[error("no data for command: {0}")]
    NoData(String),

    /// The adapter rejected the command (real transports only)
    #[error("unsupported command: {0}")]
    Unsupported(String),
}
