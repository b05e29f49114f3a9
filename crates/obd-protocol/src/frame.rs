//! Mode 01 response frames
//!
//! A frame is one reply line as an ELM-style adapter prints it: upper-case
//! hex byte pairs separated by single spaces, starting with the mode
//! response byte `41` and the PID byte.
//!
//! ```text
//! 41 0C 13 40
//! ^^ ^^ ^^^^^
//! |  |  data bytes (1-4)
//! |  PID
//! mode 01 response
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::pid::Pid;

/// Mode byte of a positive Mode 01 response (0x01 + 0x40)
pub const MODE_01_RESPONSE: u8 = 0x41;

/// A single Mode 01 response line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponseFrame {
    pid: Pid,
    data: Vec<u8>,
}

impl ResponseFrame {
    /// Build a frame for `pid` carrying `data`
    ///
    /// Fails if `data` does not have the length the PID defines.
    pub fn new(pid: Pid, data: &[u8]) -> Result<Self, ParseError> {
        if data.len() != pid.data_len() {
            return Err(ParseError::DataLength {
                pid: pid.code(),
                expected: pid.data_len(),
                actual: data.len(),
            });
        }
        Ok(Self {
            pid,
            data: data.to_vec(),
        })
    }

    /// Parse a frame from an adapter reply line
    ///
    /// Accepts upper- or lower-case hex and any run of whitespace between
    /// bytes. Extra trailing data bytes beyond the PID's length are rejected.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let bytes = line
            .split_whitespace()
            .map(parse_hex_byte)
            .collect::<Result<Vec<u8>, ParseError>>()?;

        if bytes.len() < 2 {
            return Err(ParseError::FrameTooShort { len: bytes.len() });
        }
        if bytes[0] != MODE_01_RESPONSE {
            return Err(ParseError::UnexpectedMode(bytes[0]));
        }

        let pid = Pid::from_code(bytes[1])?;
        Self::new(pid, &bytes[2..])
    }

    /// The PID this frame answers
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Data bytes after the PID byte
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Physical value carried by the frame, if the PID has one
    pub fn value(&self) -> Option<f64> {
        self.pid.decode(&self.data)
    }

    /// Bytes as they appear on the wire, mode byte first
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() + 2);
        bytes.push(MODE_01_RESPONSE);
        bytes.push(self.pid.code());
        bytes.extend_from_slice(&self.data);
        bytes
    }
}

impl fmt::Display for ResponseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.to_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for ResponseFrame {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_hex_byte(token: &str) -> Result<u8, ParseError> {
    if token.len() != 2 {
        return Err(ParseError::InvalidHex(token.into()));
    }
    u8::from_str_radix(token, 16).map_err(|_| ParseError::InvalidHex(token.into()))
}
