//! OBD-II Adapter Simulation Library
//!
//! This crate provides a deterministic stand-in for an ELM-style OBD-II
//! adapter so diagnostics clients can be tested without a vehicle. It
//! includes:
//!
//! - **MockDevice**: classifies AT directives and Mode 01 requests and
//!   answers them with realistic hex frames
//! - **WaveformGenerator**: the cyclic engine speed / vehicle speed signals
//! - **MockResult**: the reply envelope, implementing [`obd_protocol::RawResult`]
//! - **run_mock_device_task**: serves a MockDevice over an async byte stream
//!
//! # Example
//!
//! ```rust
//! use obd_sim::MockDevice;
//!
//! let mut device = MockDevice::new();
//!
//! assert_eq!(device.run("ATSP0").outputs(), &["OK".to_string()]);
//! assert_eq!(device.run("0105").outputs(), &["41 05 4F".to_string()]);
//!
//! // Engine speed walks through its waveform on every query
//! assert_eq!(device.run("010C").outputs(), &["41 0C 13 40".to_string()]);
//! assert_eq!(device.run("010C").outputs(), &["41 0C 15 28".to_string()]);
//! ```

pub mod device;
pub mod device_task;
pub mod error;
pub mod result;
pub mod table;
pub mod waveform;

pub use device::{MockDevice, MockDeviceConfig};
pub use device_task::{run_mock_device_task, MockDeviceCommand, MockDeviceEvent};
pub use error::SimError;
pub use result::{MockResult, ResponseKind};
pub use waveform::{WaveformGenerator, WAVEFORM_LEN};
