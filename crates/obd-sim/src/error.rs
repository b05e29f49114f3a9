//! Error types for the simulator

use thiserror::Error;

/// Errors that can occur while setting up or serving a mock device
#[derive(Debug, Error)]
pub enum SimError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("invalid device config: {0}")]
    Config(#[from] serde_json::Error),
}
