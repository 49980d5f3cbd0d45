//! # CLI Error Type
//!
//! Everything that can end the binary early.
//!
//! ## Error Flow
//! ```text
//! ConfigError ─────┐
//! CoreError ───────┼──► CliError ──► stderr message + exit status
//! io::Error ───────┤
//! serde_json ──────┘
//! ```
//! Recoverable core errors never get here: the session driver reports them
//! and asks again.

use std::io;

use thiserror::Error;
use vending_core::CoreError;

use crate::config::ConfigError;

/// Exit status constants.
pub mod codes {
    /// Session completed.
    pub const SUCCESS: u8 = 0;

    /// Unexpected failure (I/O, serialization, session misuse).
    pub const FAILURE: u8 = 1;

    /// Environment or argument configuration is invalid.
    pub const CONFIG_ERROR: u8 = 2;

    /// Input ended before the session could settle.
    pub const INPUT_CLOSED: u8 = 3;
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] CoreError),

    #[error("Console I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Could not serialize receipt: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => codes::CONFIG_ERROR,
            CliError::Session(CoreError::InputClosed(_)) => codes::INPUT_CLOSED,
            CliError::Session(_) | CliError::Io(_) | CliError::Json(_) => codes::FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vending_core::PromptKind;

    #[test]
    fn test_exit_codes() {
        let err = CliError::from(ConfigError::InvalidValue("VENDING_OUTPUT".to_string()));
        assert_eq!(err.exit_code(), codes::CONFIG_ERROR);

        let err = CliError::from(CoreError::InputClosed(PromptKind::Selection));
        assert_eq!(err.exit_code(), codes::INPUT_CLOSED);
        assert_eq!(
            err.to_string(),
            "Session error: Input closed while waiting for product selection"
        );

        let err = CliError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(err.exit_code(), codes::FAILURE);
    }
}
