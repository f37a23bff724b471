//! Error types for the command-line front end.
//!
//! Command failures are reported through `anyhow`; these are the
//! configuration problems detected before any file is touched.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An output path would overwrite one of the inputs
    #[error("Output {output} would overwrite input {input}")]
    OutputOverwritesInput {
        /// Output path
        output: PathBuf,
        /// Input path it collides with
        input: PathBuf,
    },

    /// A value is out of range
    #[error("Invalid {field}: {reason}")]
    InvalidValue {
        /// Argument name
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::OutputOverwritesInput {
            output: PathBuf::from("a.bin"),
            input: PathBuf::from("a.bin"),
        };
        assert_eq!(err.to_string(), "Output a.bin would overwrite input a.bin");

        let err = ConfigError::InvalidValue {
            field: "limit",
            reason: "must be greater than zero".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid limit: must be greater than zero");
    }
}
