//! Error types for patch operations
//!
//! Every failure is returned to the caller. Nothing in this crate retries,
//! recovers or logs an error on the caller's behalf.

use thiserror::Error;

/// Result type for patch operations
pub type PatchResult<T> = Result<T, PatchError>;

/// Coarse classification of a [`PatchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied an unusable argument
    InvalidArgument,
    /// Original and modified buffers differ in length
    LengthMismatch,
    /// Run count would exceed the 16-bit run count field
    CapacityExceeded,
    /// Container bytes are truncated or malformed
    Format,
    /// Underlying file read or write failed
    Io,
}

/// Errors that can occur during patch operations
#[derive(Error, Debug)]
pub enum PatchError {
    /// Negative offset passed to the edit store
    #[error("Invalid offset: {0} is negative")]
    NegativeOffset(i64),

    /// Run would extend beyond the largest offset the container can address
    #[error("Run at offset {offset} with {length} bytes extends past i32::MAX")]
    OffsetOverflow {
        /// Start offset of the run
        offset: i64,
        /// Length of the run
        length: usize,
    },

    /// Run with no replacement bytes
    #[error("Empty run at offset {offset}")]
    EmptyRun {
        /// Offset the run was inserted at
        offset: i64,
    },

    /// Buffer is shorter than the highest byte the patch writes
    #[error("Target too short: patch requires {required} bytes, buffer has {actual} bytes")]
    TargetTooShort {
        /// Minimum target length of the patch
        required: usize,
        /// Length of the supplied buffer
        actual: usize,
    },

    /// Original and modified buffers have different lengths
    #[error("Length mismatch: original has {original} bytes, modified has {modified} bytes")]
    LengthMismatch {
        /// Original buffer length
        original: usize,
        /// Modified buffer length
        modified: usize,
    },

    /// Too many runs for the 16-bit run count field
    #[error("Capacity exceeded: {requested} runs requested, limit is {limit}")]
    CapacityExceeded {
        /// Maximum run count
        limit: usize,
        /// Run count the operation would have produced
        requested: usize,
    },

    /// Stream ended before a field was complete
    #[error("Truncated container: {field} needs {needed} bytes, {available} available")]
    Truncated {
        /// Name of the field being read
        field: &'static str,
        /// Bytes required by the field
        needed: usize,
        /// Bytes left in the stream
        available: usize,
    },

    /// Trailing comment is not valid UTF-8
    #[error("Invalid comment encoding: {0}")]
    InvalidComment(#[from] std::string::FromUtf8Error),

    /// Stored target identifier contains non-ASCII bytes
    #[error("Invalid target identifier: {0:02X?}")]
    InvalidTargetName(Vec<u8>),

    /// Container run shares bytes with a run already read
    #[error("Overlapping run at offset {offset}: collides with run at offset {existing}")]
    OverlappingRun {
        /// Start offset of the offending run
        offset: i32,
        /// Start offset of the run it collides with
        existing: i32,
    },

    /// Container run declares zero payload bytes
    #[error("Zero-length run at offset {offset}")]
    ZeroLengthRun {
        /// Start offset of the offending run
        offset: i32,
    },

    /// Binary format error from binrw
    #[error("Binary format error: {0}")]
    BinaryFormat(binrw::Error),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// binrw wraps stream failures, possibly inside a backtrace; those stay I/O
// errors
impl From<binrw::Error> for PatchError {
    fn from(error: binrw::Error) -> Self {
        match error {
            binrw::Error::Io(io) => Self::Io(io),
            other => {
                let root_io = match other.root_cause() {
                    binrw::Error::Io(io) => Some(std::io::Error::new(io.kind(), io.to_string())),
                    _ => None,
                };
                root_io.map_or(Self::BinaryFormat(other), Self::Io)
            }
        }
    }
}

impl PatchError {
    /// Create a truncated stream error
    pub fn truncated(field: &'static str, needed: usize, available: usize) -> Self {
        Self::Truncated {
            field,
            needed,
            available,
        }
    }

    /// Map this error onto its category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NegativeOffset(_)
            | Self::OffsetOverflow { .. }
            | Self::EmptyRun { .. }
            | Self::TargetTooShort { .. } => ErrorCategory::InvalidArgument,
            Self::LengthMismatch { .. } => ErrorCategory::LengthMismatch,
            Self::CapacityExceeded { .. } => ErrorCategory::CapacityExceeded,
            Self::Truncated { .. }
            | Self::InvalidComment(_)
            | Self::InvalidTargetName(_)
            | Self::OverlappingRun { .. }
            | Self::ZeroLengthRun { .. }
            | Self::BinaryFormat(_) => ErrorCategory::Format,
            Self::Io(_) => ErrorCategory::Io,
        }
    }

    /// Check if this error indicates a truncated or malformed container
    pub fn is_format_error(&self) -> bool {
        self.category() == ErrorCategory::Format
    }

    /// Check if this error was caused by a bad caller argument
    pub fn is_invalid_argument(&self) -> bool {
        self.category() == ErrorCategory::InvalidArgument
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categorization() {
        let invalid = vec![
            PatchError::NegativeOffset(-1),
            PatchError::EmptyRun { offset: 4 },
            PatchError::TargetTooShort {
                required: 100,
                actual: 50,
            },
        ];
        for error in &invalid {
            assert!(error.is_invalid_argument(), "{error:?}");
            assert!(!error.is_format_error(), "{error:?}");
        }

        let format = vec![
            PatchError::truncated("run count", 2, 1),
            PatchError::ZeroLengthRun { offset: 0 },
            PatchError::InvalidTargetName(vec![0xFF]),
        ];
        for error in &format {
            assert!(error.is_format_error(), "{error:?}");
        }

        assert_eq!(
            PatchError::LengthMismatch {
                original: 1,
                modified: 2
            }
            .category(),
            ErrorCategory::LengthMismatch
        );
        assert_eq!(
            PatchError::Io(std::io::Error::other("disk")).category(),
            ErrorCategory::Io
        );
    }

    #[test]
    fn test_binrw_io_errors_stay_io() {
        let error = PatchError::from(binrw::Error::Io(std::io::Error::other("disk full")));
        assert!(matches!(error, PatchError::Io(_)));
        assert_eq!(error.category(), ErrorCategory::Io);

        let error = PatchError::from(binrw::Error::AssertFail {
            pos: 0,
            message: "bad magic".to_string(),
        });
        assert!(matches!(error, PatchError::BinaryFormat(_)));
        assert!(error.is_format_error());
    }

    #[test]
    fn test_error_display() {
        let error = PatchError::TargetTooShort {
            required: 100,
            actual: 50,
        };
        let message = error.to_string();
        assert!(message.contains("100"));
        assert!(message.contains("50"));

        let capacity = PatchError::CapacityExceeded {
            limit: 65535,
            requested: 65536,
        };
        assert!(capacity.to_string().contains("65536"));
    }
}
