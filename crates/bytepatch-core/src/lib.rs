//! Patch engine for fixed-length binary patches
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format fields
#![allow(clippy::cast_possible_wrap)] // Offsets are range-checked before narrowing
#![allow(clippy::cast_precision_loss)] // Summary percentages
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! This crate computes the byte edits between two equal-length buffers,
//! stores them in a compact run-based container, and applies them back onto
//! a target buffer or file.
//!
//! # Container Format
//!
//! ```text
//! Patch File:
//! ├── Header (15 bytes, little-endian)
//! │   ├── Target Identifier (13 bytes, ASCII, NUL-padded)
//! │   └── Run Count (2 bytes, u16)
//! ├── Runs (Run Count times)
//! │   ├── Offset (4 bytes, i32)
//! │   ├── Length (1 byte, 1..=255)
//! │   └── Replacement Bytes (Length bytes)
//! └── Comment (remaining bytes, UTF-8, optional)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use bytepatch_core::PatchDocument;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let original = std::fs::read("game_v1.exe")?;
//! let modified = std::fs::read("game_v2.exe")?;
//!
//! let mut patch = PatchDocument::from_buffers(&original, &modified)?;
//! patch.set_target_name("game.exe");
//! patch.set_comment(Some("Skips the intro movie"));
//! patch.save("game.pat")?;
//!
//! let patch = PatchDocument::load("game.pat")?;
//! patch.apply_to_path("game.exe")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design Principles
//!
//! - **Minimal Edits**: Only bytes that differ are stored
//! - **Compact Runs**: Touching runs are merged up to the 255-byte run cap
//! - **Fixed Layout**: Every field has a fixed width except the trailing comment
//! - **Round-Trip Guarantee**: parse(build(patch)) == patch

#![warn(missing_docs)]

mod apply;
mod codec;
mod diff;
mod document;
mod edits;
mod error;
mod header;
mod target_name;

pub use apply::{apply_edits, apply_edits_to_path, edits_applied};
pub use diff::extract_edits;
pub use document::{PatchBuilder, PatchDocument, PatchSummary};
pub use edits::{EditMap, EditRun, MAX_RUN_COUNT, MAX_RUN_LENGTH};
pub use error::{ErrorCategory, PatchError, PatchResult};
pub use header::{CONTAINER_HEADER_SIZE, ContainerHeader, RUN_HEADER_SIZE, RunHeader};
pub use target_name::{DEFAULT_TARGET_NAME, TARGET_NAME_FIELD_SIZE, TargetName};

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

/// Common format trait for types with a binary container representation
pub trait PatchFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
