//! Fixed-width container records
//!
//! The container starts with a 15-byte header followed by one 5-byte run
//! header per run. Every integer is little-endian.

use crate::target_name::TARGET_NAME_FIELD_SIZE;
use binrw::{BinRead, BinWrite};

/// Size of [`ContainerHeader`] on disk
pub const CONTAINER_HEADER_SIZE: usize = TARGET_NAME_FIELD_SIZE + 2;

/// Size of [`RunHeader`] on disk
pub const RUN_HEADER_SIZE: usize = 5;

/// Container header (15 bytes, little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ContainerHeader {
    /// Target identifier, ASCII, NUL-padded
    pub target_name: [u8; TARGET_NAME_FIELD_SIZE],

    /// Number of runs that follow
    pub run_count: u16,
}

/// Per-run header (5 bytes, little-endian), followed by `length` payload
/// bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct RunHeader {
    /// Offset of the first replacement byte
    pub offset: i32,

    /// Payload length
    pub length: u8,
}

impl RunHeader {
    /// Offset one past the last byte this run writes
    pub fn end(&self) -> i64 {
        i64::from(self.offset) + i64::from(self.length)
    }
}
