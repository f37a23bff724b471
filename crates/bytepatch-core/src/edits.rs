//! Ordered edit store and run compaction
//!
//! An [`EditMap`] maps byte offsets to replacement runs. Keys are unique and
//! iterate in ascending order. Each stored run holds between 1 and
//! [`MAX_RUN_LENGTH`] bytes, because the container records a run's length in
//! a single byte, and the map never holds more than [`MAX_RUN_COUNT`] runs,
//! because the container records the run count in 16 bits.
//!
//! # Compaction
//!
//! [`EditMap::compact`] coalesces runs that touch end-to-start. A group is
//! opened by a run shorter than the cap and extends over every contiguous
//! successor. The group's bytes are concatenated and re-chunked at the cap,
//! so a stretch of `n` contiguous bytes that starts with a short run ends up
//! as `ceil(n / 255)` runs. A full-length run never opens a group.
//!
//! ```text
//! before:  [0..10) [10..265) [265..275)      3 runs, 275 bytes
//! after:   [0..255) [255..275)               2 runs
//! ```

use crate::error::{PatchError, PatchResult};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Bound;
use tracing::trace;

/// Maximum payload length of a single run
pub const MAX_RUN_LENGTH: usize = u8::MAX as usize;

/// Maximum number of runs a container can describe
pub const MAX_RUN_COUNT: usize = u16::MAX as usize;

/// Borrowed view of one stored run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRun<'a> {
    /// Offset of the first replacement byte
    pub offset: i32,
    /// Replacement bytes
    pub bytes: &'a [u8],
}

impl EditRun<'_> {
    /// Number of replacement bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the run has no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset one past the last replacement byte
    pub fn end(&self) -> i64 {
        i64::from(self.offset) + self.bytes.len() as i64
    }

    /// Check if the run is at the length cap
    pub fn is_full(&self) -> bool {
        self.bytes.len() >= MAX_RUN_LENGTH
    }

    /// Get replacement bytes as hex string for display
    pub fn hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

/// Ordered, offset-keyed set of replacement runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditMap {
    runs: BTreeMap<i32, Vec<u8>>,
}

impl EditMap {
    /// Create an empty edit map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored runs
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Check if no runs are stored
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Store `run` at `offset`, split into chunks of at most
    /// [`MAX_RUN_LENGTH`] bytes
    ///
    /// Each chunk is keyed by its own start offset. A chunk landing on an
    /// existing key replaces that entry. The map is left untouched when the
    /// insertion fails.
    pub fn insert(&mut self, offset: i64, run: &[u8]) -> PatchResult<()> {
        if offset < 0 {
            return Err(PatchError::NegativeOffset(offset));
        }
        if run.is_empty() {
            return Err(PatchError::EmptyRun { offset });
        }

        let last_byte = i64::try_from(run.len())
            .ok()
            .and_then(|len| offset.checked_add(len - 1));
        let start = match last_byte {
            Some(last) if last <= i64::from(i32::MAX) => offset as i32,
            _ => {
                return Err(PatchError::OffsetOverflow {
                    offset,
                    length: run.len(),
                });
            }
        };

        let chunks: Vec<(i32, &[u8])> = run
            .chunks(MAX_RUN_LENGTH)
            .enumerate()
            .map(|(index, chunk)| (start + (index * MAX_RUN_LENGTH) as i32, chunk))
            .collect();

        let new_keys = chunks
            .iter()
            .filter(|(key, _)| !self.runs.contains_key(key))
            .count();
        let requested = self.runs.len() + new_keys;
        if requested > MAX_RUN_COUNT {
            return Err(PatchError::CapacityExceeded {
                limit: MAX_RUN_COUNT,
                requested,
            });
        }

        for (key, chunk) in chunks {
            self.runs.insert(key, chunk.to_vec());
        }

        Ok(())
    }

    /// Get the run stored at exactly `offset`
    pub fn get(&self, offset: i32) -> Option<&[u8]> {
        self.runs.get(&offset).map(Vec::as_slice)
    }

    /// Find a stored run sharing any byte with `[offset, offset + len)`,
    /// returning its start offset
    ///
    /// Only the nearest run at or before `offset` and the nearest run after
    /// it need checking, because stored runs never overlap each other.
    pub fn find_overlap(&self, offset: i32, len: usize) -> Option<i32> {
        let start = i64::from(offset);
        let end = start + len as i64;

        let before = self
            .runs
            .range(..=offset)
            .next_back()
            .filter(|(key, bytes)| i64::from(**key) + bytes.len() as i64 > start);
        let after = self
            .runs
            .range((Bound::Excluded(offset), Bound::Unbounded))
            .next()
            .filter(|(key, _)| i64::from(**key) < end);

        before.or(after).map(|(key, _)| *key)
    }

    /// Iterate runs in ascending offset order
    pub fn iter(&self) -> impl Iterator<Item = EditRun<'_>> + '_ {
        self.runs
            .iter()
            .map(|(&offset, bytes)| EditRun { offset, bytes })
    }

    /// Smallest buffer length every run fits into
    pub fn min_target_length(&self) -> usize {
        self.iter()
            .map(|run| run.end() as usize)
            .max()
            .unwrap_or(0)
    }

    /// Total number of replacement bytes
    pub fn changed_bytes(&self) -> usize {
        self.runs.values().map(Vec::len).sum()
    }

    /// Merge contiguous runs, returning how many groups were merged
    ///
    /// Running this on an already compact map does nothing.
    pub fn compact(&mut self) -> PatchResult<usize> {
        let groups = self.mergeable_groups();

        for group in &groups {
            let mut merged = Vec::new();
            for key in group {
                if let Some(bytes) = self.runs.remove(key) {
                    merged.extend_from_slice(&bytes);
                }
            }
            // Removal freed at least as many slots as re-chunking consumes
            self.insert(i64::from(group[0]), &merged)?;
        }

        if !groups.is_empty() {
            trace!(
                "Compacted {} run groups, {} runs remain",
                groups.len(),
                self.runs.len()
            );
        }

        Ok(groups.len())
    }

    /// Check whether [`compact`](Self::compact) would change anything
    pub fn is_compact(&self) -> bool {
        self.iter()
            .zip(self.iter().skip(1))
            .all(|(prev, next)| prev.is_full() || prev.end() != i64::from(next.offset))
    }

    /// Borrow this map if it is already compact, otherwise return a
    /// compacted copy
    pub fn compacted(&self) -> PatchResult<Cow<'_, Self>> {
        if self.is_compact() {
            return Ok(Cow::Borrowed(self));
        }

        let mut copy = self.clone();
        copy.compact()?;
        Ok(Cow::Owned(copy))
    }

    /// Collect keys of every group of two or more runs that should merge
    fn mergeable_groups(&self) -> Vec<Vec<i32>> {
        let mut groups = Vec::new();
        let mut current: Vec<i32> = Vec::new();
        let mut current_end = 0i64;

        for run in self.iter() {
            if !current.is_empty() && current_end == i64::from(run.offset) {
                current.push(run.offset);
                current_end = run.end();
                continue;
            }

            if current.len() > 1 {
                groups.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }

            if !run.is_full() {
                current.push(run.offset);
                current_end = run.end();
            }
        }

        if current.len() > 1 {
            groups.push(current);
        }

        groups
    }
}
