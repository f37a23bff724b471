//! Run extraction from an original/modified buffer pair
//!
//! The scan walks both buffers once. Every maximal stretch of differing
//! bytes becomes one run holding the modified bytes. Matching bytes are
//! never folded into a run, so the result is the smallest set of edits that
//! turns the original into the modified buffer.

use crate::edits::EditMap;
use crate::error::{PatchError, PatchResult};
use tracing::debug;

/// Extract the edits that turn `original` into `modified`
///
/// Both buffers must have the same length. Runs longer than the run length
/// cap are stored as consecutive chunks.
///
/// ```rust
/// use bytepatch_core::extract_edits;
///
/// let edits = extract_edits(b"Hello, World!", b"Hello, Rust!!")?;
/// assert_eq!(edits.len(), 1);
/// # Ok::<(), bytepatch_core::PatchError>(())
/// ```
pub fn extract_edits(original: &[u8], modified: &[u8]) -> PatchResult<EditMap> {
    if original.len() != modified.len() {
        return Err(PatchError::LengthMismatch {
            original: original.len(),
            modified: modified.len(),
        });
    }

    let mut edits = EditMap::new();
    for (start, end) in mismatch_ranges(original, modified) {
        let offset = i64::try_from(start).map_err(|_| PatchError::OffsetOverflow {
            offset: i64::MAX,
            length: end - start,
        })?;
        edits.insert(offset, &modified[start..end])?;
    }
    edits.compact()?;

    debug!(
        "Extracted {} runs covering {} changed bytes",
        edits.len(),
        edits.changed_bytes()
    );

    Ok(edits)
}

/// Half-open ranges where the two equal-length buffers differ
fn mismatch_ranges(original: &[u8], modified: &[u8]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut pos = 0usize;
    let len = original.len();

    while pos < len {
        if original[pos] == modified[pos] {
            pos += 1;
            continue;
        }

        let start = pos;
        while pos < len && original[pos] != modified[pos] {
            pos += 1;
        }
        ranges.push((start, pos));
    }

    ranges
}
