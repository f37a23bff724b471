//! Container encoding and decoding
//!
//! ```text
//! offset 0    13 bytes   target identifier, ASCII, NUL-padded
//! offset 13    2 bytes   run count N (u16)
//! N times      4 bytes   run offset (i32)
//!              1 byte    run length L (u8, 1..=255)
//!              L bytes   replacement bytes
//! trailing     rest      optional UTF-8 comment, no terminator
//! ```

use crate::edits::{EditMap, MAX_RUN_COUNT};
use crate::error::{PatchError, PatchResult};
use crate::header::{CONTAINER_HEADER_SIZE, ContainerHeader, RUN_HEADER_SIZE, RunHeader};
use crate::target_name::TargetName;
use binrw::{BinRead, BinWrite};
use std::io::{Cursor, Read, Seek, Write};

/// Fields decoded from a container
#[derive(Debug)]
pub(crate) struct DecodedContainer {
    pub target_name: TargetName,
    pub edits: EditMap,
    pub comment: Option<String>,
}

/// Decode a complete container held in memory
///
/// Runs may appear in any order but must not overlap and must carry at
/// least one byte each. The edits are compacted before they are returned.
pub(crate) fn read_container(data: &[u8]) -> PatchResult<DecodedContainer> {
    let mut cursor = Cursor::new(data);

    require(&cursor, CONTAINER_HEADER_SIZE, "container header")?;
    let header = ContainerHeader::read(&mut cursor)?;
    let target_name = TargetName::from_field(&header.target_name)?;

    let mut edits = EditMap::new();

    for _ in 0..header.run_count {
        require(&cursor, RUN_HEADER_SIZE, "run header")?;
        let run = RunHeader::read(&mut cursor)?;

        if run.length == 0 {
            return Err(PatchError::ZeroLengthRun { offset: run.offset });
        }
        let length = usize::from(run.length);
        if let Some(existing) = edits.find_overlap(run.offset, length) {
            return Err(PatchError::OverlappingRun {
                offset: run.offset,
                existing,
            });
        }

        require(&cursor, length, "run payload")?;
        let mut payload = vec![0u8; length];
        cursor.read_exact(&mut payload)?;

        edits.insert(i64::from(run.offset), &payload)?;
    }

    let mut trailing = Vec::new();
    cursor.read_to_end(&mut trailing)?;
    let comment = if trailing.is_empty() {
        None
    } else {
        crate::document::normalize_comment(&String::from_utf8(trailing)?)
    };

    edits.compact()?;

    Ok(DecodedContainer {
        target_name,
        edits,
        comment,
    })
}

/// Encode a container, compacting the edits first
pub(crate) fn write_container<W: Write + Seek>(
    writer: &mut W,
    target_name: &TargetName,
    edits: &EditMap,
    comment: Option<&str>,
) -> PatchResult<()> {
    let edits = edits.compacted()?;
    let run_count = u16::try_from(edits.len()).map_err(|_| PatchError::CapacityExceeded {
        limit: MAX_RUN_COUNT,
        requested: edits.len(),
    })?;

    ContainerHeader {
        target_name: target_name.to_field(),
        run_count,
    }
    .write(writer)?;

    for run in edits.iter() {
        // EditMap keeps every run within 1..=255 bytes
        RunHeader {
            offset: run.offset,
            length: run.len() as u8,
        }
        .write(writer)?;
        writer.write_all(run.bytes)?;
    }

    if let Some(comment) = comment {
        writer.write_all(comment.as_bytes())?;
    }

    Ok(())
}

/// Number of bytes [`write_container`] produces for already compact edits
pub(crate) fn encoded_size(edits: &EditMap, comment: Option<&str>) -> usize {
    CONTAINER_HEADER_SIZE
        + edits
            .iter()
            .map(|run| RUN_HEADER_SIZE + run.len())
            .sum::<usize>()
        + comment.map_or(0, str::len)
}

fn require(cursor: &Cursor<&[u8]>, needed: usize, field: &'static str) -> PatchResult<()> {
    let available = cursor
        .get_ref()
        .len()
        .saturating_sub(cursor.position() as usize);
    if available < needed {
        return Err(PatchError::truncated(field, needed, available));
    }
    Ok(())
}
