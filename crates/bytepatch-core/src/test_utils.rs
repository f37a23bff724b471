//! Test utilities shared by the module test suites

use crate::PatchFormat;
use crate::apply::apply_edits;
use crate::edits::EditMap;
use std::fmt::Debug;

/// Test round-trip serialization for a format instance
///
/// Verifies that a format can be serialized and deserialized back
/// to an equivalent value.
pub fn test_round_trip<T>(original: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: PatchFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data)?;

    if original != &parsed {
        return Err(format!(
            "Round-trip verification failed:\nOriginal: {:?}\nParsed: {:?}",
            original, parsed
        )
        .into());
    }

    Ok(())
}

/// Apply `edits` to a copy of `data`
pub fn apply_to_copy(edits: &EditMap, data: &[u8]) -> Vec<u8> {
    let mut output = data.to_vec();
    apply_edits(edits, &mut output).expect("Edits should fit the buffer");
    output
}

/// Byte-level view of what `edits` write, `None` where nothing is written
pub fn materialize(edits: &EditMap) -> Vec<Option<u8>> {
    let mut view = vec![None; edits.min_target_length()];
    for run in edits.iter() {
        let start = run.offset as usize;
        for (i, &byte) in run.bytes.iter().enumerate() {
            view[start + i] = Some(byte);
        }
    }
    view
}
