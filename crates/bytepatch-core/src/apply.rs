//! Run application onto caller buffers and files
//!
//! Stored runs never overlap, so the order they are written in does not
//! matter. Application never resizes the target.

use crate::edits::EditMap;
use crate::error::{PatchError, PatchResult};
use std::path::Path;
use tracing::debug;

/// Write every run of `edits` into `buffer`, returning the number of runs
/// written
///
/// Fails without touching the buffer when it is shorter than the minimum
/// target length. An empty buffer is left alone.
pub fn apply_edits(edits: &EditMap, buffer: &mut [u8]) -> PatchResult<usize> {
    check_target_length(edits, buffer.len())?;
    if buffer.is_empty() {
        return Ok(0);
    }

    let mut written = 0;
    for run in edits.iter() {
        let start = run.offset as usize;
        buffer[start..start + run.len()].copy_from_slice(run.bytes);
        written += 1;
    }

    Ok(written)
}

/// Check whether `buffer` already holds every run's bytes
pub fn edits_applied(edits: &EditMap, buffer: &[u8]) -> bool {
    if buffer.len() < edits.min_target_length() {
        return false;
    }

    edits.iter().all(|run| {
        let start = run.offset as usize;
        &buffer[start..start + run.len()] == run.bytes
    })
}

/// Patch the file at `path` in place
///
/// The whole file is read and patched in memory before anything is written
/// back, so a file that is too short is never modified.
pub fn apply_edits_to_path(edits: &EditMap, path: &Path) -> PatchResult<usize> {
    debug!("Applying {} runs to: {:?}", edits.len(), path);

    let mut data = std::fs::read(path)?;
    let written = apply_edits(edits, &mut data)?;
    std::fs::write(path, &data)?;

    debug!("Wrote {} runs into {} bytes", written, data.len());
    Ok(written)
}

fn check_target_length(edits: &EditMap, actual: usize) -> PatchResult<()> {
    let required = edits.min_target_length();
    if actual < required {
        return Err(PatchError::TargetTooShort { required, actual });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_edits() -> EditMap {
        let mut edits = EditMap::new();
        edits.insert(2, b"XY").unwrap();
        edits.insert(90, &[0xEE; 10]).unwrap();
        edits
    }

    #[test]
    fn test_apply_writes_runs() {
        let edits = sample_edits();
        let mut buffer = vec![0u8; 120];

        let written = apply_edits(&edits, &mut buffer).expect("Apply should succeed");

        assert_eq!(written, 2);
        assert_eq!(&buffer[2..4], b"XY");
        assert_eq!(&buffer[90..100], &[0xEE; 10]);
        assert_eq!(buffer.len(), 120);
        assert!(buffer[100..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_minimum_length_enforcement() {
        let edits = sample_edits();
        assert_eq!(edits.min_target_length(), 100);

        let mut short = vec![0u8; 50];
        let err = apply_edits(&edits, &mut short).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(matches!(
            err,
            PatchError::TargetTooShort {
                required: 100,
                actual: 50
            }
        ));
        assert!(short.iter().all(|&b| b == 0));

        let mut exact = vec![0u8; 100];
        assert!(apply_edits(&edits, &mut exact).is_ok());
    }

    #[test]
    fn test_empty_buffer_with_empty_patch() {
        let edits = EditMap::new();
        let mut buffer: Vec<u8> = Vec::new();
        assert_eq!(apply_edits(&edits, &mut buffer).unwrap(), 0);
    }

    #[test]
    fn test_edits_applied() {
        let edits = sample_edits();
        let mut buffer = vec![0u8; 100];
        assert!(!edits_applied(&edits, &buffer));

        apply_edits(&edits, &mut buffer).unwrap();
        assert!(edits_applied(&edits, &buffer));
        assert!(!edits_applied(&edits, &buffer[..99]));
    }

    #[test]
    fn test_apply_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target.bin");
        std::fs::write(&path, vec![0u8; 128]).unwrap();

        let written = apply_edits_to_path(&sample_edits(), &path).unwrap();

        assert_eq!(written, 2);
        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), 128);
        assert_eq!(&data[2..4], b"XY");
    }

    #[test]
    fn test_apply_to_path_leaves_short_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, b"tiny").unwrap();

        let err = apply_edits_to_path(&sample_edits(), &path).unwrap_err();

        assert!(matches!(err, PatchError::TargetTooShort { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"tiny");
    }

    #[test]
    fn test_apply_to_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = apply_edits_to_path(&sample_edits(), &dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, PatchError::Io(_)));
    }
}
