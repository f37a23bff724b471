//! Patch document: target identifier, comment and edits

use crate::apply::{apply_edits, apply_edits_to_path, edits_applied};
use crate::codec::{encoded_size, read_container, write_container};
use crate::diff::extract_edits;
use crate::edits::{EditMap, EditRun};
use crate::error::PatchResult;
use crate::target_name::TargetName;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// In-memory patch
///
/// Edits are compacted whenever a document is created, so the run list
/// reported by [`runs`](Self::runs) is the one that gets written.
#[derive(Debug, Clone, Default)]
pub struct PatchDocument {
    target_name: TargetName,
    comment: Option<String>,
    edits: EditMap,
    source_file: Option<PathBuf>,
}

impl PatchDocument {
    /// Create an empty patch with the default target identifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a patch from an original/modified buffer pair
    pub fn from_buffers(original: &[u8], modified: &[u8]) -> PatchResult<Self> {
        Ok(Self {
            edits: extract_edits(original, modified)?,
            ..Self::default()
        })
    }

    /// Create a patch from an existing edit map
    pub fn from_edits(mut edits: EditMap) -> PatchResult<Self> {
        edits.compact()?;
        Ok(Self {
            edits,
            ..Self::default()
        })
    }

    /// Load a patch from disk
    pub fn load<P: AsRef<Path>>(path: P) -> PatchResult<Self> {
        let path = path.as_ref();
        debug!("Loading patch from: {:?}", path);

        let file = std::fs::File::open(path)?;
        let mut document = Self::read(&mut BufReader::new(file))?;
        document.source_file = Some(path.to_path_buf());

        info!(
            "Loaded patch for {} with {} runs",
            document.target_name,
            document.edits.len()
        );
        Ok(document)
    }

    /// Read a patch from a stream, consuming it to the end
    pub fn read<R: Read>(reader: &mut R) -> PatchResult<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    /// Parse a patch held in memory
    pub fn parse(data: &[u8]) -> PatchResult<Self> {
        let decoded = read_container(data)?;
        Ok(Self {
            target_name: decoded.target_name,
            comment: decoded.comment,
            edits: decoded.edits,
            source_file: None,
        })
    }

    /// Save the patch to disk and remember `path` as its source
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> PatchResult<()> {
        let path = path.as_ref();
        debug!("Saving patch to: {:?}", path);

        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;

        self.source_file = Some(path.to_path_buf());
        info!(
            "Saved patch for {} with {} runs",
            self.target_name,
            self.edits.len()
        );
        Ok(())
    }

    /// Write the patch to a stream
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> PatchResult<()> {
        write_container(
            writer,
            &self.target_name,
            &self.edits,
            self.comment.as_deref(),
        )
    }

    /// Encode the patch to bytes
    pub fn to_bytes(&self) -> PatchResult<Vec<u8>> {
        let mut output = Vec::with_capacity(self.encoded_size());
        self.write(&mut std::io::Cursor::new(&mut output))?;
        Ok(output)
    }

    /// Apply the patch to `buffer` in place, returning the number of runs
    /// written
    pub fn apply(&self, buffer: &mut [u8]) -> PatchResult<usize> {
        apply_edits(&self.edits, buffer)
    }

    /// Return a patched copy of `data`
    pub fn apply_to_vec(&self, data: &[u8]) -> PatchResult<Vec<u8>> {
        let mut output = data.to_vec();
        apply_edits(&self.edits, &mut output)?;
        Ok(output)
    }

    /// Apply the patch to the file at `path` in place
    pub fn apply_to_path<P: AsRef<Path>>(&self, path: P) -> PatchResult<usize> {
        apply_edits_to_path(&self.edits, path.as_ref())
    }

    /// Check whether `buffer` already contains the patched bytes
    pub fn is_applied(&self, buffer: &[u8]) -> bool {
        edits_applied(&self.edits, buffer)
    }

    /// Target identifier
    pub fn target_name(&self) -> &TargetName {
        &self.target_name
    }

    /// Replace the target identifier with the normalized form of `name`
    pub fn set_target_name(&mut self, name: &str) {
        self.target_name = TargetName::normalize(name);
    }

    /// Free-text comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Replace the comment; empty or whitespace-only text clears it
    pub fn set_comment(&mut self, comment: Option<&str>) {
        self.comment = comment.and_then(normalize_comment);
    }

    /// Stored edits
    pub fn edits(&self) -> &EditMap {
        &self.edits
    }

    /// Runs in ascending offset order
    pub fn runs(&self) -> impl Iterator<Item = EditRun<'_>> + '_ {
        self.edits.iter()
    }

    /// Number of stored runs
    pub fn run_count(&self) -> usize {
        self.edits.len()
    }

    /// Smallest buffer length the patch can be applied to
    pub fn min_target_length(&self) -> usize {
        self.edits.min_target_length()
    }

    /// Size of the encoded container in bytes
    pub fn encoded_size(&self) -> usize {
        encoded_size(&self.edits, self.comment.as_deref())
    }

    /// Path the patch was last loaded from or saved to
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    /// Summarize the patch for display
    pub fn summary(&self) -> PatchSummary {
        PatchSummary {
            target_name: self.target_name.to_string(),
            has_comment: self.comment.is_some(),
            run_count: self.run_count(),
            changed_bytes: self.edits.changed_bytes(),
            min_target_length: self.min_target_length(),
            encoded_size: self.encoded_size(),
        }
    }
}

// Where a patch lives on disk is not part of its content
impl PartialEq for PatchDocument {
    fn eq(&self, other: &Self) -> bool {
        self.target_name == other.target_name
            && self.comment == other.comment
            && self.edits == other.edits
    }
}

impl Eq for PatchDocument {}

impl crate::PatchFormat for PatchDocument {
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::parse(data)?)
    }

    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.to_bytes()?)
    }
}

/// Builder for creating patches from an original/modified buffer pair
///
/// ```rust
/// use bytepatch_core::PatchBuilder;
///
/// let patch = PatchBuilder::new(b"Hello, World!".to_vec(), b"Hello, Rust!!".to_vec())
///     .target_name("hello.txt")
///     .comment("greeting fix")
///     .build()?;
///
/// assert_eq!(patch.target_name().as_str(), "HELLO.TXT");
/// assert_eq!(patch.apply_to_vec(b"Hello, World!")?, b"Hello, Rust!!");
/// # Ok::<(), bytepatch_core::PatchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PatchBuilder {
    original: Vec<u8>,
    modified: Vec<u8>,
    target_name: Option<String>,
    comment: Option<String>,
}

impl PatchBuilder {
    /// Create a new patch builder
    ///
    /// # Arguments
    /// * `original` - The data the patch is applied to
    /// * `modified` - The data the patch produces
    pub fn new(original: Vec<u8>, modified: Vec<u8>) -> Self {
        Self {
            original,
            modified,
            target_name: None,
            comment: None,
        }
    }

    /// Set the target file name (normalized when the patch is built)
    pub fn target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    /// Set the comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Build the patch
    pub fn build(&self) -> PatchResult<PatchDocument> {
        let mut document = PatchDocument::from_buffers(&self.original, &self.modified)?;
        if let Some(name) = &self.target_name {
            document.set_target_name(name);
        }
        document.set_comment(self.comment.as_deref());
        Ok(document)
    }
}

/// Summary of a patch for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSummary {
    /// Target identifier
    pub target_name: String,
    /// Whether a comment is attached
    pub has_comment: bool,
    /// Number of stored runs
    pub run_count: usize,
    /// Total replacement bytes
    pub changed_bytes: usize,
    /// Smallest buffer length the patch applies to
    pub min_target_length: usize,
    /// Encoded container size
    pub encoded_size: usize,
}

impl PatchSummary {
    /// Percentage of the container taken up by replacement bytes
    pub fn payload_percentage(&self) -> f64 {
        if self.encoded_size == 0 {
            return 0.0;
        }
        (self.changed_bytes as f64 / self.encoded_size as f64) * 100.0
    }
}

/// Drop comments that carry no visible text
pub(crate) fn normalize_comment(comment: &str) -> Option<String> {
    if comment.trim().is_empty() {
        None
    } else {
        Some(comment.to_string())
    }
}
