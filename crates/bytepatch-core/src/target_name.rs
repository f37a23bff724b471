//! Target identifier stored in the container header
//!
//! The identifier names the file a patch is meant for. It is a short,
//! uppercase, ASCII-only name of at most 13 bytes: a stem of up to nine
//! characters, an optional dot, and an extension of up to three characters.

use crate::error::{PatchError, PatchResult};
use std::fmt;

/// Width of the identifier field in the container header
pub const TARGET_NAME_FIELD_SIZE: usize = 13;

/// Identifier used when no usable name remains after normalization
pub const DEFAULT_TARGET_NAME: &str = "UNKNOWNF.ILE";

const MAX_STEM_LEN: usize = 9;
const TRUNCATED_STEM_LEN: usize = 7;
const TRUNCATION_MARKER: &str = "~1";
const MAX_EXTENSION_LEN: usize = 3;

/// Normalized target identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetName(String);

impl TargetName {
    /// Normalize an arbitrary file name into a target identifier
    ///
    /// Whitespace, punctuation and non-ASCII characters are dropped and the
    /// rest is uppercased. The extension is the text after the last dot and
    /// is cut to three characters. A stem longer than nine characters keeps
    /// its first seven followed by `~1`. Anything that leaves an empty stem
    /// yields [`DEFAULT_TARGET_NAME`].
    ///
    /// ```rust
    /// use bytepatch_core::TargetName;
    ///
    /// let name = TargetName::normalize("my patch file!!.longext");
    /// assert_eq!(name.as_str(), "MYPATCH~1.LON");
    /// ```
    pub fn normalize(input: &str) -> Self {
        let (stem, extension) = match input.rfind('.') {
            Some(dot) => (&input[..dot], &input[dot + 1..]),
            None => (input, ""),
        };

        let mut stem = clean_segment(stem);
        if stem.is_empty() {
            return Self::default();
        }
        if stem.len() > MAX_STEM_LEN {
            stem.truncate(TRUNCATED_STEM_LEN);
            stem.push_str(TRUNCATION_MARKER);
        }

        let mut extension = clean_segment(extension);
        extension.truncate(MAX_EXTENSION_LEN);

        if extension.is_empty() {
            Self(stem)
        } else {
            Self(format!("{stem}.{extension}"))
        }
    }

    /// Decode the identifier from its fixed-width header field
    ///
    /// Trailing NUL padding is removed. An empty field decodes to the
    /// default identifier.
    pub fn from_field(field: &[u8]) -> PatchResult<Self> {
        let end = field
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        let raw = &field[..end];

        if !raw.is_ascii() {
            return Err(PatchError::InvalidTargetName(raw.to_vec()));
        }
        if raw.is_empty() {
            return Ok(Self::default());
        }

        Ok(Self(String::from_utf8_lossy(raw).into_owned()))
    }

    /// Encode the identifier as a NUL-padded header field
    pub fn to_field(&self) -> [u8; TARGET_NAME_FIELD_SIZE] {
        let mut field = [0u8; TARGET_NAME_FIELD_SIZE];
        let bytes = self.0.as_bytes();
        let len = bytes.len().min(TARGET_NAME_FIELD_SIZE);
        field[..len].copy_from_slice(&bytes[..len]);
        field
    }

    /// Get the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this is the placeholder identifier
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_TARGET_NAME
    }
}

impl Default for TargetName {
    fn default() -> Self {
        Self(DEFAULT_TARGET_NAME.to_string())
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TargetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn clean_segment(segment: &str) -> String {
    segment
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
