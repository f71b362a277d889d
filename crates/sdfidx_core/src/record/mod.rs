//! SDF records and the delimiter rules that separate them.
//!
//! A record file is a sequence of records, each ending with a line that
//! holds `$$$$`. Two matching rules are in use:
//!
//! - the indexer and scanner require the whole line, stripped of ASCII
//!   whitespace, to equal `$$$$` ([`is_delimiter_line`])
//! - the offset reader stops at the first line that contains `$$$$`
//!   anywhere ([`contains_delimiter`])

mod lines;
mod reader;
mod scan;

pub use lines::{Line, LineReader};
pub use reader::{
    read_record_at, read_records_by_offset, read_records_with_stats, ReadOutcome,
    RECORD_READ_CHUNK,
};
pub use scan::{RecordScanner, RecordSpan};

use std::borrow::Cow;

/// The record delimiter.
pub const DELIMITER: &[u8; 4] = b"$$$$";

/// Returns true if `line`, stripped of surrounding ASCII whitespace, is
/// exactly the delimiter.
#[must_use]
pub fn is_delimiter_line(line: &[u8]) -> bool {
    line.trim_ascii() == DELIMITER
}

/// Returns true if the delimiter occurs anywhere in `line`.
#[must_use]
pub fn contains_delimiter(line: &[u8]) -> bool {
    line.windows(DELIMITER.len()).any(|w| w == DELIMITER)
}

/// One record, including its trailing delimiter line.
///
/// Records are raw bytes. [`Record::text`] decodes them for callers that
/// need a string, replacing invalid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    bytes: Vec<u8>,
    source_offset: Option<u64>,
}

impl Record {
    /// Creates a record from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            source_offset: None,
        }
    }

    /// Creates a record that remembers the offset it was read from.
    pub fn at_offset(bytes: impl Into<Vec<u8>>, offset: u64) -> Self {
        Self {
            bytes: bytes.into(),
            source_offset: Some(offset),
        }
    }

    /// Returns the record bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the record and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the record as text.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the record holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset in the source file, if the record was read from one.
    #[must_use]
    pub const fn source_offset(&self) -> Option<u64> {
        self.source_offset
    }

    /// Returns true if `needle` occurs in the record.
    #[must_use]
    pub fn contains(&self, needle: u8) -> bool {
        self.bytes.contains(&needle)
    }

    /// Returns true if the record ends with a delimiter line.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.bytes
            .trim_ascii_end()
            .rsplit(|&b| b == b'\n')
            .next()
            .is_some_and(is_delimiter_line)
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
