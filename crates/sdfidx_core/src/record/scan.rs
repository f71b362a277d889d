//! Sequential record scanning.

use crate::error::CoreResult;
use crate::record::is_delimiter_line;
use crate::record::lines::LineReader;
use sdfidx_storage::StorageBackend;

/// Byte span of one record found by a sequential scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSpan {
    /// Offset of the record's first byte.
    pub start: u64,
    /// Offset immediately after the record.
    ///
    /// For a terminated record this is the position after its delimiter line.
    pub end: u64,
    /// False for a trailing chunk that ends the file without a delimiter.
    pub terminated: bool,
}

impl RecordSpan {
    /// Record length in bytes.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Returns true if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Walks a record file from the start and yields the span of every record.
///
/// A record ends at a line that is exactly `$$$$` after trimming. Content
/// after the last delimiter forms one more, unterminated record only if it
/// holds a non-blank line; trailing blank lines are ignored.
pub struct RecordScanner<'a> {
    lines: LineReader<'a>,
    record_start: u64,
    has_content: bool,
    done: bool,
}

impl<'a> RecordScanner<'a> {
    /// Creates a scanner over the whole backend.
    pub fn new(backend: &'a dyn StorageBackend, chunk_size: usize) -> Self {
        Self {
            lines: LineReader::new(backend, 0, chunk_size),
            record_start: 0,
            has_content: false,
            done: false,
        }
    }

    /// Offset of the next unread byte.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.lines.position()
    }

    /// Returns the next record span, or `None` when the file is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    pub fn next_span(&mut self) -> CoreResult<Option<RecordSpan>> {
        if self.done {
            return Ok(None);
        }

        while let Some(line) = self.lines.next_line()? {
            if is_delimiter_line(&line.bytes) {
                let span = RecordSpan {
                    start: self.record_start,
                    end: line.end,
                    terminated: true,
                };
                self.record_start = line.end;
                self.has_content = false;
                return Ok(Some(span));
            }
            if !line.is_blank() {
                self.has_content = true;
            }
        }

        self.done = true;
        if self.has_content {
            return Ok(Some(RecordSpan {
                start: self.record_start,
                end: self.lines.position(),
                terminated: false,
            }));
        }
        Ok(None)
    }
}

impl Iterator for RecordScanner<'_> {
    type Item = CoreResult<RecordSpan>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_span().transpose()
    }
}
