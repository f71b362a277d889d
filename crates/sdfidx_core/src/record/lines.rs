//! Buffered line reader over a storage backend.

use crate::error::CoreResult;
use sdfidx_storage::StorageBackend;

/// A line read from a backend, with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line bytes, including the trailing `\n` if present.
    pub bytes: Vec<u8>,
    /// Offset of the first byte of the line.
    pub start: u64,
    /// Offset immediately after the line.
    pub end: u64,
}

impl Line {
    /// Returns true if the line has no non-whitespace bytes.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.bytes.trim_ascii().is_empty()
    }
}

/// Reads lines from a backend starting at a byte offset.
///
/// A line is everything up to and including `\n`, or the final unterminated
/// chunk at the end of the backend. Bytes are fetched in fixed-size chunks,
/// so memory use is bounded by the chunk size plus the longest line.
pub struct LineReader<'a> {
    backend: &'a dyn StorageBackend,
    /// Offset of the next line to be returned.
    position: u64,
    /// Offset of the next chunk to fetch.
    fetch_offset: u64,
    chunk_size: usize,
    buffer: Vec<u8>,
    buffer_pos: usize,
    exhausted: bool,
}

impl<'a> LineReader<'a> {
    /// Creates a reader positioned at `offset`.
    pub fn new(backend: &'a dyn StorageBackend, offset: u64, chunk_size: usize) -> Self {
        Self {
            backend,
            position: offset,
            fetch_offset: offset,
            chunk_size: chunk_size.max(1),
            buffer: Vec::new(),
            buffer_pos: 0,
            exhausted: false,
        }
    }

    /// Offset of the next unread byte.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next line, or `None` at end of the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    pub fn next_line(&mut self) -> CoreResult<Option<Line>> {
        let start = self.position;
        let mut bytes = Vec::new();

        loop {
            if self.buffer_pos >= self.buffer.len() && !self.fill()? {
                break;
            }

            let pending = &self.buffer[self.buffer_pos..];
            match pending.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    let taken = newline + 1;
                    bytes.extend_from_slice(&pending[..taken]);
                    self.buffer_pos += taken;
                    self.position += taken as u64;
                    return Ok(Some(Line {
                        bytes,
                        start,
                        end: self.position,
                    }));
                }
                None => {
                    let taken = pending.len();
                    bytes.extend_from_slice(pending);
                    self.buffer_pos += taken;
                    self.position += taken as u64;
                }
            }
        }

        if bytes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Line {
                bytes,
                start,
                end: self.position,
            }))
        }
    }

    /// Fetches the next chunk. Returns false at end of the backend.
    fn fill(&mut self) -> CoreResult<bool> {
        if self.exhausted {
            return Ok(false);
        }
        let chunk = self.backend.read_available(self.fetch_offset, self.chunk_size)?;
        if chunk.is_empty() {
            self.exhausted = true;
            self.buffer.clear();
            self.buffer_pos = 0;
            return Ok(false);
        }
        self.fetch_offset += chunk.len() as u64;
        self.buffer = chunk;
        self.buffer_pos = 0;
        Ok(true)
    }
}

impl Iterator for LineReader<'_> {
    type Item = CoreResult<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdfidx_storage::InMemoryBackend;

    fn collect(data: &[u8], offset: u64, chunk: usize) -> Vec<Line> {
        let backend = InMemoryBackend::with_data(data.to_vec());
        LineReader::new(&backend, offset, chunk)
            .collect::<CoreResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn reads_terminated_and_trailing_lines() {
        let lines = collect(b"ab\ncd\nef", 0, 64);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].bytes, b"ab\n");
        assert_eq!((lines[0].start, lines[0].end), (0, 3));
        assert_eq!(lines[1].bytes, b"cd\n");
        assert_eq!((lines[1].start, lines[1].end), (3, 6));
        assert_eq!(lines[2].bytes, b"ef");
        assert_eq!((lines[2].start, lines[2].end), (6, 8));
    }

    #[test]
    fn lines_span_chunk_boundaries() {
        let data = b"first line\nsecond\n\nlast\n";
        let whole = collect(data, 0, 1024);
        for chunk in [1, 2, 3, 5, 7] {
            assert_eq!(collect(data, 0, chunk), whole, "chunk size {chunk}");
        }
    }

    #[test]
    fn starts_mid_file() {
        let lines = collect(b"foo\nbar\n$$$$\n", 4, 2);
        let texts: Vec<&[u8]> = lines.iter().map(|l| l.bytes.as_slice()).collect();
        assert_eq!(texts, vec![&b"bar\n"[..], &b"$$$$\n"[..]]);
        assert_eq!(lines[0].start, 4);
    }

    #[test]
    fn empty_and_past_end() {
        assert!(collect(b"", 0, 8).is_empty());
        assert!(collect(b"abc\n", 4, 8).is_empty());
        assert!(collect(b"abc\n", 99, 8).is_empty());
    }

    #[test]
    fn position_tracks_consumed_bytes() {
        let backend = InMemoryBackend::with_data(b"a\r\nbb\n".to_vec());
        let mut reader = LineReader::new(&backend, 0, 4);

        assert_eq!(reader.position(), 0);
        reader.next_line().unwrap();
        assert_eq!(reader.position(), 3);
        reader.next_line().unwrap();
        assert_eq!(reader.position(), 6);
        assert!(reader.next_line().unwrap().is_none());
    }

    #[test]
    fn blank_lines() {
        let lines = collect(b"  \t\n\nx\n", 0, 8);
        assert!(lines[0].is_blank());
        assert!(lines[1].is_blank());
        assert!(!lines[2].is_blank());
    }
}
