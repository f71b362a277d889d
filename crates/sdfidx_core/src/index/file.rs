//! Index file reading and writing.
//!
//! An index file is UTF-8 text with one decimal byte offset per line.

use crate::error::{CoreError, CoreResult};
use sdfidx_storage::{FileBackend, StorageBackend};
use std::path::Path;

/// Buffered bytes flushed to the sink in one append.
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Result of parsing index text line by line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexParse {
    /// Offsets in file order.
    pub offsets: Vec<u64>,
    /// 1-based line numbers of non-blank lines that are not offsets.
    pub malformed_lines: Vec<usize>,
}

/// Parses index text, recording malformed lines instead of failing.
///
/// Each line is trimmed and parsed as a base-10 `u64`. Blank lines are
/// ignored entirely.
#[must_use]
pub fn parse_index(data: &[u8]) -> IndexParse {
    let mut parse = IndexParse::default();

    for (number, line) in data.split(|&b| b == b'\n').enumerate() {
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        match parse_offset(line) {
            Some(offset) => parse.offsets.push(offset),
            None => parse.malformed_lines.push(number + 1),
        }
    }

    parse
}

fn parse_offset(line: &[u8]) -> Option<u64> {
    std::str::from_utf8(line).ok()?.parse().ok()
}

/// Reads an index file. Lines that are not offsets are skipped silently.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn read_index(index_path: &Path) -> CoreResult<Vec<u64>> {
    Ok(parse_index(&read_all(index_path)?).offsets)
}

/// Reads an index file, failing on the first line that is not an offset.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns [`CoreError::MalformedIndexLine`] for a bad line, or an I/O
/// error if the file cannot be read.
pub fn read_index_strict(index_path: &Path) -> CoreResult<Vec<u64>> {
    let data = read_all(index_path)?;
    let parse = parse_index(&data);

    if let Some(&line) = parse.malformed_lines.first() {
        let content = data
            .split(|&b| b == b'\n')
            .nth(line - 1)
            .map(|l| String::from_utf8_lossy(l.trim_ascii()).into_owned())
            .unwrap_or_default();
        return Err(CoreError::MalformedIndexLine { line, content });
    }

    Ok(parse.offsets)
}

pub(crate) fn read_all(path: &Path) -> CoreResult<Vec<u8>> {
    let backend = FileBackend::open_read_only(path)?;
    let size = usize::try_from(backend.size()?).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::OutOfMemory, "index file too large")
    })?;
    Ok(backend.read_at(0, size)?)
}

/// Writes an index file, replacing any existing content.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_index(index_path: &Path, offsets: &[u64]) -> CoreResult<()> {
    let mut sink = FileBackend::create(index_path)?;
    let mut writer = IndexWriter::new(&mut sink);
    for &offset in offsets {
        writer.push(offset)?;
    }
    writer.finish()?;
    Ok(())
}

/// Appends offsets to a sink as decimal lines.
///
/// Lines are buffered and appended in large chunks.
pub struct IndexWriter<'a> {
    sink: &'a mut dyn StorageBackend,
    pending: Vec<u8>,
    written: usize,
}

impl<'a> IndexWriter<'a> {
    /// Creates a writer that appends to `sink`.
    pub fn new(sink: &'a mut dyn StorageBackend) -> Self {
        Self {
            sink,
            pending: Vec::new(),
            written: 0,
        }
    }

    /// Appends one offset line.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the buffer fails.
    pub fn push(&mut self, offset: u64) -> CoreResult<()> {
        self.pending.extend_from_slice(offset.to_string().as_bytes());
        self.pending.push(b'\n');
        self.written += 1;
        if self.pending.len() >= WRITE_BUFFER_SIZE {
            self.drain()?;
        }
        Ok(())
    }

    /// Number of offsets pushed so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flushes remaining lines and returns the number of offsets written.
    ///
    /// # Errors
    ///
    /// Returns an error if the final append or flush fails.
    pub fn finish(mut self) -> CoreResult<usize> {
        self.drain()?;
        self.sink.flush()?;
        Ok(self.written)
    }

    fn drain(&mut self) -> CoreResult<()> {
        if !self.pending.is_empty() {
            self.sink.append(&self.pending)?;
            self.pending.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdfidx_storage::InMemoryBackend;
    use tempfile::tempdir;

    #[test]
    fn parse_skips_non_numeric_lines() {
        let parse = parse_index(b"0\nabc\n12\n\n  162 \n-3\n");
        assert_eq!(parse.offsets, vec![0, 12, 162]);
        assert_eq!(parse.malformed_lines, vec![2, 6]);
    }

    #[test]
    fn parse_handles_crlf_and_missing_final_newline() {
        let parse = parse_index(b"0\r\n12\r\n162");
        assert_eq!(parse.offsets, vec![0, 12, 162]);
        assert!(parse.malformed_lines.is_empty());
    }

    #[test]
    fn read_index_is_permissive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.index");
        std::fs::write(&path, "0\nabc\n12\n").unwrap();

        assert_eq!(read_index(&path).unwrap(), vec![0, 12]);
    }

    #[test]
    fn read_index_strict_reports_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.index");
        std::fs::write(&path, "0\n\n12\n x1 \n").unwrap();

        match read_index_strict(&path) {
            Err(CoreError::MalformedIndexLine { line, content }) => {
                assert_eq!(line, 4);
                assert_eq!(content, "x1");
            }
            other => panic!("expected malformed line error, got {other:?}"),
        }
    }

    #[test]
    fn read_index_strict_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.index");
        std::fs::write(&path, "0\n\n12\n").unwrap();

        assert_eq!(read_index_strict(&path).unwrap(), vec![0, 12]);
    }

    #[test]
    fn read_missing_index_fails() {
        let dir = tempdir().unwrap();
        assert!(read_index(&dir.path().join("missing.index")).is_err());
    }

    #[test]
    fn write_index_one_line_per_offset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.index");
        std::fs::write(&path, "stale content that is longer\n").unwrap();

        write_index(&path, &[0, 12, 162]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0\n12\n162\n");
    }

    #[test]
    fn write_empty_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.index");

        write_index(&path, &[]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"");
    }

    #[test]
    fn writer_drains_large_batches() {
        let mut sink = InMemoryBackend::new();
        let mut writer = IndexWriter::new(&mut sink);
        for offset in 0..20_000u64 {
            writer.push(offset * 1000).unwrap();
        }
        assert_eq!(writer.written(), 20_000);
        assert_eq!(writer.finish().unwrap(), 20_000);

        let parse = parse_index(&sink.data());
        assert_eq!(parse.offsets.len(), 20_000);
        assert_eq!(parse.offsets[19_999], 19_999_000);
    }
}
