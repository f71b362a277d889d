//! Index verification against its record file.

use crate::config::{OffsetLayout, DEFAULT_READ_BUFFER_SIZE};
use crate::error::CoreResult;
use crate::index::{parse_index, read_all};
use crate::record::RecordScanner;
use sdfidx_storage::{FileBackend, StorageBackend};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Findings of an index check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Offsets parsed from the index.
    pub offsets: usize,
    /// Records found by scanning the record file.
    pub records_in_file: usize,
    /// 1-based line numbers that are not offsets.
    pub malformed_lines: Vec<usize>,
    /// Positions in the offset list where an offset is not greater than the
    /// one before it.
    pub out_of_order: Vec<usize>,
    /// Offsets beyond the end of the record file.
    pub past_end: Vec<u64>,
    /// Offsets that do not start a record and do not follow a delimiter.
    pub misaligned: Vec<u64>,
    /// Offsets equal to the record file size.
    pub end_of_file_offsets: usize,
    /// Layout the index matches exactly, if any.
    pub layout: Option<OffsetLayout>,
}

impl VerifyReport {
    /// Returns true if every offset is well-formed, ordered and aligned.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.malformed_lines.is_empty()
            && self.out_of_order.is_empty()
            && self.past_end.is_empty()
            && self.misaligned.is_empty()
    }
}

/// Checks the index at `index_path` against the record file at
/// `record_path`.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn verify_index(record_path: &Path, index_path: &Path) -> CoreResult<VerifyReport> {
    let source = FileBackend::open_read_only(record_path)?;
    let index = read_all(index_path)?;
    verify_with_backend(&source, &index)
}

/// Checks index text against a record backend.
///
/// # Errors
///
/// Returns an error if the backend cannot be read.
pub fn verify_with_backend(source: &dyn StorageBackend, index: &[u8]) -> CoreResult<VerifyReport> {
    let parse = parse_index(index);
    let file_size = source.size()?;

    let mut starts = Vec::new();
    let mut after_delimiters = Vec::new();
    for span in RecordScanner::new(source, DEFAULT_READ_BUFFER_SIZE) {
        let span = span?;
        starts.push(span.start);
        if span.terminated {
            after_delimiters.push(span.end);
        }
    }

    let boundaries: HashSet<u64> = starts
        .iter()
        .chain(&after_delimiters)
        .copied()
        .chain(std::iter::once(0))
        .collect();

    let mut report = VerifyReport {
        offsets: parse.offsets.len(),
        records_in_file: starts.len(),
        malformed_lines: parse.malformed_lines,
        ..VerifyReport::default()
    };

    for (position, &offset) in parse.offsets.iter().enumerate() {
        if position > 0 && offset <= parse.offsets[position - 1] {
            report.out_of_order.push(position);
        }
        if offset > file_size {
            report.past_end.push(offset);
        } else if offset == file_size {
            report.end_of_file_offsets += 1;
        } else if !boundaries.contains(&offset) {
            report.misaligned.push(offset);
        }
    }

    report.layout = if parse.offsets == starts {
        Some(OffsetLayout::RecordStarts)
    } else if parse.offsets == after_delimiters {
        Some(OffsetLayout::AfterDelimiter)
    } else {
        None
    };

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdfidx_storage::InMemoryBackend;
    use tempfile::tempdir;

    const FILE: &[u8] = b"foo\nbar\n$$$$\nbaz\n$$$$\n";

    fn verify(index: &str) -> VerifyReport {
        let source = InMemoryBackend::with_data(FILE.to_vec());
        verify_with_backend(&source, index.as_bytes()).unwrap()
    }

    #[test]
    fn record_starts_index_is_valid() {
        let report = verify("0\n13\n");
        assert!(report.is_valid());
        assert_eq!(report.layout, Some(OffsetLayout::RecordStarts));
        assert_eq!(report.records_in_file, 2);
        assert_eq!(report.end_of_file_offsets, 0);
    }

    #[test]
    fn after_delimiter_index_is_valid() {
        let report = verify("13\n22\n");
        assert!(report.is_valid());
        assert_eq!(report.layout, Some(OffsetLayout::AfterDelimiter));
        assert_eq!(report.end_of_file_offsets, 1);
    }

    #[test]
    fn detects_problems() {
        let report = verify("0\nabc\n5\n3\n99\n");
        assert!(!report.is_valid());
        assert_eq!(report.malformed_lines, vec![2]);
        assert_eq!(report.misaligned, vec![5, 3]);
        assert_eq!(report.out_of_order, vec![2]);
        assert_eq!(report.past_end, vec![99]);
        assert_eq!(report.layout, None);
    }

    #[test]
    fn subset_index_is_valid_without_layout() {
        let report = verify("13\n");
        assert!(report.is_valid());
        assert_eq!(report.layout, None);
    }

    #[test]
    fn verify_files() {
        let dir = tempdir().unwrap();
        let sdf = dir.path().join("in.sdf");
        let idx = dir.path().join("in.index");
        std::fs::write(&sdf, FILE).unwrap();
        std::fs::write(&idx, "0\n13\n").unwrap();

        assert!(verify_index(&sdf, &idx).unwrap().is_valid());
    }
}
