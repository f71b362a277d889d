//! Record file statistics.

use crate::config::DEFAULT_READ_BUFFER_SIZE;
use crate::error::CoreResult;
use crate::record::RecordScanner;
use sdfidx_storage::{FileBackend, StorageBackend};
use serde::Serialize;
use std::path::Path;

/// Summary of a record file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordFileStats {
    /// File size in bytes.
    pub file_size: u64,
    /// Records, including an unterminated trailing record.
    pub records: usize,
    /// True if the file ends with content after the last delimiter.
    pub unterminated_tail: bool,
    /// Smallest record in bytes.
    pub smallest: u64,
    /// Largest record in bytes.
    pub largest: u64,
    /// Mean record size in bytes.
    pub mean: f64,
}

/// Scans the record file at `record_path` and summarizes it.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn inspect_records(record_path: &Path) -> CoreResult<RecordFileStats> {
    let source = FileBackend::open_read_only(record_path)?;
    inspect_backend(&source)
}

/// Scans a record backend and summarizes it.
///
/// # Errors
///
/// Returns an error if the backend cannot be read.
pub fn inspect_backend(source: &dyn StorageBackend) -> CoreResult<RecordFileStats> {
    let mut stats = RecordFileStats {
        file_size: source.size()?,
        smallest: u64::MAX,
        ..RecordFileStats::default()
    };
    let mut total = 0u64;

    for span in RecordScanner::new(source, DEFAULT_READ_BUFFER_SIZE) {
        let span = span?;
        stats.records += 1;
        stats.smallest = stats.smallest.min(span.len());
        stats.largest = stats.largest.max(span.len());
        stats.unterminated_tail = !span.terminated;
        total += span.len();
    }

    if stats.records == 0 {
        stats.smallest = 0;
    } else {
        stats.mean = total as f64 / stats.records as f64;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdfidx_storage::InMemoryBackend;

    #[test]
    fn summarizes_records() {
        let source = InMemoryBackend::with_data(b"a\n$$$$\nbbbb\n$$$$\ntail\n".to_vec());
        let stats = inspect_backend(&source).unwrap();

        assert_eq!(stats.file_size, 22);
        assert_eq!(stats.records, 3);
        assert!(stats.unterminated_tail);
        assert_eq!(stats.smallest, 5);
        assert_eq!(stats.largest, 10);
        assert!((stats.mean - 22.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_file() {
        let stats = inspect_backend(&InMemoryBackend::new()).unwrap();
        assert_eq!(stats.records, 0);
        assert_eq!(stats.smallest, 0);
        assert_eq!(stats.mean, 0.0);
        assert!(!stats.unterminated_tail);
    }
}
