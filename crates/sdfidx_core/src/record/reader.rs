//! Offset-based record reads.

use crate::error::CoreResult;
use crate::record::lines::LineReader;
use crate::record::{contains_delimiter, Record};
use sdfidx_storage::{FileBackend, StorageBackend};
use std::path::Path;
use tracing::debug;

/// Chunk size for reading a single record.
pub const RECORD_READ_CHUNK: usize = 8 * 1024;

/// Records read for a list of offsets.
#[derive(Debug, Default)]
pub struct ReadOutcome {
    /// Records in offset order.
    pub records: Vec<Record>,
    /// Offsets that pointed at or past the end of the file.
    pub missing: usize,
}

/// Reads the record that starts at `offset`.
///
/// Lines are read until one contains `$$$$` anywhere (that line is
/// included) or the file ends. Returns `None` when `offset` is at or past
/// the end of the file.
///
/// # Errors
///
/// Returns an error if the backend read fails.
pub fn read_record_at(backend: &dyn StorageBackend, offset: u64) -> CoreResult<Option<Record>> {
    let mut lines = LineReader::new(backend, offset, RECORD_READ_CHUNK);
    let mut bytes = Vec::new();

    while let Some(line) = lines.next_line()? {
        let done = contains_delimiter(&line.bytes);
        bytes.extend_from_slice(&line.bytes);
        if done {
            break;
        }
    }

    if bytes.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Record::at_offset(bytes, offset)))
    }
}

/// Reads one record per offset, in offset order, and counts offsets that
/// had no record.
///
/// # Errors
///
/// Returns an error if a backend read fails.
pub fn read_records_with_stats(
    backend: &dyn StorageBackend,
    offsets: &[u64],
) -> CoreResult<ReadOutcome> {
    let mut outcome = ReadOutcome {
        records: Vec::with_capacity(offsets.len()),
        missing: 0,
    };

    for &offset in offsets {
        match read_record_at(backend, offset)? {
            Some(record) => outcome.records.push(record),
            None => {
                debug!(offset, "offset has no record; skipping");
                outcome.missing += 1;
            }
        }
    }

    Ok(outcome)
}

/// Reads one record per offset from the record file at `record_path`.
///
/// Offsets with no record behind them are dropped from the result.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn read_records_by_offset(record_path: &Path, offsets: &[u64]) -> CoreResult<Vec<Record>> {
    let backend = FileBackend::open_read_only(record_path)?;
    Ok(read_records_with_stats(&backend, offsets)?.records)
}
