//! Random record selection through an index.

use crate::error::{CoreError, CoreResult};
use crate::filter::RecordFilter;
use crate::index::read_index;
use crate::record::{read_record_at, Record};
use rand::seq::SliceRandom;
use rand::Rng;
use sdfidx_storage::FileBackend;
use std::path::Path;
use tracing::debug;

/// Picks an offset uniformly at random from the index and reads the record
/// there.
///
/// Returns `Ok(None)` if the chosen offset has no record behind it, which
/// happens with the end-of-file entry of an after-delimiter index.
///
/// # Errors
///
/// Returns [`CoreError::EmptyIndex`] if the index holds no offsets, or an
/// I/O error if either file cannot be read.
pub fn sample_record<R: Rng + ?Sized>(
    record_path: &Path,
    index_path: &Path,
    rng: &mut R,
) -> CoreResult<Option<Record>> {
    let offsets = read_index(index_path)?;
    let &offset = offsets.choose(rng).ok_or(CoreError::EmptyIndex)?;
    let backend = FileBackend::open_read_only(record_path)?;
    read_record_at(&backend, offset)
}

/// Samples up to `attempts` records and returns the first one `filter`
/// accepts.
///
/// Each attempt is an independent uniform pick, so the same record may be
/// drawn more than once. Returns `Ok(None)` when no attempt matched.
///
/// # Errors
///
/// Returns [`CoreError::EmptyIndex`] if the index holds no offsets, or an
/// I/O error if either file cannot be read.
pub fn sample_matching<R: Rng + ?Sized>(
    record_path: &Path,
    index_path: &Path,
    filter: &dyn RecordFilter,
    attempts: usize,
    rng: &mut R,
) -> CoreResult<Option<Record>> {
    let offsets = read_index(index_path)?;
    if offsets.is_empty() {
        return Err(CoreError::EmptyIndex);
    }
    let backend = FileBackend::open_read_only(record_path)?;

    for attempt in 1..=attempts {
        let Some(&offset) = offsets.choose(rng) else {
            break;
        };
        match read_record_at(&backend, offset)? {
            Some(record) if filter.accepts(&record) => return Ok(Some(record)),
            _ => debug!(attempt, offset, "Sampled record rejected"),
        }
    }
    Ok(None)
}
