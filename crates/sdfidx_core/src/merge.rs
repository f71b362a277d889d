//! Merging indexed record files.
//!
//! A merge reads every record that each input's index points at, keeps the
//! ones a [`RecordFilter`] accepts, writes them to one output record file
//! and indexes the output with record-start offsets.

use crate::config::{MergeConfig, MergeInput, MergeMode};
use crate::error::CoreResult;
use crate::filter::{filter_records, RecordFilter};
use crate::index::{read_index, write_index};
use crate::record::{read_record_at, read_records_with_stats, Record};
use crate::writer::{write_filtered, RecordWriter};
use sdfidx_storage::FileBackend;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a merge did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Input pairs processed.
    pub inputs: usize,
    /// Records read from all inputs.
    pub records_read: usize,
    /// Records written to the output.
    pub records_kept: usize,
    /// Index offsets that pointed at or past the end of their record file.
    pub offsets_without_record: usize,
    /// Path of the merged record file.
    pub output_records: PathBuf,
    /// Path of the merged index file.
    pub output_index: PathBuf,
    /// Mode the merge ran in.
    pub mode: MergeMode,
}

/// Runs a merge.
///
/// Inputs are processed in order, and each input's records in index order.
/// In [`MergeMode::Batch`] all records are held in memory and filtered
/// once; in [`MergeMode::Streaming`] each record is filtered and written
/// as soon as it is read. Both modes produce the same output.
///
/// # Errors
///
/// Returns an error if the configuration would overwrite an input, or if
/// any input or output file cannot be read or written.
pub fn merge(config: &MergeConfig, filter: &dyn RecordFilter) -> CoreResult<MergeReport> {
    config.validate()?;

    let report = match config.mode {
        MergeMode::Batch => merge_batch(config, filter)?,
        MergeMode::Streaming => merge_streaming(config, filter)?,
    };

    info!(
        inputs = report.inputs,
        read = report.records_read,
        kept = report.records_kept,
        output = %report.output_records.display(),
        "merge complete"
    );
    Ok(report)
}

/// Merges from parallel lists of index and record paths.
///
/// Lists are paired positionally; see [`MergeConfig::from_lists`].
///
/// # Errors
///
/// See [`merge`].
pub fn merge_files<I, R>(
    index_paths: I,
    output_record_path: &Path,
    output_index_path: &Path,
    record_paths: R,
    filter: &dyn RecordFilter,
) -> CoreResult<MergeReport>
where
    I: IntoIterator,
    I::Item: Into<PathBuf>,
    R: IntoIterator,
    R::Item: Into<PathBuf>,
{
    let config =
        MergeConfig::from_lists(index_paths, output_record_path, output_index_path, record_paths);
    merge(&config, filter)
}

fn merge_batch(config: &MergeConfig, filter: &dyn RecordFilter) -> CoreResult<MergeReport> {
    let mut all_records: Vec<Record> = Vec::new();
    let mut missing = 0;

    for input in &config.inputs {
        info!(file = %input.records.display(), "processing file");
        let (offsets, backend) = open_input(input)?;
        let outcome = read_records_with_stats(&backend, &offsets)?;
        missing += outcome.missing;
        all_records.extend(outcome.records);
    }

    let records_read = all_records.len();
    let kept = filter_records(all_records, filter);

    let offsets = write_filtered(&config.output_records, &kept)?;
    write_index(&config.output_index, &offsets)?;

    Ok(report(config, records_read, kept.len(), missing))
}

fn merge_streaming(config: &MergeConfig, filter: &dyn RecordFilter) -> CoreResult<MergeReport> {
    let mut writer = RecordWriter::create(&config.output_records)?;
    let mut records_read = 0;
    let mut missing = 0;

    for input in &config.inputs {
        info!(file = %input.records.display(), "processing file");
        let (offsets, backend) = open_input(input)?;

        for offset in offsets {
            let Some(record) = read_record_at(&backend, offset)? else {
                missing += 1;
                continue;
            };
            records_read += 1;
            if filter.accepts(&record) {
                writer.write(&record)?;
            }
        }
    }

    let offsets = writer.finish()?;
    write_index(&config.output_index, &offsets)?;

    Ok(report(config, records_read, offsets.len(), missing))
}

fn open_input(input: &MergeInput) -> CoreResult<(Vec<u64>, FileBackend)> {
    let offsets = read_index(&input.index)?;
    let backend = FileBackend::open_read_only(&input.records)?;
    Ok((offsets, backend))
}

fn report(
    config: &MergeConfig,
    records_read: usize,
    records_kept: usize,
    offsets_without_record: usize,
) -> MergeReport {
    MergeReport {
        inputs: config.inputs.len(),
        records_read,
        records_kept,
        offsets_without_record,
        output_records: config.output_records.clone(),
        output_index: config.output_index.clone(),
        mode: config.mode,
    }
}
