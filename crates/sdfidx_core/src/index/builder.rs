//! Index construction.

use crate::config::{IndexConfig, OffsetLayout};
use crate::error::CoreResult;
use crate::filter::RecordFilter;
use crate::index::file::IndexWriter;
use crate::record::{Record, RecordScanner};
use sdfidx_storage::{FileBackend, StorageBackend};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// What an index build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    /// Records found in the record file.
    pub records: usize,
    /// Lines written to the index file.
    pub offsets_written: usize,
    /// Records left out of the index by a filter.
    pub records_rejected: usize,
    /// Size of the record file.
    pub bytes_scanned: u64,
    /// Layout the offsets follow.
    pub layout: OffsetLayout,
}

/// Builds an index for the record file at `record_path` and writes it to
/// `index_path`, replacing any existing index.
///
/// The record file is read once, front to back. Nothing is cleaned up if
/// the build fails part way.
///
/// # Errors
///
/// Returns an error if the record file cannot be read or the index file
/// cannot be written.
pub fn build_index(
    record_path: &Path,
    index_path: &Path,
    config: &IndexConfig,
) -> CoreResult<IndexSummary> {
    build_to_file(record_path, index_path, config, None)
}

/// Builds an index that lists only the records accepted by `filter`.
///
/// Offsets still point into the unmodified record file, so the result is
/// a subset of the unfiltered index in the same layout.
///
/// # Errors
///
/// See [`build_index`].
pub fn build_filtered_index(
    record_path: &Path,
    index_path: &Path,
    config: &IndexConfig,
    filter: &dyn RecordFilter,
) -> CoreResult<IndexSummary> {
    build_to_file(record_path, index_path, config, Some(filter))
}

fn build_to_file(
    record_path: &Path,
    index_path: &Path,
    config: &IndexConfig,
    filter: Option<&dyn RecordFilter>,
) -> CoreResult<IndexSummary> {
    let source = FileBackend::open_read_only(record_path)?;
    let mut sink = FileBackend::create(index_path)?;

    let summary = scan_into(&source, &mut sink, config, filter)?;

    info!(
        records = summary.records,
        offsets = summary.offsets_written,
        rejected = summary.records_rejected,
        layout = summary.layout.as_str(),
        index = %index_path.display(),
        "index built"
    );
    Ok(summary)
}

/// Builds an index with the default configuration.
///
/// # Errors
///
/// See [`build_index`].
pub fn build_index_default(record_path: &Path, index_path: &Path) -> CoreResult<IndexSummary> {
    build_index(record_path, index_path, &IndexConfig::default())
}

/// Builds an index from `source` into `sink`.
///
/// `sink` is appended to; callers that want a fresh index pass an empty
/// sink.
///
/// # Errors
///
/// Returns an error if reading `source` or appending to `sink` fails.
pub fn build_index_with_backends(
    source: &dyn StorageBackend,
    sink: &mut dyn StorageBackend,
    config: &IndexConfig,
) -> CoreResult<IndexSummary> {
    scan_into(source, sink, config, None)
}

/// Builds a filtered index from `source` into `sink`.
///
/// # Errors
///
/// See [`build_index_with_backends`].
pub fn build_filtered_index_with_backends(
    source: &dyn StorageBackend,
    sink: &mut dyn StorageBackend,
    config: &IndexConfig,
    filter: &dyn RecordFilter,
) -> CoreResult<IndexSummary> {
    scan_into(source, sink, config, Some(filter))
}

fn scan_into(
    source: &dyn StorageBackend,
    sink: &mut dyn StorageBackend,
    config: &IndexConfig,
    filter: Option<&dyn RecordFilter>,
) -> CoreResult<IndexSummary> {
    let mut scanner = RecordScanner::new(source, config.read_buffer_size);
    let mut writer = IndexWriter::new(sink);
    let mut records = 0;
    let mut records_rejected = 0;

    while let Some(span) = scanner.next_span()? {
        records += 1;
        if let Some(filter) = filter {
            let bytes = source.read_at(span.start, span.len() as usize)?;
            let record = Record::at_offset(bytes, span.start);
            if !filter.accepts(&record) {
                records_rejected += 1;
                continue;
            }
        }
        match config.layout {
            OffsetLayout::RecordStarts => writer.push(span.start)?,
            OffsetLayout::AfterDelimiter => {
                if span.terminated {
                    writer.push(span.end)?;
                }
            }
        }
    }

    let bytes_scanned = scanner.position();
    let offsets_written = writer.finish()?;

    Ok(IndexSummary {
        records,
        offsets_written,
        records_rejected,
        bytes_scanned,
        layout: config.layout,
    })
}

/// Computes record-start offsets without writing an index.
///
/// # Errors
///
/// Returns an error if reading `source` fails.
pub fn record_starts(source: &dyn StorageBackend, chunk_size: usize) -> CoreResult<Vec<u64>> {
    RecordScanner::new(source, chunk_size)
        .map(|span| span.map(|s| s.start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ChiralCarbonFilter;
    use crate::index::file::{parse_index, read_index};
    use crate::molecule::tests::mol_block;
    use sdfidx_storage::InMemoryBackend;
    use tempfile::tempdir;

    fn index_of(data: &[u8], layout: OffsetLayout) -> (IndexSummary, Vec<u64>) {
        let source = InMemoryBackend::with_data(data.to_vec());
        let mut sink = InMemoryBackend::new();
        let config = IndexConfig::new().layout(layout).read_buffer_size(3);

        let summary = build_index_with_backends(&source, &mut sink, &config).unwrap();
        let parse = parse_index(&sink.data());
        assert!(parse.malformed_lines.is_empty());
        (summary, parse.offsets)
    }

    fn record_b() -> Vec<u8> {
        let mut body = String::from("CCO\n");
        while body.len() < 144 {
            body.push('x');
        }
        body.push_str("\n$$$$\n");
        body.into_bytes()
    }

    #[test]
    fn record_starts_layout() {
        let mut data = b"foo\nbar\n$$$$\n".to_vec();
        data.extend(record_b());

        let (summary, offsets) = index_of(&data, OffsetLayout::RecordStarts);
        assert_eq!(offsets, vec![0, 13]);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.offsets_written, 2);
        assert_eq!(summary.bytes_scanned, 163);
    }

    #[test]
    fn after_delimiter_layout_keeps_end_of_file_offset() {
        let mut data = b"foo\nbar\n$$$$\n".to_vec();
        data.extend(record_b());

        let (summary, offsets) = index_of(&data, OffsetLayout::AfterDelimiter);
        assert_eq!(offsets, vec![13, 163]);
        assert_eq!(summary.records, 2);
    }

    #[test]
    fn unterminated_tail_is_indexed_in_record_starts_only() {
        let data = b"a\n$$$$\ntail\n";
        assert_eq!(index_of(data, OffsetLayout::RecordStarts).1, vec![0, 7]);
        assert_eq!(index_of(data, OffsetLayout::AfterDelimiter).1, vec![7]);
    }

    #[test]
    fn whitespace_around_delimiter() {
        let data = b"a\n  $$$$\t\r\nb\n$$$$\n";
        assert_eq!(index_of(data, OffsetLayout::RecordStarts).1, vec![0, 11]);
    }

    #[test]
    fn empty_file_gives_empty_index() {
        let (summary, offsets) = index_of(b"", OffsetLayout::RecordStarts);
        assert!(offsets.is_empty());
        assert_eq!(summary.records, 0);
    }

    #[test]
    fn build_from_files() {
        let dir = tempdir().unwrap();
        let sdf = dir.path().join("in.sdf");
        let idx = dir.path().join("in.index");
        std::fs::write(&sdf, b"foo\nbar\n$$$$\nbaz\n$$$$\n").unwrap();

        let summary = build_index_default(&sdf, &idx).unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(std::fs::read_to_string(&idx).unwrap(), "0\n13\n");
        assert_eq!(read_index(&idx).unwrap(), vec![0, 13]);
    }

    #[test]
    fn rebuild_is_identical() {
        let dir = tempdir().unwrap();
        let sdf = dir.path().join("in.sdf");
        let idx = dir.path().join("in.index");
        std::fs::write(&sdf, b"a\n$$$$\nbb\n$$$$\nccc\n$$$$\n").unwrap();

        build_index_default(&sdf, &idx).unwrap();
        let first = std::fs::read(&idx).unwrap();
        build_index_default(&sdf, &idx).unwrap();
        assert_eq!(std::fs::read(&idx).unwrap(), first);
    }

    #[test]
    fn missing_record_file_fails() {
        let dir = tempdir().unwrap();
        let result = build_index_default(
            &dir.path().join("missing.sdf"),
            &dir.path().join("out.index"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn record_starts_helper() {
        let source = InMemoryBackend::with_data(b"a\n$$$$\nb\n$$$$\n".to_vec());
        assert_eq!(record_starts(&source, 16).unwrap(), vec![0, 7]);
    }

    fn butanol_and_triol() -> (String, String) {
        let butanol = mol_block(
            &["C", "C", "O", "C", "C"],
            &[(1, 2, 1), (2, 3, 1), (2, 4, 1), (4, 5, 1)],
        );
        let triol = mol_block(
            &["C", "C", "C", "C", "C", "O", "O", "O", "Cl"],
            &[
                (1, 2, 1),
                (2, 3, 1),
                (3, 4, 1),
                (4, 5, 1),
                (2, 6, 1),
                (3, 7, 1),
                (4, 8, 1),
                (5, 9, 1),
            ],
        );
        (butanol, triol)
    }

    #[test]
    fn filtered_index_is_subset_of_record_starts() {
        let (butanol, triol) = butanol_and_triol();
        let data = format!("{butanol}{triol}not a molecule\n$$$$\n{triol}");
        let source = InMemoryBackend::with_data(data.clone().into_bytes());

        let mut sink = InMemoryBackend::new();
        let summary = build_filtered_index_with_backends(
            &source,
            &mut sink,
            &IndexConfig::default(),
            &ChiralCarbonFilter::default(),
        )
        .unwrap();
        let filtered = parse_index(&sink.data()).offsets;
        let all = record_starts(&source, 64).unwrap();

        assert_eq!(summary.records, 4);
        assert_eq!(summary.records_rejected, 2);
        assert_eq!(summary.offsets_written, 2);
        assert_eq!(all.len(), 4);
        assert_eq!(filtered, vec![all[1], all[3]]);
        assert!(filtered.iter().all(|offset| all.contains(offset)));
    }

    #[test]
    fn filtered_offsets_read_back_accepted_records() {
        let (butanol, triol) = butanol_and_triol();
        let dir = tempdir().unwrap();
        let sdf = dir.path().join("in.sdf");
        let idx = dir.path().join("chiral.index");
        std::fs::write(&sdf, format!("{butanol}{triol}")).unwrap();

        let keep_one = ChiralCarbonFilter::new(1);
        build_filtered_index(&sdf, &idx, &IndexConfig::default(), &keep_one).unwrap();
        let offsets = read_index(&idx).unwrap();
        assert_eq!(offsets, vec![0, butanol.len() as u64]);

        build_filtered_index(&sdf, &idx, &IndexConfig::default(), &ChiralCarbonFilter::default())
            .unwrap();
        let offsets = read_index(&idx).unwrap();
        let records = crate::record::read_records_by_offset(&sdf, &offsets).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_bytes(), triol.as_bytes());
    }

    #[test]
    fn unfiltered_build_rejects_nothing() {
        let (summary, _) = index_of(b"a\n$$$$\nb\n$$$$\n", OffsetLayout::RecordStarts);
        assert_eq!(summary.records_rejected, 0);
    }
}
