//! Cross-crate integration test helpers.
//!
//! Provides a harness that indexes record files, merges them and checks
//! the merged output against what was written.

use crate::fixtures::TestRecordDir;
use sdfidx_core::{
    merge, read_index, read_records_by_offset, verify_index, MergeConfig, MergeInput, MergeMode,
    MergeReport, OffsetLayout, Record, RecordFilter,
};
use std::path::PathBuf;

/// A test harness for index and merge round trips.
pub struct MergeHarness {
    /// Working directory for inputs and outputs.
    pub dir: TestRecordDir,
    inputs: Vec<MergeInput>,
    written: Vec<Record>,
}

impl MergeHarness {
    /// Creates a harness in a fresh temporary directory.
    pub fn new() -> Self {
        Self {
            dir: TestRecordDir::new(),
            inputs: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Writes and indexes an input file and adds it to the merge.
    pub fn add_input<S: AsRef<str>>(&mut self, stem: &str, records: &[S]) -> MergeInput {
        self.add_input_with(stem, records, OffsetLayout::RecordStarts)
    }

    /// Like [`MergeHarness::add_input`] with an explicit layout.
    pub fn add_input_with<S: AsRef<str>>(
        &mut self,
        stem: &str,
        records: &[S],
        layout: OffsetLayout,
    ) -> MergeInput {
        let (records_path, index_path) = self.dir.indexed_with(stem, records, layout);
        self.written
            .extend(records.iter().map(|r| Record::from(r.as_ref())));
        let input = MergeInput::new(records_path, index_path);
        self.inputs.push(input.clone());
        input
    }

    /// Records written to inputs so far, in merge order.
    pub fn written(&self) -> &[Record] {
        &self.written
    }

    /// Builds a merge configuration writing `<stem>.sdf` and `<stem>.index`.
    pub fn config(&self, stem: &str, mode: MergeMode) -> MergeConfig {
        let mut config = MergeConfig::new(
            self.dir.file(&format!("{stem}.sdf")),
            self.dir.file(&format!("{stem}.index")),
        )
        .mode(mode);
        config.inputs = self.inputs.clone();
        config
    }

    /// Merges every input into `<stem>.sdf`.
    pub fn merge(&self, stem: &str, mode: MergeMode, filter: &dyn RecordFilter) -> MergeReport {
        merge(&self.config(stem, mode), filter).expect("Failed to merge")
    }

    /// Records written to inputs that `filter` accepts.
    pub fn expected(&self, filter: &dyn RecordFilter) -> Vec<Record> {
        self.written
            .iter()
            .filter(|record| filter.accepts(record))
            .cloned()
            .collect()
    }

    /// Reads a merge output back through its own index, checking that the
    /// index is valid and in the record-starts layout.
    pub fn read_output(&self, report: &MergeReport) -> Vec<Record> {
        let verify =
            verify_index(&report.output_records, &report.output_index).expect("Failed to verify");
        assert!(verify.is_valid(), "merged index is invalid: {verify:?}");
        if report.records_kept > 0 {
            assert_eq!(verify.layout, Some(OffsetLayout::RecordStarts));
        }

        let offsets = read_index(&report.output_index).expect("Failed to read index");
        assert_eq!(offsets.len(), report.records_kept);
        read_records_by_offset(&report.output_records, &offsets).expect("Failed to read records")
    }

    /// Returns the number of inputs added.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the path of `name` in the working directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.file(name)
    }
}

impl Default for MergeHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Asserts that two record lists hold the same bytes in the same order.
pub fn assert_same_records(actual: &[Record], expected: &[Record]) {
    let actual: Vec<&[u8]> = actual.iter().map(Record::as_bytes).collect();
    let expected: Vec<&[u8]> = expected.iter().map(Record::as_bytes).collect();
    assert_eq!(actual, expected, "record mismatch");
}
