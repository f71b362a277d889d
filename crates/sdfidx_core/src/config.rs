//! Indexer and merge configuration.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default chunk size used when scanning record files line by line.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Which byte offsets the indexer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OffsetLayout {
    /// One offset per record: the position of the record's first byte.
    ///
    /// The first record is listed as `0`. The position after the final
    /// delimiter is omitted when nothing follows it.
    #[default]
    RecordStarts,

    /// The position immediately after every delimiter line.
    ///
    /// The first record has no entry, and a file ending in a delimiter line
    /// gets a final entry equal to the file size.
    AfterDelimiter,
}

impl OffsetLayout {
    /// Returns the layout name as used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecordStarts => "record-starts",
            Self::AfterDelimiter => "after-delimiter",
        }
    }
}

/// Configuration for building an index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Offset layout to emit.
    pub layout: OffsetLayout,

    /// Chunk size for reading the record file.
    pub read_buffer_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            layout: OffsetLayout::default(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl IndexConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the offset layout.
    #[must_use]
    pub const fn layout(mut self, layout: OffsetLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the read chunk size. Zero is treated as one byte.
    #[must_use]
    pub const fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = if size == 0 { 1 } else { size };
        self
    }
}

/// How the merge holds records between reading and writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Read every record from every input, filter once, then write.
    #[default]
    Batch,

    /// Filter and write each record as soon as it is read.
    Streaming,
}

/// One input of a merge: a record file and the index that locates its records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeInput {
    /// Path to the record file.
    pub records: PathBuf,
    /// Path to the index file paired with `records`.
    pub index: PathBuf,
}

impl MergeInput {
    /// Creates a new input pair.
    pub fn new(records: impl Into<PathBuf>, index: impl Into<PathBuf>) -> Self {
        Self {
            records: records.into(),
            index: index.into(),
        }
    }
}

/// Configuration for a merge run.
///
/// Can be loaded from JSON:
///
/// ```json
/// {
///   "inputs": [
///     { "records": "Compound_000000001_000500000.sdf",
///       "index": "Compound_000000001_000500000.index" }
///   ],
///   "output_records": "output.sdf",
///   "output_index": "output.index",
///   "mode": "batch"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Input pairs, merged in this order.
    pub inputs: Vec<MergeInput>,

    /// Path of the merged record file.
    pub output_records: PathBuf,

    /// Path of the merged index file.
    pub output_index: PathBuf,

    /// Batch or streaming merge.
    #[serde(default)]
    pub mode: MergeMode,
}

impl MergeConfig {
    /// Creates a configuration with no inputs.
    pub fn new(output_records: impl Into<PathBuf>, output_index: impl Into<PathBuf>) -> Self {
        Self {
            inputs: Vec::new(),
            output_records: output_records.into(),
            output_index: output_index.into(),
            mode: MergeMode::default(),
        }
    }

    /// Builds a configuration from parallel lists of index and record paths.
    ///
    /// Paths are paired positionally. If the lists differ in length the
    /// extra entries of the longer list are ignored.
    pub fn from_lists<I, R>(
        index_paths: I,
        output_records: impl Into<PathBuf>,
        output_index: impl Into<PathBuf>,
        record_paths: R,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
        R: IntoIterator,
        R::Item: Into<PathBuf>,
    {
        let index_paths: Vec<PathBuf> = index_paths.into_iter().map(Into::into).collect();
        let record_paths: Vec<PathBuf> = record_paths.into_iter().map(Into::into).collect();

        if index_paths.len() != record_paths.len() {
            warn!(
                index_files = index_paths.len(),
                record_files = record_paths.len(),
                "index and record lists differ in length; pairing stops at the shorter list"
            );
        }

        let inputs = index_paths
            .into_iter()
            .zip(record_paths)
            .map(|(index, records)| MergeInput { records, index })
            .collect();

        Self {
            inputs,
            ..Self::new(output_records, output_index)
        }
    }

    /// Loads a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid configuration.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::invalid_config(e.to_string()))
    }

    /// Adds an input pair.
    #[must_use]
    pub fn input(mut self, records: impl Into<PathBuf>, index: impl Into<PathBuf>) -> Self {
        self.inputs.push(MergeInput::new(records, index));
        self
    }

    /// Sets the merge mode.
    #[must_use]
    pub const fn mode(mut self, mode: MergeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Checks that no output path overwrites an input or the other output.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] describing the first clash.
    pub fn validate(&self) -> CoreResult<()> {
        if same_path(&self.output_records, &self.output_index) {
            return Err(CoreError::invalid_config(format!(
                "output record file and output index are the same path: {}",
                self.output_records.display()
            )));
        }
        for input in &self.inputs {
            for output in [&self.output_records, &self.output_index] {
                if same_path(output, &input.records) || same_path(output, &input.index) {
                    return Err(CoreError::invalid_config(format!(
                        "output {} would overwrite an input file",
                        output.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
