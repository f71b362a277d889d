//! # SDFIDX Core
//!
//! Byte-offset indexing, filtering and merging of SDF record files.
//!
//! An SDF file is a concatenation of records, each ending with a `$$$$`
//! line. This crate provides:
//! - An indexer that writes one byte offset per record to a text index
//! - Offset-based record reads through an index
//! - Pluggable record filters, including a chiral carbon count
//! - A merge that combines indexed files into one filtered, re-indexed file
//! - Index verification, random sampling and file statistics
//!
//! ## Example
//!
//! ```no_run
//! use sdfidx_core::{build_index_default, merge, CarbonSizeFilter, MergeConfig};
//! use std::path::Path;
//!
//! build_index_default(Path::new("a.sdf"), Path::new("a.index")).unwrap();
//!
//! let config = MergeConfig::new("output.sdf", "output.index").input("a.sdf", "a.index");
//! let report = merge(&config, &CarbonSizeFilter::default()).unwrap();
//! println!("kept {} of {}", report.records_kept, report.records_read);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod filter;
mod index;
mod inspect;
mod merge;
mod molecule;
mod record;
mod sample;
mod verify;
mod writer;

pub use config::{
    IndexConfig, MergeConfig, MergeInput, MergeMode, OffsetLayout, DEFAULT_READ_BUFFER_SIZE,
};
pub use error::{CoreError, CoreResult};
pub use filter::{filter_records, AcceptAll, CarbonSizeFilter, ChiralCarbonFilter, RecordFilter};
pub use index::{
    build_filtered_index, build_filtered_index_with_backends, build_index, build_index_default, build_index_with_backends, parse_index, read_index,
    read_index_strict, record_starts, write_index, IndexParse, IndexSummary, IndexWriter,
};
pub use inspect::{inspect_backend, inspect_records, RecordFileStats};
pub use merge::{merge, merge_files, MergeReport};
pub use molecule::{Atom, Bond, Molecule};
pub use record::{
    contains_delimiter, is_delimiter_line, read_record_at, read_records_by_offset,
    read_records_with_stats, Line, LineReader, ReadOutcome, Record, RecordScanner, RecordSpan,
    DELIMITER, RECORD_READ_CHUNK,
};
pub use sample::{sample_matching, sample_record};
pub use verify::{verify_index, verify_with_backend, VerifyReport};
pub use writer::{write_filtered, RecordWriter};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
