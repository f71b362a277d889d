//! Byte-offset indexes over record files.

mod builder;
mod file;

pub use builder::{
    build_filtered_index, build_filtered_index_with_backends, build_index, build_index_default,
    build_index_with_backends, record_starts, IndexSummary,
};
pub use file::{
    parse_index, read_index, read_index_strict, write_index, IndexParse, IndexWriter,
};

pub(crate) use file::read_all;
