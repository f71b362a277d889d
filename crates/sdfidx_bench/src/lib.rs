//! Benchmark support for SDFIDX.

#![warn(missing_docs)]

pub mod utils;
