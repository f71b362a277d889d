//! # SDFIDX Testkit
//!
//! Test utilities for SDFIDX.
//!
//! This crate provides:
//! - Record and mol block fixtures in temporary directories
//! - Property-based test generators using proptest
//! - Cross-crate integration test helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sdfidx_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_records() {
//!     with_temp_dir(|dir| {
//!         let (records, index) = dir.indexed("a", &[plain_record("foo")]);
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
