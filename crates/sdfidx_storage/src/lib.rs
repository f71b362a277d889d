//! # SDFIDX Storage
//!
//! Byte-addressed storage backends for SDFIDX.
//!
//! Record files and index files are both treated as **opaque byte stores**
//! at this layer. A backend knows how to read a range of bytes, append bytes
//! and report its size; it does not know what an SDF record or a `$$$$`
//! delimiter is. Every position handed out or accepted by a backend is a
//! byte offset from the start of the store.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and in-process pipelines
//! - [`FileBackend`] - For record and index files on disk
//!
//! ## Example
//!
//! ```rust
//! use sdfidx_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! let offset = backend.append(b"CCO\n$$$$\n").unwrap();
//! let data = backend.read_at(offset, 4).unwrap();
//! assert_eq!(&data, b"CCO\n");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
