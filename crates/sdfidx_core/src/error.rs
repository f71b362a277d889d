//! Error types for SDFIDX core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while indexing, reading or merging record files.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] sdfidx_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An index line is not a decimal offset.
    ///
    /// Only raised by strict index parsing.
    #[error("malformed index line {line}: {content:?}")]
    MalformedIndexLine {
        /// 1-based line number in the index file.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },

    /// The index holds no offsets.
    #[error("index is empty")]
    EmptyIndex,

    /// A record could not be parsed as a mol block.
    #[error("invalid mol block: {message}")]
    InvalidMolecule {
        /// Description of the problem.
        message: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid molecule error.
    pub fn invalid_molecule(message: impl Into<String>) -> Self {
        Self::InvalidMolecule {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
