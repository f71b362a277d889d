//! CLI error types.

use thiserror::Error;

/// Errors raised by the command layer itself.
#[derive(Debug, Error)]
pub enum CliError {
    /// A required option was not given on the command line or in the
    /// configuration file.
    #[error("missing {0}: pass it on the command line or in --config")]
    MissingArgument(&'static str),

    /// An `--input` value is not of the form `RECORDS=INDEX`.
    #[error("invalid input pair {0:?}: expected RECORDS=INDEX")]
    InvalidInputPair(String),

    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Config {
        /// Path of the configuration file.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Index verification found problems.
    #[error("index verification failed")]
    VerificationFailed,
}
