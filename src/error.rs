//! Error types

use std::io;

use thiserror::Error;

/// Failure inside a debug info backend
///
/// Opening or parsing the binary fails the run. Any of these raised during
/// the walk only drops the entity being looked up.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The binary could not be read
    #[error("cannot open {path}")]
    Open {
        /// Path that was opened
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The binary is not a readable object file
    #[error("cannot parse object file")]
    Object(#[from] object::read::Error),
    /// The DWARF sections are malformed
    #[error("malformed DWARF")]
    Dwarf(#[from] gimli::Error),
    /// A handle did not belong to this backend
    #[error("invalid debug info handle: {0}")]
    InvalidHandle(String),
}

/// Failure of a whole analysis run
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The backend could not be set up
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The diagnostic stream could not be written
    #[error("cannot write diagnostics")]
    Io(#[from] io::Error),
}
