//! Error types for the storage module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by a storage transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The backend refused or failed to store the file.
    #[error("{0}")]
    Upload(String),

    /// Failed to write the file to local storage.
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the storage directory.
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend did not answer in time.
    #[error("Storage request timed out")]
    Timeout,
}
