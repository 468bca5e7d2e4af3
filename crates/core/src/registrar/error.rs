//! Error types for the registrar module.

use thiserror::Error;

/// Errors returned by a record registrar.
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// Could not reach the registrar.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The registrar answered with a non-success status.
    #[error("Record rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The request did not complete in time.
    #[error("Registrar request timed out")]
    Timeout,

    /// Any other failure reported by the registrar.
    #[error("{0}")]
    Other(String),
}
