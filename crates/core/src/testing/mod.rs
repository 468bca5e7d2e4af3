//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external collaborator
//! traits, allowing the upload pipeline to be tested without real storage or
//! a real records backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use dropqueue_core::testing::{fixtures, MockRegistrar, MockStorage};
//!
//! let storage = Arc::new(MockStorage::new());
//! let registrar = Arc::new(MockRegistrar::new());
//!
//! // Configure mock responses
//! registrar.fail_for("b.txt", RegistrarError::Other("rejected".into())).await;
//!
//! // Build an UploadOrchestrator over them...
//! ```

mod mock_registrar;
mod mock_storage;

pub use mock_registrar::MockRegistrar;
pub use mock_storage::{MockStorage, RecordedUpload};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::queue::FileSource;

    /// A small plain-text file.
    pub fn text_file(name: &str) -> FileSource {
        FileSource::new(name, "text/plain", format!("contents of {}", name).into_bytes())
    }

    /// A tiny PNG-typed file (header bytes only).
    pub fn image_file(name: &str) -> FileSource {
        FileSource::new(
            name,
            "image/png",
            vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
        )
    }

    /// A tiny PDF-typed file.
    pub fn pdf_file(name: &str) -> FileSource {
        FileSource::new(name, "application/pdf", b"%PDF-1.4\n%%EOF\n".to_vec())
    }
}
