//! Trait definitions for the registrar module.

use async_trait::async_trait;

use super::error::RegistrarError;
use super::types::FileRecord;

/// Persists a metadata record for a stored file.
///
/// Runs only after the storage transport has returned a reference, and can
/// fail independently of it.
#[async_trait]
pub trait RecordRegistrar: Send + Sync {
    /// Returns the name of this registrar implementation.
    fn name(&self) -> &str;

    /// Persists the record.
    async fn add_record(&self, record: &FileRecord) -> Result<(), RegistrarError>;
}
