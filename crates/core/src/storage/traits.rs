//! Trait definitions for the storage module.

use async_trait::async_trait;

use super::error::TransportError;
use crate::queue::FileSource;

/// Durable storage for staged file bytes.
///
/// The orchestrator treats an upload as an opaque asynchronous call: it hands
/// over the file and waits for a reference (usually a public URL) that stays
/// valid once the bytes are durably stored.
#[async_trait]
pub trait StorageTransport: Send + Sync {
    /// Returns the name of this transport implementation.
    fn name(&self) -> &str;

    /// Stores the file and returns its durable reference.
    async fn upload(&self, file: &FileSource) -> Result<String, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoStorage;

    #[async_trait]
    impl StorageTransport for EchoStorage {
        fn name(&self) -> &str {
            "echo"
        }

        async fn upload(&self, file: &FileSource) -> Result<String, TransportError> {
            Ok(format!("echo://{}", file.name()))
        }
    }

    #[tokio::test]
    async fn test_trait_object_upload() {
        let storage: Box<dyn StorageTransport> = Box::new(EchoStorage);
        let file = FileSource::new("a.txt", "text/plain", b"hi".to_vec());

        let url = storage.upload(&file).await.unwrap();
        assert_eq!(url, "echo://a.txt");
        assert_eq!(storage.name(), "echo");
    }
}
