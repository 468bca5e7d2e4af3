//! Mock storage transport for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::queue::FileSource;
use crate::storage::{StorageTransport, TransportError};

/// A recorded upload for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    /// Name of the uploaded file.
    pub name: String,
    /// Size of the uploaded file.
    pub size: u64,
    /// Whether the upload succeeded.
    pub success: bool,
}

/// Mock implementation of the StorageTransport trait.
///
/// Provides controllable behavior for testing:
/// - Track uploads for assertions
/// - Fail the next upload of a given file name
/// - Simulate slow uploads
/// - Observe how many uploads ran at the same time
///
/// # Example
///
/// ```rust,ignore
/// use dropqueue_core::testing::MockStorage;
///
/// let storage = MockStorage::new();
/// storage.fail_for("a.txt", TransportError::Upload("down".into())).await;
///
/// // ... submit the queue ...
///
/// assert_eq!(storage.upload_count().await, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockStorage {
    /// Recorded uploads.
    uploads: Arc<RwLock<Vec<RecordedUpload>>>,
    /// One-shot failures keyed by file name.
    failures: Arc<RwLock<HashMap<String, TransportError>>>,
    /// Simulated upload duration in milliseconds.
    upload_duration_ms: Arc<RwLock<u64>>,
    /// Uploads currently running.
    active: Arc<AtomicUsize>,
    /// Highest number of uploads seen running together.
    peak_active: Arc<AtomicUsize>,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorage {
    /// Create a new mock storage.
    pub fn new() -> Self {
        Self {
            uploads: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            upload_duration_ms: Arc::new(RwLock::new(10)),
            active: Arc::new(AtomicUsize::new(0)),
            peak_active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded uploads.
    pub async fn recorded_uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.read().await.clone()
    }

    /// Get the number of uploads attempted.
    pub async fn upload_count(&self) -> usize {
        self.uploads.read().await.len()
    }

    /// Make the next upload of `name` fail with `error`.
    pub async fn fail_for(&self, name: &str, error: TransportError) {
        self.failures.write().await.insert(name.to_string(), error);
    }

    /// Set the simulated upload duration.
    pub async fn set_upload_duration(&self, duration: Duration) {
        *self.upload_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Highest number of uploads that overlapped in time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }

    async fn record(&self, file: &FileSource, success: bool) {
        self.uploads.write().await.push(RecordedUpload {
            name: file.name().to_string(),
            size: file.size(),
            success,
        });
    }
}

#[async_trait]
impl StorageTransport for MockStorage {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload(&self, file: &FileSource) -> Result<String, TransportError> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(now_active, Ordering::SeqCst);

        let duration_ms = *self.upload_duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        let failure = self.failures.write().await.remove(file.name());
        if let Some(err) = failure {
            self.record(file, false).await;
            return Err(err);
        }

        self.record(file, true).await;
        Ok(format!("https://mock-storage.test/files/{}", file.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_is_one_shot() {
        let storage = MockStorage::new();
        storage.set_upload_duration(Duration::ZERO).await;
        storage
            .fail_for("a.txt", TransportError::Upload("down".to_string()))
            .await;
        let file = FileSource::new("a.txt", "text/plain", vec![1]);

        assert!(storage.upload(&file).await.is_err());
        assert!(storage.upload(&file).await.is_ok());

        let uploads = storage.recorded_uploads().await;
        assert_eq!(uploads.len(), 2);
        assert!(!uploads[0].success);
        assert!(uploads[1].success);
    }
}
