//! Mock record registrar for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::registrar::{FileRecord, RecordRegistrar, RegistrarError};

/// Mock implementation of the RecordRegistrar trait.
///
/// Records every accepted [`FileRecord`] and can be told to reject the next
/// record for a given file name.
#[derive(Debug, Clone)]
pub struct MockRegistrar {
    /// Accepted records.
    records: Arc<RwLock<Vec<FileRecord>>>,
    /// Number of calls, accepted or not.
    calls: Arc<RwLock<usize>>,
    /// One-shot failures keyed by file name.
    failures: Arc<RwLock<HashMap<String, RegistrarError>>>,
    /// Simulated call duration in milliseconds.
    duration_ms: Arc<RwLock<u64>>,
}

impl Default for MockRegistrar {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegistrar {
    /// Create a new mock registrar.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(RwLock::new(0)),
            failures: Arc::new(RwLock::new(HashMap::new())),
            duration_ms: Arc::new(RwLock::new(0)),
        }
    }

    /// Get all accepted records.
    pub async fn recorded(&self) -> Vec<FileRecord> {
        self.records.read().await.clone()
    }

    /// Get the number of accepted records.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Get the number of calls, including rejected ones.
    pub async fn call_count(&self) -> usize {
        *self.calls.read().await
    }

    /// Make the next record for `filename` fail with `error`.
    pub async fn fail_for(&self, filename: &str, error: RegistrarError) {
        self.failures
            .write()
            .await
            .insert(filename.to_string(), error);
    }

    /// Set the simulated call duration.
    pub async fn set_duration(&self, duration: Duration) {
        *self.duration_ms.write().await = duration.as_millis() as u64;
    }
}

#[async_trait]
impl RecordRegistrar for MockRegistrar {
    fn name(&self) -> &str {
        "mock"
    }

    async fn add_record(&self, record: &FileRecord) -> Result<(), RegistrarError> {
        *self.calls.write().await += 1;

        let duration_ms = *self.duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        let failure = self.failures.write().await.remove(&record.filename);
        if let Some(err) = failure {
            return Err(err);
        }

        self.records.write().await.push(record.clone());
        Ok(())
    }
}
