//! Simulated storage backend.

use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::debug;

use super::config::SimulatedStorageConfig;
use super::error::TransportError;
use super::traits::StorageTransport;
use crate::queue::FileSource;

/// Storage transport that pretends to upload.
///
/// Waits for the configured delay, then returns
/// `{base_url}/{unix_millis}_{file name}`. Useful for demos and for running
/// the full pipeline without a bucket.
pub struct SimulatedStorage {
    delay: Duration,
    base_url: String,
}

impl SimulatedStorage {
    /// Creates a simulated backend from configuration.
    pub fn new(config: &SimulatedStorageConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageTransport for SimulatedStorage {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn upload(&self, file: &FileSource) -> Result<String, TransportError> {
        debug!(file = file.name(), "Simulating upload to cloud storage");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let url = format!(
            "{}/{}_{}",
            self.base_url,
            Utc::now().timestamp_millis(),
            file.name()
        );
        debug!(file = file.name(), url = %url, "Simulated upload finished");
        Ok(url)
    }
}
