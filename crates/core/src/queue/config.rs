//! Upload queue configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for staging and submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Per-item pipeline timeout in seconds (0 = wait indefinitely).
    /// A pipeline exceeding it fails with a timeout error.
    #[serde(default = "default_item_timeout")]
    pub item_timeout_secs: u64,

    /// Largest file accepted at staging, in bytes (0 = unlimited).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Value recorded as the creator of every file record.
    #[serde(default = "default_created_by")]
    pub created_by: String,
}

fn default_item_timeout() -> u64 {
    60
}

fn default_max_file_size() -> u64 {
    50 * 1024 * 1024 // 50 MiB
}

fn default_created_by() -> String {
    "currentUser".to_string()
}

impl QueueConfig {
    /// Per-item timeout, if enabled.
    pub fn item_timeout(&self) -> Option<Duration> {
        (self.item_timeout_secs > 0).then(|| Duration::from_secs(self.item_timeout_secs))
    }

    /// Staging size limit, if enabled.
    pub fn max_file_size(&self) -> Option<u64> {
        (self.max_file_size_bytes > 0).then_some(self.max_file_size_bytes)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            item_timeout_secs: default_item_timeout(),
            max_file_size_bytes: default_max_file_size(),
            created_by: default_created_by(),
        }
    }
}
