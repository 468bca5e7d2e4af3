//! Local filesystem storage backend.

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::config::FsStorageConfig;
use super::error::TransportError;
use super::traits::StorageTransport;
use crate::queue::FileSource;

/// Storage transport that writes files under a local directory.
pub struct FsStorage {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl FsStorage {
    /// Creates a filesystem backend from configuration.
    pub fn new(config: &FsStorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            public_base_url: config
                .public_base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Builds the object key for a file name.
    ///
    /// Path separators and other characters that would escape the root are
    /// replaced. The timestamp and a random segment keep every upload of the
    /// same name under its own key.
    fn object_key(name: &str) -> String {
        let sanitized: String = name
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '\0' => '_',
                c => c,
            })
            .collect();
        let sanitized = sanitized.trim_start_matches('.');
        let sanitized = if sanitized.is_empty() { "file" } else { sanitized };

        format!(
            "{}_{}_{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            sanitized
        )
    }

    fn reference_for(&self, key: &str, path: &std::path::Path) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base, urlencoding::encode(key)),
            None => format!("file://{}", path.display()),
        }
    }
}

#[async_trait]
impl StorageTransport for FsStorage {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn upload(&self, file: &FileSource) -> Result<String, TransportError> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            TransportError::DirectoryCreationFailed {
                path: self.root.clone(),
                source: e,
            }
        })?;

        let key = Self::object_key(file.name());
        let path = self.root.join(&key);

        fs::write(&path, file.bytes())
            .await
            .map_err(|e| TransportError::WriteFailed {
                path: path.clone(),
                source: e,
            })?;

        debug!(file = file.name(), path = %path.display(), bytes = file.size(), "Stored file");
        Ok(self.reference_for(&key, &path))
    }
}
