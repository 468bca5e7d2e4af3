//! Storage transport configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Available storage backends.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Waits a fixed delay and fabricates a public URL.
    #[default]
    Simulated,
    /// Writes bytes under a local directory.
    Filesystem,
}

/// Configuration for the storage transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to use.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Simulated backend settings.
    #[serde(default)]
    pub simulated: SimulatedStorageConfig,

    /// Filesystem backend settings (required when backend = "filesystem").
    #[serde(default)]
    pub filesystem: Option<FsStorageConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            simulated: SimulatedStorageConfig::default(),
            filesystem: None,
        }
    }
}

/// Settings for the simulated storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedStorageConfig {
    /// Delay before the upload "completes" (milliseconds).
    #[serde(default = "default_simulated_delay")]
    pub delay_ms: u64,

    /// Base URL the fabricated references are built on.
    #[serde(default = "default_simulated_base_url")]
    pub base_url: String,
}

fn default_simulated_delay() -> u64 {
    1000
}

fn default_simulated_base_url() -> String {
    "https://storage.example.com/files".to_string()
}

impl Default for SimulatedStorageConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_simulated_delay(),
            base_url: default_simulated_base_url(),
        }
    }
}

/// Settings for the filesystem storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsStorageConfig {
    /// Directory the files are written to.
    pub root: PathBuf,

    /// Public URL prefix the stored files are served from.
    /// When absent, `file://` URLs are returned.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Simulated);
        assert_eq!(config.simulated.delay_ms, 1000);
        assert_eq!(
            config.simulated.base_url,
            "https://storage.example.com/files"
        );
        assert!(config.filesystem.is_none());
    }

    #[test]
    fn test_deserialize_filesystem() {
        let toml = r#"
            backend = "filesystem"

            [filesystem]
            root = "/var/lib/dropqueue"
            public_base_url = "https://files.example.org"
        "#;
        let config: StorageConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.backend, StorageBackend::Filesystem);

        let fs = config.filesystem.unwrap();
        assert_eq!(fs.root, PathBuf::from("/var/lib/dropqueue"));
        assert_eq!(fs.public_base_url.as_deref(), Some("https://files.example.org"));
    }

    #[test]
    fn test_deserialize_simulated_overrides() {
        let toml = r#"
            [simulated]
            delay_ms = 10
        "#;
        let config: StorageConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.backend, StorageBackend::Simulated);
        assert_eq!(config.simulated.delay_ms, 10);
        assert_eq!(
            config.simulated.base_url,
            "https://storage.example.com/files"
        );
    }
}
