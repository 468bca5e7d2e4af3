use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::queue::QueueConfig;
use crate::registrar::{RegistrarBackend, RegistrarConfig};
use crate::storage::{StorageBackend, StorageConfig};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub registrar: RegistrarConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub queue: QueueConfig,
    pub storage: StorageConfig,
    pub registrar: SanitizedRegistrarConfig,
}

/// Sanitized registrar config (access key redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedRegistrarConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appsheet: Option<SanitizedAppSheetConfig>,
}

/// Sanitized AppSheet config (access key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAppSheetConfig {
    pub api_url: String,
    pub app_id: String,
    pub table: String,
    pub access_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            queue: config.queue.clone(),
            storage: config.storage.clone(),
            registrar: SanitizedRegistrarConfig {
                backend: match config.registrar.backend {
                    RegistrarBackend::Log => "log".to_string(),
                    RegistrarBackend::AppSheet => "appsheet".to_string(),
                },
                appsheet: config
                    .registrar
                    .appsheet
                    .as_ref()
                    .map(|a| SanitizedAppSheetConfig {
                        api_url: a.api_url.clone(),
                        app_id: a.app_id.clone(),
                        table: a.table.clone(),
                        access_key_configured: !a.access_key.is_empty(),
                        timeout_secs: a.timeout_secs,
                    }),
            },
        }
    }
}

impl Config {
    /// Short description of the selected backends, for startup logs.
    pub fn backends_summary(&self) -> String {
        let storage = match self.storage.backend {
            StorageBackend::Simulated => "simulated",
            StorageBackend::Filesystem => "filesystem",
        };
        let registrar = match self.registrar.backend {
            RegistrarBackend::Log => "log",
            RegistrarBackend::AppSheet => "appsheet",
        };
        format!("storage={}, registrar={}", storage, registrar)
    }
}
