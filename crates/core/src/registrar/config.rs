//! Record registrar configuration.

use serde::{Deserialize, Serialize};

/// Available registrar backends.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrarBackend {
    /// Logs records and accepts them.
    #[default]
    Log,
    /// Adds rows to an AppSheet table.
    #[serde(rename = "appsheet")]
    AppSheet,
}

/// Configuration for the record registrar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// Backend to use.
    #[serde(default)]
    pub backend: RegistrarBackend,

    /// AppSheet settings (required when backend = "appsheet").
    #[serde(default)]
    pub appsheet: Option<AppSheetConfig>,
}

/// AppSheet API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSheetConfig {
    /// API root (default: "https://api.appsheet.com/api/v2").
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// AppSheet application ID.
    pub app_id: String,
    /// Table the file records are added to.
    #[serde(default = "default_table")]
    pub table: String,
    /// Application access key.
    pub access_key: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_api_url() -> String {
    "https://api.appsheet.com/api/v2".to_string()
}

fn default_table() -> String {
    "Files".to_string()
}

fn default_timeout() -> u32 {
    30
}
