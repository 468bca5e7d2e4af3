//! AppSheet registrar implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::config::AppSheetConfig;
use super::error::RegistrarError;
use super::traits::RecordRegistrar;
use super::types::FileRecord;

/// Header carrying the AppSheet application access key.
const ACCESS_KEY_HEADER: &str = "ApplicationAccessKey";

/// Request body of the AppSheet table Action endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ActionRequest<'a> {
    action: &'static str,
    properties: serde_json::Map<String, serde_json::Value>,
    rows: [&'a FileRecord; 1],
}

/// Registrar that adds one row per file to an AppSheet table.
pub struct AppSheetRegistrar {
    client: Client,
    config: AppSheetConfig,
}

impl AppSheetRegistrar {
    /// Create a registrar with the given configuration.
    pub fn new(config: AppSheetConfig) -> Result<Self, RegistrarError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| RegistrarError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build the Action endpoint URL for the configured table.
    fn action_url(&self) -> String {
        format!(
            "{}/apps/{}/tables/{}/Action",
            self.config.api_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.app_id),
            urlencoding::encode(&self.config.table)
        )
    }
}

#[async_trait]
impl RecordRegistrar for AppSheetRegistrar {
    fn name(&self) -> &str {
        "appsheet"
    }

    async fn add_record(&self, record: &FileRecord) -> Result<(), RegistrarError> {
        debug!(file = %record.filename, table = %self.config.table, "Adding record to AppSheet");

        let body = ActionRequest {
            action: "Add",
            properties: serde_json::Map::new(),
            rows: [record],
        };

        let response = self
            .client
            .post(self.action_url())
            .header(ACCESS_KEY_HEADER, &self.config.access_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RegistrarError::Timeout
                } else if e.is_connect() {
                    RegistrarError::ConnectionFailed(e.to_string())
                } else {
                    RegistrarError::Other(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RegistrarError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(())
    }
}
