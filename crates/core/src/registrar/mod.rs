//! Record registrars: phase two of the upload pipeline.
//!
//! After a file is stored, a [`FileRecord`] with its name, type, storage URL
//! and creator is handed to a [`RecordRegistrar`].

mod appsheet;
mod config;
mod error;
mod log;
mod traits;
mod types;

use std::sync::Arc;

pub use appsheet::AppSheetRegistrar;
pub use config::{AppSheetConfig, RegistrarBackend, RegistrarConfig};
pub use error::RegistrarError;
pub use log::LogRegistrar;
pub use traits::RecordRegistrar;
pub use types::FileRecord;

use crate::config::ConfigError;

/// Create the registrar selected by configuration.
pub fn create_registrar(
    config: &RegistrarConfig,
) -> Result<Arc<dyn RecordRegistrar>, ConfigError> {
    match config.backend {
        RegistrarBackend::Log => Ok(Arc::new(LogRegistrar)),
        RegistrarBackend::AppSheet => {
            let appsheet = config.appsheet.clone().ok_or_else(|| {
                ConfigError::ValidationError(
                    "registrar.appsheet is required when registrar.backend = \"appsheet\""
                        .to_string(),
                )
            })?;
            let registrar = AppSheetRegistrar::new(appsheet)
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
            Ok(Arc::new(registrar))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_log_registrar() {
        let registrar = create_registrar(&RegistrarConfig::default()).unwrap();
        assert_eq!(registrar.name(), "log");
    }

    #[test]
    fn test_appsheet_without_settings_fails() {
        let config = RegistrarConfig {
            backend: RegistrarBackend::AppSheet,
            appsheet: None,
        };
        assert!(matches!(
            create_registrar(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_log_registrar_accepts() {
        let record = FileRecord {
            filename: "a.txt".to_string(),
            url: "https://storage.example.com/files/1_a.txt".to_string(),
            mime_type: "text/plain".to_string(),
            created_by: "tester".to_string(),
        };
        assert!(LogRegistrar.add_record(&record).await.is_ok());
    }
}
