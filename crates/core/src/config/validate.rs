use super::{types::Config, ConfigError};
use crate::registrar::RegistrarBackend;
use crate::storage::StorageBackend;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - The selected storage and registrar backends have their settings
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.storage.backend == StorageBackend::Filesystem && config.storage.filesystem.is_none()
    {
        return Err(ConfigError::ValidationError(
            "storage.filesystem is required when storage.backend = \"filesystem\"".to_string(),
        ));
    }

    if config.registrar.backend == RegistrarBackend::AppSheet {
        match &config.registrar.appsheet {
            None => {
                return Err(ConfigError::ValidationError(
                    "registrar.appsheet is required when registrar.backend = \"appsheet\""
                        .to_string(),
                ))
            }
            Some(appsheet) if appsheet.app_id.is_empty() || appsheet.access_key.is_empty() => {
                return Err(ConfigError::ValidationError(
                    "registrar.appsheet.app_id and access_key cannot be empty".to_string(),
                ))
            }
            Some(_) => {}
        }
    }

    if config.queue.created_by.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "queue.created_by cannot be empty".to_string(),
        ));
    }

    Ok(())
}
