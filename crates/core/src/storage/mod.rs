//! Storage transports: phase one of the upload pipeline.
//!
//! A transport takes a staged file and returns a durable reference once the
//! bytes are stored. The orchestrator only sees the [`StorageTransport`] trait;
//! the backend is picked from configuration with [`create_storage`].

mod config;
mod error;
mod fs_storage;
mod simulated;
mod traits;

use std::sync::Arc;

pub use config::{FsStorageConfig, SimulatedStorageConfig, StorageBackend, StorageConfig};
pub use error::TransportError;
pub use fs_storage::FsStorage;
pub use simulated::SimulatedStorage;
pub use traits::StorageTransport;

use crate::config::ConfigError;

/// Create the storage transport selected by configuration.
pub fn create_storage(config: &StorageConfig) -> Result<Arc<dyn StorageTransport>, ConfigError> {
    match config.backend {
        StorageBackend::Simulated => Ok(Arc::new(SimulatedStorage::new(&config.simulated))),
        StorageBackend::Filesystem => {
            let fs_config = config.filesystem.as_ref().ok_or_else(|| {
                ConfigError::ValidationError(
                    "storage.filesystem is required when storage.backend = \"filesystem\""
                        .to_string(),
                )
            })?;
            Ok(Arc::new(FsStorage::new(fs_config)))
        }
    }
}
