//! Registrar that only logs records.

use async_trait::async_trait;
use tracing::info;

use super::error::RegistrarError;
use super::traits::RecordRegistrar;
use super::types::FileRecord;

/// Accepts every record and writes it to the log.
#[derive(Debug, Default)]
pub struct LogRegistrar;

#[async_trait]
impl RecordRegistrar for LogRegistrar {
    fn name(&self) -> &str {
        "log"
    }

    async fn add_record(&self, record: &FileRecord) -> Result<(), RegistrarError> {
        info!(
            filename = %record.filename,
            url = %record.url,
            mime_type = %record.mime_type,
            created_by = %record.created_by,
            "Registered file record"
        );
        Ok(())
    }
}
