//! Error types for the upload queue.

use std::time::Duration;
use thiserror::Error;

use super::types::ItemId;
use crate::registrar::RegistrarError;
use crate::storage::TransportError;

/// Message stored on an item when a failure carries no text.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unknown error";

/// Errors from staging and queue bookkeeping.
#[derive(Debug, Error)]
pub enum QueueError {
    /// No item with this id in the queue.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// The file cannot be staged.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// The file exceeds the configured size limit.
    #[error("file {name} is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// The requested state change is not allowed.
    #[error("invalid transition for item {item_id}: {from} -> {to}")]
    InvalidTransition {
        item_id: ItemId,
        from: &'static str,
        to: &'static str,
    },
}

/// Pipeline phase an item failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedPhase {
    Storage,
    Registration,
    Timeout,
    Aborted,
}

impl FailedPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Registration => "registration",
            Self::Timeout => "timeout",
            Self::Aborted => "aborted",
        }
    }
}

/// Failure of one item's two-phase pipeline.
///
/// Storage and registrar failures display as the underlying message, so the
/// text stored on the item does not depend on the phase.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Registrar(#[from] RegistrarError),

    #[error("Upload timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Upload task aborted")]
    Aborted,
}

impl UploadError {
    pub fn phase(&self) -> FailedPhase {
        match self {
            Self::Transport(_) => FailedPhase::Storage,
            Self::Registrar(_) => FailedPhase::Registration,
            Self::Timeout(_) => FailedPhase::Timeout,
            Self::Aborted => FailedPhase::Aborted,
        }
    }

    /// Message stored on the failed item.
    pub fn item_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Batch-level failures of a submission.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Joining the dispatched pipelines failed.
    #[error("batch join failed for {failed_tasks} of {attempted} upload task(s): {reason}")]
    BatchJoin {
        attempted: usize,
        failed_tasks: usize,
        reason: String,
    },
}
