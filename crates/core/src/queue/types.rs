//! Types for the upload queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::error::QueueError;

/// MIME type assumed when the client does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Stable identifier of a staged item, assigned at staging time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Raw file handed over by the staging layer. Immutable once staged.
#[derive(Clone, PartialEq, Eq)]
pub struct FileSource {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl FileSource {
    /// Create a file source. An empty MIME type becomes
    /// `application/octet-stream`.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime_type = mime_type.into();
        let mime_type = if mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE.to_string()
        } else {
            mime_type
        };

        Self {
            name: name.into(),
            mime_type,
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSource")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// How the UI can preview a staged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewKind {
    Image,
    Pdf,
    None,
}

impl PreviewKind {
    /// Classify a declared MIME type.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            Self::Image
        } else if mime_type == "application/pdf" {
            Self::Pdf
        } else {
            Self::None
        }
    }

    /// Whether the UI holds a preview resource for this kind.
    pub fn has_preview(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Lifecycle state of a staged item.
///
/// The error message lives in `Failed`, so an item carries an error exactly
/// when it has failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Uploading,
    Uploaded,
    Failed { error: String },
}

impl ItemStatus {
    /// State name as used in events and the API.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::Failed { .. } => "failed",
        }
    }

    /// Pending and failed items can be dispatched.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Pending | Self::Failed { .. })
    }

    /// Error message of a failed item.
    pub fn last_error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error.as_str()),
            _ => None,
        }
    }
}

/// A file the user intends to upload.
#[derive(Debug, Clone)]
pub struct StagedItem {
    pub id: ItemId,
    pub source: Arc<FileSource>,
    pub preview: PreviewKind,
    pub status: ItemStatus,
    pub staged_at: DateTime<Utc>,
}

impl StagedItem {
    /// Stage a file in the `Pending` state.
    pub fn new(source: FileSource) -> Self {
        let preview = PreviewKind::from_mime(source.mime_type());
        Self {
            id: ItemId::new(),
            source: Arc::new(source),
            preview,
            status: ItemStatus::Pending,
            staged_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn is_eligible(&self) -> bool {
        self.status.is_eligible()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.status.last_error()
    }

    /// Pending/Failed -> Uploading. Clears any previous error.
    pub fn begin_upload(&mut self) -> Result<(), QueueError> {
        if !self.status.is_eligible() {
            return Err(self.invalid_transition("uploading"));
        }
        self.status = ItemStatus::Uploading;
        Ok(())
    }

    /// Uploading -> Uploaded.
    pub fn mark_uploaded(&mut self) -> Result<(), QueueError> {
        if self.status != ItemStatus::Uploading {
            return Err(self.invalid_transition("uploaded"));
        }
        self.status = ItemStatus::Uploaded;
        Ok(())
    }

    /// Uploading -> Failed.
    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<(), QueueError> {
        if self.status != ItemStatus::Uploading {
            return Err(self.invalid_transition("failed"));
        }
        self.status = ItemStatus::Failed {
            error: error.into(),
        };
        Ok(())
    }

    fn invalid_transition(&self, to: &'static str) -> QueueError {
        QueueError::InvalidTransition {
            item_id: self.id,
            from: self.status.state_name(),
            to,
        }
    }
}

/// Counts reported at the end of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Items eligible at dispatch time.
    pub attempted: usize,
    /// Items whose both phases succeeded.
    pub succeeded: usize,
}

impl BatchOutcome {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    /// User-facing summary line.
    pub fn message(&self) -> String {
        format!(
            "Successfully processed {} / {} file(s)!",
            self.succeeded, self.attempted
        )
    }
}

/// Why a submission did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptyQueue,
    AlreadyInFlight,
}

/// Result of a call to submit the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The call was a no-op.
    Skipped(SkipReason),
    /// A dispatch cycle ran to completion.
    Completed(BatchOutcome),
}

/// Snapshot of the queue and the submission guard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    /// Whether a submission is running.
    pub in_flight: bool,
    pub total: usize,
    pub pending: usize,
    pub uploading: usize,
    pub uploaded: usize,
    pub failed: usize,
}

/// Notification emitted while the queue changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueEvent {
    /// A file was staged.
    ItemStaged { item_id: ItemId, name: String },
    /// An item changed state.
    ItemUpdated {
        item_id: ItemId,
        state: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// An item left the queue.
    ItemRemoved { item_id: ItemId },
    /// A batch was dispatched.
    BatchStarted { attempted: usize },
    /// A batch finished; failed items remain for retry.
    BatchCompleted { attempted: usize, succeeded: usize },
    /// The batch join itself failed.
    BatchFailed { error: String },
}

impl QueueEvent {
    pub fn item_updated(item: &StagedItem) -> Self {
        Self::ItemUpdated {
            item_id: item.id,
            state: item.status.state_name().to_string(),
            error: item.last_error().map(str::to_string),
        }
    }

    /// Event name, for metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ItemStaged { .. } => "item_staged",
            Self::ItemUpdated { .. } => "item_updated",
            Self::ItemRemoved { .. } => "item_removed",
            Self::BatchStarted { .. } => "batch_started",
            Self::BatchCompleted { .. } => "batch_completed",
            Self::BatchFailed { .. } => "batch_failed",
        }
    }
}
