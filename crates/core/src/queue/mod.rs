//! Upload queue: staged files, their lifecycle, and batch submission.
//!
//! Items move through `pending -> uploading -> uploaded | failed`:
//! - **Staging**: files enter the shared [`UploadQueue`] as pending
//! - **Submission**: [`UploadOrchestrator::submit_queue`] dispatches every
//!   pending or failed item concurrently through storage then registration
//! - **Reconciliation**: uploaded items are pruned, failed ones stay for retry
//!
//! # Example
//!
//! ```ignore
//! use dropqueue_core::queue::{FileSource, QueueConfig, UploadOrchestrator, UploadQueue};
//!
//! let config = QueueConfig::default();
//! let queue = UploadQueue::new(&config);
//! queue.stage(FileSource::new("scan.pdf", "application/pdf", bytes)).await?;
//!
//! let orchestrator = UploadOrchestrator::new(config, queue.clone(), storage, registrar);
//! if let SubmitOutcome::Completed(outcome) = orchestrator.submit_queue().await? {
//!     println!("{}", outcome.message());
//! }
//! ```

mod config;
mod error;
mod runner;
mod store;
mod types;

pub use config::QueueConfig;
pub use error::{FailedPhase, OrchestratorError, QueueError, UploadError, FALLBACK_ERROR_MESSAGE};
pub use runner::{QueueUpdateCallback, UploadOrchestrator};
pub use store::UploadQueue;
pub use types::{
    BatchOutcome, FileSource, ItemId, ItemStatus, OrchestratorStatus, PreviewKind, QueueEvent,
    SkipReason, StagedItem, SubmitOutcome, DEFAULT_MIME_TYPE,
};
