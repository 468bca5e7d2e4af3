//! Upload orchestrator implementation.
//!
//! One submission drives every eligible item through storage upload then
//! record registration. All item pipelines are spawned before any is awaited
//! and the batch waits for every one of them, whatever their outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::metrics::{BATCHES_TOTAL, BATCH_SIZE, UPLOADS_TOTAL, UPLOAD_DURATION};
use crate::registrar::{FileRecord, RecordRegistrar};
use crate::storage::StorageTransport;

use super::config::QueueConfig;
use super::error::{OrchestratorError, UploadError};
use super::store::UploadQueue;
use super::types::{
    BatchOutcome, FileSource, ItemId, OrchestratorStatus, QueueEvent, SkipReason, StagedItem,
    SubmitOutcome,
};

/// Callback invoked for every queue event the orchestrator produces.
pub type QueueUpdateCallback = Arc<dyn Fn(&QueueEvent) + Send + Sync>;

/// Held while a submission runs; releases the in-flight flag on drop.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Everything one item's pipeline needs, cloned into its task.
#[derive(Clone)]
struct ItemPipeline {
    queue: UploadQueue,
    storage: Arc<dyn StorageTransport>,
    registrar: Arc<dyn RecordRegistrar>,
    created_by: String,
    item_timeout: Option<Duration>,
    update_callback: Option<QueueUpdateCallback>,
}

impl ItemPipeline {
    /// Run both phases for one item and record the outcome on the queue.
    /// Returns whether the item was uploaded.
    async fn run(self, id: ItemId, source: Arc<FileSource>) -> bool {
        let started = Instant::now();

        let result = match self.item_timeout {
            Some(limit) => tokio::time::timeout(limit, self.upload_and_register(&source))
                .await
                .unwrap_or(Err(UploadError::Timeout(limit))),
            None => self.upload_and_register(&source).await,
        };
        let elapsed = started.elapsed().as_secs_f64();

        match result {
            Ok(url) => {
                info!(item_id = %id, file = source.name(), url = %url, "Uploaded and recorded file");
                UPLOADS_TOTAL.with_label_values(&["success"]).inc();
                UPLOAD_DURATION
                    .with_label_values(&["success"])
                    .observe(elapsed);
                self.record(id, |item| item.mark_uploaded()).await;
                true
            }
            Err(e) => {
                let phase = e.phase().as_str();
                warn!(item_id = %id, file = source.name(), phase, "Upload failed: {}", e);
                UPLOADS_TOTAL.with_label_values(&[phase]).inc();
                UPLOAD_DURATION.with_label_values(&[phase]).observe(elapsed);
                let message = e.item_message();
                self.record(id, move |item| item.mark_failed(message)).await;
                false
            }
        }
    }

    /// Phase one, then phase two only if phase one succeeded.
    async fn upload_and_register(&self, source: &FileSource) -> Result<String, UploadError> {
        debug!(file = source.name(), storage = self.storage.name(), "Uploading to storage");
        let url = self.storage.upload(source).await?;

        let record = FileRecord {
            filename: source.name().to_string(),
            url: url.clone(),
            mime_type: source.mime_type().to_string(),
            created_by: self.created_by.clone(),
        };
        debug!(file = source.name(), registrar = self.registrar.name(), "Adding file record");
        self.registrar.add_record(&record).await?;

        Ok(url)
    }

    async fn record<F>(&self, id: ItemId, change: F)
    where
        F: FnOnce(&mut StagedItem) -> Result<(), super::error::QueueError>,
    {
        match self.queue.update(id, change).await {
            Ok(Some(item)) => notify(&self.update_callback, &QueueEvent::item_updated(&item)),
            Ok(None) => debug!(item_id = %id, "Item removed while uploading, result dropped"),
            Err(e) => warn!(item_id = %id, "Failed to record upload result: {}", e),
        }
    }
}

fn notify(callback: &Option<QueueUpdateCallback>, event: &QueueEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

/// Drives staged items through storage and registration.
pub struct UploadOrchestrator {
    config: QueueConfig,
    queue: UploadQueue,
    storage: Arc<dyn StorageTransport>,
    registrar: Arc<dyn RecordRegistrar>,
    in_flight: AtomicBool,
    update_callback: Option<QueueUpdateCallback>,
}

impl UploadOrchestrator {
    /// Create an orchestrator over a shared queue.
    pub fn new(
        config: QueueConfig,
        queue: UploadQueue,
        storage: Arc<dyn StorageTransport>,
        registrar: Arc<dyn RecordRegistrar>,
    ) -> Self {
        Self {
            config,
            queue,
            storage,
            registrar,
            in_flight: AtomicBool::new(false),
            update_callback: None,
        }
    }

    /// Set a callback for item and batch events.
    pub fn with_update_callback(mut self, callback: QueueUpdateCallback) -> Self {
        self.update_callback = Some(callback);
        self
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    /// Whether a submission is currently running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Current item counts and submission state.
    pub async fn status(&self) -> OrchestratorStatus {
        OrchestratorStatus {
            in_flight: self.is_in_flight(),
            ..self.queue.counts().await
        }
    }

    /// Submit every pending or failed item.
    ///
    /// Does nothing when the queue is empty or another submission is running.
    /// Otherwise waits for every dispatched item to finish, removes the
    /// uploaded ones and reports the counts. Failed items stay queued for a
    /// later retry.
    pub async fn submit_queue(&self) -> Result<SubmitOutcome, OrchestratorError> {
        if self.queue.is_empty().await {
            debug!("Submit ignored: queue is empty");
            BATCHES_TOTAL.with_label_values(&["skipped"]).inc();
            return Ok(SubmitOutcome::Skipped(SkipReason::EmptyQueue));
        }

        let Some(guard) = SubmissionGuard::try_acquire(&self.in_flight) else {
            debug!("Submit ignored: a submission is already in flight");
            BATCHES_TOTAL.with_label_values(&["skipped"]).inc();
            return Ok(SubmitOutcome::Skipped(SkipReason::AlreadyInFlight));
        };

        let dispatched = self.queue.begin_eligible().await;
        let attempted = dispatched.len();
        if attempted == 0 {
            debug!("Submit found no pending or failed items");
            return Ok(SubmitOutcome::Completed(BatchOutcome::default()));
        }

        info!(attempted, "Starting upload batch");
        BATCH_SIZE.observe(attempted as f64);
        self.notify(&QueueEvent::BatchStarted { attempted });
        for item in &dispatched {
            self.notify(&QueueEvent::item_updated(item));
        }

        let pipeline = ItemPipeline {
            queue: self.queue.clone(),
            storage: Arc::clone(&self.storage),
            registrar: Arc::clone(&self.registrar),
            created_by: self.config.created_by.clone(),
            item_timeout: self.config.item_timeout(),
            update_callback: self.update_callback.clone(),
        };

        let (ids, handles): (Vec<ItemId>, Vec<_>) = dispatched
            .into_iter()
            .map(|item| {
                let task = pipeline.clone().run(item.id, Arc::clone(&item.source));
                (item.id, tokio::spawn(task))
            })
            .unzip();

        let mut succeeded = 0;
        let mut aborted = Vec::new();
        for (id, joined) in ids.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(true) => succeeded += 1,
                Ok(false) => {}
                Err(e) => aborted.push((id, e.to_string())),
            }
        }

        // A task that never reported must not stay in Uploading.
        let abort_message = UploadError::Aborted.item_message();
        for (id, _) in &aborted {
            let message = abort_message.clone();
            pipeline.record(*id, move |item| item.mark_failed(message)).await;
        }

        for id in self.queue.prune_uploaded().await {
            self.notify(&QueueEvent::ItemRemoved { item_id: id });
        }

        drop(guard);

        if let Some((_, reason)) = aborted.first() {
            let err = OrchestratorError::BatchJoin {
                attempted,
                failed_tasks: aborted.len(),
                reason: reason.clone(),
            };
            error!("Upload batch failed: {}", err);
            BATCHES_TOTAL.with_label_values(&["join_failed"]).inc();
            self.notify(&QueueEvent::BatchFailed {
                error: err.to_string(),
            });
            return Err(err);
        }

        let outcome = BatchOutcome {
            attempted,
            succeeded,
        };
        info!(
            "Successfully processed {} / {} file(s)",
            outcome.succeeded, outcome.attempted
        );
        BATCHES_TOTAL.with_label_values(&["completed"]).inc();
        self.notify(&QueueEvent::BatchCompleted {
            attempted,
            succeeded,
        });

        Ok(SubmitOutcome::Completed(outcome))
    }

    fn notify(&self, event: &QueueEvent) {
        notify(&self.update_callback, event);
    }
}
