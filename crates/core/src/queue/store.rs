//! Shared list of staged items.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::config::QueueConfig;
use super::error::QueueError;
use super::types::{FileSource, ItemId, ItemStatus, OrchestratorStatus, StagedItem};
use crate::metrics::{ITEMS_REJECTED, ITEMS_STAGED};

/// The staging queue shared between the orchestrator and its observers.
///
/// Cloning is cheap and every clone sees the same items. Items are kept in
/// staging order and addressed by their [`ItemId`], never by position.
#[derive(Debug, Clone)]
pub struct UploadQueue {
    items: Arc<RwLock<Vec<StagedItem>>>,
    max_file_size: Option<u64>,
}

impl Default for UploadQueue {
    fn default() -> Self {
        Self::new(&QueueConfig::default())
    }
}

impl UploadQueue {
    /// Create an empty queue using the configured staging limits.
    pub fn new(config: &QueueConfig) -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            max_file_size: config.max_file_size(),
        }
    }

    /// Validate and stage a file as `Pending`.
    pub async fn stage(&self, source: FileSource) -> Result<StagedItem, QueueError> {
        if let Err(e) = self.validate(&source) {
            let reason = match e {
                QueueError::FileTooLarge { .. } => "too_large",
                _ => "invalid",
            };
            ITEMS_REJECTED.with_label_values(&[reason]).inc();
            return Err(e);
        }

        let item = StagedItem::new(source);
        debug!(
            item_id = %item.id,
            file = item.name(),
            size = item.source.size(),
            "Staged file"
        );
        self.items.write().await.push(item.clone());
        ITEMS_STAGED.inc();
        Ok(item)
    }

    fn validate(&self, source: &FileSource) -> Result<(), QueueError> {
        if source.name().trim().is_empty() {
            return Err(QueueError::InvalidFile("file name is empty".to_string()));
        }
        if let Some(limit) = self.max_file_size {
            if source.size() > limit {
                return Err(QueueError::FileTooLarge {
                    name: source.name().to_string(),
                    size: source.size(),
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Snapshot of all items in staging order.
    pub async fn list(&self) -> Vec<StagedItem> {
        self.items.read().await.clone()
    }

    pub async fn get(&self, id: ItemId) -> Option<StagedItem> {
        self.items.read().await.iter().find(|i| i.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Remove one item, whatever its state.
    ///
    /// Dropping the returned item releases its preview data once no running
    /// pipeline still holds the source.
    pub async fn remove(&self, id: ItemId) -> Result<StagedItem, QueueError> {
        let mut items = self.items.write().await;
        let pos = items
            .iter()
            .position(|i| i.id == id)
            .ok_or(QueueError::ItemNotFound(id))?;
        let item = items.remove(pos);
        debug!(item_id = %id, preview = item.preview.has_preview(), "Removed staged file");
        Ok(item)
    }

    /// Remove every item. Returns the removed items.
    pub async fn clear(&self) -> Vec<StagedItem> {
        let removed = std::mem::take(&mut *self.items.write().await);
        debug!(count = removed.len(), "Cleared staging queue");
        removed
    }

    /// Count items per state.
    pub async fn counts(&self) -> OrchestratorStatus {
        let items = self.items.read().await;
        let mut status = OrchestratorStatus {
            total: items.len(),
            ..Default::default()
        };
        for item in items.iter() {
            match item.status {
                ItemStatus::Pending => status.pending += 1,
                ItemStatus::Uploading => status.uploading += 1,
                ItemStatus::Uploaded => status.uploaded += 1,
                ItemStatus::Failed { .. } => status.failed += 1,
            }
        }
        status
    }

    /// Move every eligible item to `Uploading` under a single lock and
    /// return what has to be dispatched, in queue order.
    pub(crate) async fn begin_eligible(&self) -> Vec<StagedItem> {
        let mut items = self.items.write().await;
        let mut dispatched = Vec::new();
        for item in items.iter_mut().filter(|i| i.is_eligible()) {
            // Eligibility was just checked, so this cannot fail.
            if item.begin_upload().is_ok() {
                dispatched.push(item.clone());
            }
        }
        dispatched
    }

    /// Apply a state change to one item by id.
    ///
    /// Returns `Ok(None)` when the item is gone (removed by the user while
    /// its upload was running).
    pub(crate) async fn update<F>(&self, id: ItemId, change: F) -> Result<Option<StagedItem>, QueueError>
    where
        F: FnOnce(&mut StagedItem) -> Result<(), QueueError>,
    {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                change(item)?;
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }

    /// Drop every `Uploaded` item. Returns the ids removed.
    pub(crate) async fn prune_uploaded(&self) -> Vec<ItemId> {
        let mut items = self.items.write().await;
        let mut removed = Vec::new();
        items.retain(|i| {
            if i.status == ItemStatus::Uploaded {
                removed.push(i.id);
                false
            } else {
                true
            }
        });
        removed
    }
}
