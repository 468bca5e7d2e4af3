use std::sync::Arc;

use dropqueue_core::{
    Config, QueueEvent, RecordRegistrar, SanitizedConfig, StorageTransport, UploadOrchestrator,
    UploadQueue,
};

use crate::api::WsBroadcaster;

/// Multipart framing allowance on top of the file payloads.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Number of max-size files one staging request body may carry.
const BODY_LIMIT_FILE_ALLOWANCE: usize = 16;

/// Shared application state
pub struct AppState {
    config: Config,
    queue: UploadQueue,
    orchestrator: Arc<UploadOrchestrator>,
    ws_broadcaster: WsBroadcaster,
}

impl AppState {
    pub fn new(
        config: Config,
        queue: UploadQueue,
        orchestrator: Arc<UploadOrchestrator>,
        ws_broadcaster: WsBroadcaster,
    ) -> Self {
        Self {
            config,
            queue,
            orchestrator,
            ws_broadcaster,
        }
    }

    /// Wire a queue and orchestrator over the given backends, forwarding
    /// orchestrator events to WebSocket clients.
    pub fn with_backends(
        config: Config,
        storage: Arc<dyn StorageTransport>,
        registrar: Arc<dyn RecordRegistrar>,
        ws_broadcaster: WsBroadcaster,
    ) -> Self {
        let queue = UploadQueue::new(&config.queue);

        let broadcaster_for_callback = ws_broadcaster.clone();
        let orchestrator = UploadOrchestrator::new(
            config.queue.clone(),
            queue.clone(),
            storage,
            registrar,
        )
        .with_update_callback(Arc::new(move |event: &QueueEvent| {
            broadcaster_for_callback.broadcast(event.clone());
        }));

        Self::new(config, queue, Arc::new(orchestrator), ws_broadcaster)
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    pub fn orchestrator(&self) -> &UploadOrchestrator {
        &self.orchestrator
    }

    pub fn ws_broadcaster(&self) -> &WsBroadcaster {
        &self.ws_broadcaster
    }

    /// Request body limit for staging, or `None` when file size is unlimited.
    pub fn upload_body_limit(&self) -> Option<usize> {
        self.config.queue.max_file_size().map(|limit| {
            usize::try_from(limit)
                .unwrap_or(usize::MAX)
                .saturating_mul(BODY_LIMIT_FILE_ALLOWANCE)
                .saturating_add(MULTIPART_OVERHEAD_BYTES)
        })
    }
}
