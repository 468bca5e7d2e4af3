pub mod config;
pub mod metrics;
pub mod queue;
pub mod registrar;
pub mod storage;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig,
};
pub use queue::{
    BatchOutcome, FileSource, ItemId, ItemStatus, OrchestratorError, OrchestratorStatus,
    PreviewKind, QueueConfig, QueueError, QueueEvent, QueueUpdateCallback, SkipReason, StagedItem,
    SubmitOutcome, UploadOrchestrator, UploadQueue,
};
pub use registrar::{
    create_registrar, AppSheetConfig, AppSheetRegistrar, FileRecord, LogRegistrar,
    RecordRegistrar, RegistrarBackend, RegistrarConfig, RegistrarError,
};
pub use storage::{
    create_storage, FsStorage, FsStorageConfig, SimulatedStorage, SimulatedStorageConfig,
    StorageBackend, StorageConfig, StorageTransport, TransportError,
};
