//! Snapshot persistence: capture/restore, storage backends, autosave
//! scheduling and session bookkeeping

mod autosave;
mod serializer;
mod session;
mod snapshot;
mod storage;

pub use autosave::{AutosaveScheduler, SaveTrigger, DEFAULT_QUIET_WINDOW, MAX_QUIET_WINDOW};
pub use serializer::{capture, restore, RestoreReport, StateSerializer, STORAGE_KEY};
pub use session::SessionContext;
pub use snapshot::Snapshot;
pub use storage::{DisabledStore, FileStore, KeyValueStore, MemoryStore, StorageError};
