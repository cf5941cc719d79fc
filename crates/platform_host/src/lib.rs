//! Typed host-domain contracts and shared models used by the desktop runtime.
//!
//! This crate is the API-first boundary for platform services. It exposes the virtual file system
//! model and service, the app-state envelope store used for optional persistence, and time
//! helpers. It has no knowledge of windows or the Fluxo language.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod storage;
pub mod time;

pub use fs::path::{join_child_path, normalize_virtual_path};
pub use fs::service::{MemoryVirtualFs, VirtualFsService};
pub use fs::types::{extension_of, FileSystemNode, FsError, NodeKind, ROOT_NODE_ID};
pub use storage::app_state::{
    build_app_state_envelope, load_app_state_with_migration, migrate_envelope_payload,
    save_app_state_with, AppStateEnvelope, AppStateStore, AppStateStoreFuture,
    MemoryAppStateStore, NoopAppStateStore, APP_STATE_ENVELOPE_VERSION, DESKTOP_STATE_NAMESPACE,
    TERMINAL_STATE_NAMESPACE,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
