//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory elsewhere)
//! - Wall-clock time

pub mod storage;
pub mod time;

pub use storage::{KeyValueStore, MemoryStore, StorageError};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use time::now_ms;
