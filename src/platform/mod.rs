//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (pointer/touch mapping, pause key)
//! - Storage (LocalStorage on web, files on native)
//! - Frame pacing

pub mod input;
pub mod storage;
pub mod time;

pub use input::{InputEvent, Key, PointerMapper, SurfaceRect};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
pub use time::{FpsCounter, FramePacer};
