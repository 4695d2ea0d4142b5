//! Planbook core: goal buckets keyed by day, week, and month over a flat
//! JSON store.
//!
//! This crate is the model half of a desktop goal tracker. A UI shell owns
//! an [`AppState`], renders [`AppState::active_bucket`] and dispatches user
//! events to its command handlers. Everything is synchronous and
//! single-threaded; each mutation is persisted before it returns.

pub mod cursor;
pub mod logging;
pub mod models;
pub mod period;
pub mod state;
pub mod storage;
pub mod store;

pub use cursor::Cursors;
pub use models::{Buckets, Settings, SettingsFile, Task, TaskId, ViewMode, WindowSize};
pub use state::AppState;
pub use storage::{LoadedTasks, Storage, StorageError};
pub use store::TaskStore;
