//! Dev-mode mission tracker: a small task list persisted in a key-value store.

pub mod model;
pub mod store;
pub mod tracker;

pub use model::{MissionProgress, MissionTask, Subtask, default_tasks};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use tracker::{LoadSource, MissionTracker, STORAGE_KEY};
