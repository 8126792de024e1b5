pub mod db;
pub mod history;
pub mod models;
pub mod session;

mod memory;
pub use memory::MemoryStore;

mod file_store;
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod idb;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use idb::IdbStore;

pub use db::{next_id, now_millis, Database, KeyValueStore, StoreError};
pub use history::{EditHistory, HistoryError};
pub use models::{EditingSession, GeneratedImage, ImageDraft, Prompt, PromptDraft, User};
pub use session::EditingSessionManager;
