//! # Filesystem-backed record store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists each
//! record key as one file under a base directory. It is used on desktop and
//! mobile platforms to retain the signed-in user, prompt collections, gallery,
//! and editing session across app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── dynapix_current_user
//! ├── dynapix_user_prompts
//! ├── dynapix_shared_prompts
//! ├── dynapix_generated_images
//! └── dynapix_editing_session
//! ```
//!
//! Each file holds the raw JSON bytes of the record; an absent file is an
//! absent record. Write errors are swallowed — the store degrades to "no
//! local data" rather than failing the caller, matching the other backends.

use std::path::PathBuf;

use crate::db::KeyValueStore;

/// Filesystem-backed KeyValueStore for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        std::fs::read(self.record_path(key)).ok()
    }

    async fn put(&self, key: &str, data: Vec<u8>) {
        let path = self.record_path(key);
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(path, data);
    }

    async fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.record_path(key));
    }
}
