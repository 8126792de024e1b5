use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::db::KeyValueStore;

/// In-memory KeyValueStore for testing and desktop fallback.
/// Clones share the same underlying map, so a `Database` and an `AuthService`
/// built over clones of one store see the same records.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.records.lock().unwrap().get(key).cloned()
    }

    async fn put(&self, key: &str, data: Vec<u8>) {
        self.records.lock().unwrap().insert(key.to_string(), data);
    }

    async fn remove(&self, key: &str) {
        self.records.lock().unwrap().remove(key);
    }
}
