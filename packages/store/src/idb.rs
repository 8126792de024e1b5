//! # IndexedDB record store — browser-side persistence
//!
//! [`IdbStore`] is the [`KeyValueStore`] implementation used on the **web
//! platform**. It persists the Dynapix collections into the browser's
//! IndexedDB via the [`rexie`] crate, standing in for the browser's
//! `localStorage` with an async contract that matches the other backends.
//!
//! ## Database schema
//!
//! A single IndexedDB database named `"dynapix"` (version 1) with one object
//! store:
//!
//! | IndexedDB store | Key | Value |
//! |-----------------|-----|-------|
//! | `"records"` | collection key (e.g. `"dynapix_user_prompts"`) | `Vec<u8>` of JSON (serialised via `serde_wasm_bindgen`) |
//!
//! ## Connection management
//!
//! `IdbStore` holds only the database name and opens a fresh [`Rexie`]
//! connection on every operation. `Rexie` does not implement `Clone`, and
//! reopening is cheap because the browser caches IndexedDB connections
//! internally.
//!
//! ## Error handling
//!
//! All trait methods silently swallow errors (returning `None` for reads,
//! doing nothing for writes). A corrupted or unavailable IndexedDB degrades
//! to "no local data" rather than crashing the UI.

use crate::db::KeyValueStore;
use rexie::{ObjectStore as RexieObjectStore, Rexie, TransactionMode};
use wasm_bindgen::JsValue;

const DB_NAME: &str = "dynapix";
const DB_VERSION: u32 = 1;
const RECORDS_STORE: &str = "records";

/// IndexedDB-backed KeyValueStore for the web platform.
#[derive(Clone)]
pub struct IdbStore {
    db_name: String,
}

impl Default for IdbStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdbStore {
    pub fn new() -> Self {
        Self {
            db_name: DB_NAME.to_string(),
        }
    }

    async fn open_db(&self) -> Result<Rexie, rexie::Error> {
        Rexie::builder(&self.db_name)
            .version(DB_VERSION)
            .add_object_store(RexieObjectStore::new(RECORDS_STORE))
            .build()
            .await
    }
}

impl KeyValueStore for IdbStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let db = self.open_db().await.ok()?;
        let tx = db
            .transaction(&[RECORDS_STORE], TransactionMode::ReadOnly)
            .ok()?;
        let store = tx.store(RECORDS_STORE).ok()?;

        let value = store.get(JsValue::from_str(key)).await.ok()?;
        let js_val = value?;
        serde_wasm_bindgen::from_value(js_val).ok()
    }

    async fn put(&self, key: &str, data: Vec<u8>) {
        let Ok(db) = self.open_db().await else {
            return;
        };
        let Ok(tx) = db.transaction(&[RECORDS_STORE], TransactionMode::ReadWrite) else {
            return;
        };
        let Ok(store) = tx.store(RECORDS_STORE) else {
            return;
        };

        let key = JsValue::from_str(key);
        let value = serde_wasm_bindgen::to_value(&data).unwrap_or(JsValue::NULL);
        let _ = store.put(&value, Some(&key)).await;
        let _ = tx.done().await;
    }

    async fn remove(&self, key: &str) {
        let Ok(db) = self.open_db().await else {
            return;
        };
        let Ok(tx) = db.transaction(&[RECORDS_STORE], TransactionMode::ReadWrite) else {
            return;
        };
        let Ok(store) = tx.store(RECORDS_STORE) else {
            return;
        };

        let _ = store.delete(JsValue::from_str(key)).await;
        let _ = tx.done().await;
    }
}
