//! # Database — collection operations on an abstract key-value store
//!
//! This module is the core of Dynapix's mock persistence layer. [`Database`]
//! emulates a remote document database over the [`KeyValueStore`] trait, so the
//! same logic works against an in-memory store (tests), a filesystem store
//! (desktop/mobile), or an IndexedDB store (web) — and could later be swapped
//! for a real network-backed store without touching callers.
//!
//! ## [`KeyValueStore`] trait
//!
//! An async interface with three methods — `get`/`put` for JSON document bytes
//! keyed by collection name, and `remove` for clearing a slot. Implementations
//! live in sibling modules ([`crate::memory`], [`crate::file_store`],
//! [`crate::idb`]).
//!
//! ## Collections
//!
//! | Key | Contents |
//! |-----|----------|
//! | `dynapix_current_user` | Singleton [`User`] slot (absent = signed out) |
//! | `dynapix_user_prompts` | Private [`Prompt`] list, most recent first |
//! | `dynapix_shared_prompts` | Public [`Prompt`] list (append-only feed) |
//! | `dynapix_generated_images` | [`GeneratedImage`] gallery, most recent first |
//! | `dynapix_editing_session` | Singleton [`EditingSession`] snapshot |
//!
//! Inserts prepend, so "most recent first" holds by construction and no
//! secondary ordering or index is needed. Owner-scoped reads are linear
//! filters by `user_id`.
//!
//! ## Error policy
//!
//! Mutating collection operations require a signed-in user and fail with
//! [`StoreError::Unauthenticated`] otherwise. Reads never fail: a missing or
//! unreadable record degrades to `None` / an empty list.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{EditingSession, GeneratedImage, ImageDraft, Prompt, PromptDraft, User};

const CURRENT_USER_KEY: &str = "dynapix_current_user";
const USER_PROMPTS_KEY: &str = "dynapix_user_prompts";
const SHARED_PROMPTS_KEY: &str = "dynapix_shared_prompts";
const GENERATED_IMAGES_KEY: &str = "dynapix_generated_images";
const EDITING_SESSION_KEY: &str = "dynapix_editing_session";

/// Errors from mutating store operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StoreError {
    #[error("user not authenticated")]
    Unauthenticated,
}

/// Async trait for storing and retrieving JSON documents by key.
pub trait KeyValueStore {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Option<Vec<u8>>>;
    fn put(
        &self,
        key: &str,
        data: Vec<u8>,
    ) -> impl std::future::Future<Output = ()>;
    fn remove(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = ()>;
}

/// A mock remote database backed by a KeyValueStore.
#[derive(Clone, Debug)]
pub struct Database<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Database<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key).await?;
        serde_json::from_slice(&raw).ok()
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(raw) = serde_json::to_vec(value) {
            self.store.put(key, raw).await;
        }
    }

    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read(key).await.unwrap_or_default()
    }

    /// The user currently recorded as signed in, or None.
    pub async fn current_user(&self) -> Option<User> {
        self.read(CURRENT_USER_KEY).await
    }

    /// Record `user` as the current signed-in identity.
    pub async fn set_current_user(&self, user: &User) {
        self.write(CURRENT_USER_KEY, user).await;
    }

    /// Clear the current-user slot (sign-out).
    pub async fn clear_current_user(&self) {
        self.store.remove(CURRENT_USER_KEY).await;
    }

    /// Resolve the current user or fail with `Unauthenticated`.
    async fn require_user(&self) -> Result<User, StoreError> {
        self.current_user().await.ok_or(StoreError::Unauthenticated)
    }

    /// Save a prompt to the signed-in user's private collection.
    /// The new record is prepended, so listings come back most-recent-first.
    pub async fn save_user_prompt(&self, draft: PromptDraft) -> Result<Prompt, StoreError> {
        let user = self.require_user().await?;
        let prompt = Prompt {
            id: next_id("user_prompt"),
            user_id: user.uid,
            text: draft.text,
            category: draft.category,
            style: draft.style,
            created_at: now_millis(),
            sharer_display_name: None,
        };
        let mut prompts: Vec<Prompt> = self.read_list(USER_PROMPTS_KEY).await;
        prompts.insert(0, prompt.clone());
        self.write(USER_PROMPTS_KEY, &prompts).await;
        Ok(prompt)
    }

    /// List private prompts owned by `owner_id`, most recent first.
    pub async fn list_user_prompts(&self, owner_id: &str) -> Vec<Prompt> {
        let prompts: Vec<Prompt> = self.read_list(USER_PROMPTS_KEY).await;
        prompts.into_iter().filter(|p| p.user_id == owner_id).collect()
    }

    /// List the signed-in user's private prompts; empty when signed out.
    pub async fn list_my_prompts(&self) -> Vec<Prompt> {
        match self.current_user().await {
            Some(user) => self.list_user_prompts(&user.uid).await,
            None => Vec::new(),
        }
    }

    /// Delete the private prompt matching both `id` and `owner_id`.
    /// Deleting a missing or foreign-owned id is a silent no-op.
    pub async fn delete_user_prompt(&self, id: &str, owner_id: &str) -> Result<(), StoreError> {
        self.require_user().await?;
        let mut prompts: Vec<Prompt> = self.read_list(USER_PROMPTS_KEY).await;
        prompts.retain(|p| p.id != id || p.user_id != owner_id);
        self.write(USER_PROMPTS_KEY, &prompts).await;
        Ok(())
    }

    /// Publish a copy of a prompt to the community feed, stamped with the
    /// sharer's display name. The private original is untouched.
    pub async fn share_prompt(&self, draft: PromptDraft) -> Result<Prompt, StoreError> {
        let user = self.require_user().await?;
        let prompt = Prompt {
            id: next_id("shared"),
            user_id: user.uid.clone(),
            text: draft.text,
            category: draft.category,
            style: draft.style,
            created_at: now_millis(),
            sharer_display_name: Some(user.display_name().to_string()),
        };
        let mut prompts: Vec<Prompt> = self.read_list(SHARED_PROMPTS_KEY).await;
        prompts.insert(0, prompt.clone());
        self.write(SHARED_PROMPTS_KEY, &prompts).await;
        Ok(prompt)
    }

    /// The entire community feed, most recent first. Public — no owner filter.
    pub async fn list_shared_prompts(&self) -> Vec<Prompt> {
        self.read_list(SHARED_PROMPTS_KEY).await
    }

    /// Save a generated result to the signed-in user's gallery.
    pub async fn save_generated_image(
        &self,
        draft: ImageDraft,
    ) -> Result<GeneratedImage, StoreError> {
        let user = self.require_user().await?;
        let image = GeneratedImage {
            id: next_id("image"),
            user_id: user.uid,
            prompt_id: next_id("prompt"),
            prompt_text: draft.prompt_text,
            image_url: draft.image_url,
            created_at: now_millis(),
        };
        let mut images: Vec<GeneratedImage> = self.read_list(GENERATED_IMAGES_KEY).await;
        images.insert(0, image.clone());
        self.write(GENERATED_IMAGES_KEY, &images).await;
        Ok(image)
    }

    /// List gallery images owned by `owner_id`, most recent first.
    pub async fn list_user_images(&self, owner_id: &str) -> Vec<GeneratedImage> {
        let images: Vec<GeneratedImage> = self.read_list(GENERATED_IMAGES_KEY).await;
        images.into_iter().filter(|i| i.user_id == owner_id).collect()
    }

    /// List the signed-in user's gallery; empty (not an error) when signed out.
    pub async fn list_my_images(&self) -> Vec<GeneratedImage> {
        match self.current_user().await {
            Some(user) => self.list_user_images(&user.uid).await,
            None => Vec::new(),
        }
    }

    /// Overwrite the singleton editing-session slot.
    pub async fn save_editing_session(&self, session: &EditingSession) {
        self.write(EDITING_SESSION_KEY, session).await;
    }

    /// Read the editing-session slot, if one is stored.
    pub async fn editing_session(&self) -> Option<EditingSession> {
        self.read(EDITING_SESSION_KEY).await
    }

    /// Clear the editing-session slot.
    pub async fn clear_editing_session(&self) {
        self.store.remove(EDITING_SESSION_KEY).await;
    }

    /// Erase every collection and singleton slot (account deletion).
    pub async fn wipe_all(&self) {
        tracing::info!("wiping all persisted collections");
        self.store.remove(CURRENT_USER_KEY).await;
        self.store.remove(USER_PROMPTS_KEY).await;
        self.store.remove(SHARED_PROMPTS_KEY).await;
        self.store.remove(GENERATED_IMAGES_KEY).await;
        self.store.remove(EDITING_SESSION_KEY).await;
    }
}

static RECORD_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a record id: `<prefix>_<millis>_<n>`. The counter disambiguates
/// records created within the same millisecond.
pub fn next_id(prefix: &str) -> String {
    let n = RECORD_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{}_{n}", now_millis())
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn user(uid: &str, name: &str) -> User {
        User {
            uid: uid.to_string(),
            email: Some(format!("{uid}@example.com")),
            name: Some(name.to_string()),
            photo_url: None,
        }
    }

    fn draft(text: &str) -> PromptDraft {
        PromptDraft {
            text: text.to_string(),
            category: "Art".to_string(),
            style: "Cyberpunk".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_requires_signed_in_user() {
        let db = Database::new(MemoryStore::new());

        assert_eq!(
            db.save_user_prompt(draft("a fox")).await,
            Err(StoreError::Unauthenticated)
        );
        assert_eq!(
            db.share_prompt(draft("a fox")).await,
            Err(StoreError::Unauthenticated)
        );
        let image = ImageDraft {
            prompt_text: "a fox".to_string(),
            image_url: "img://fox".to_string(),
        };
        assert_eq!(
            db.save_generated_image(image).await,
            Err(StoreError::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn test_reads_degrade_to_empty_when_signed_out() {
        let db = Database::new(MemoryStore::new());

        assert!(db.current_user().await.is_none());
        assert!(db.list_my_prompts().await.is_empty());
        assert!(db.list_my_images().await.is_empty());
        assert!(db.list_shared_prompts().await.is_empty());
    }

    #[tokio::test]
    async fn test_prompts_are_scoped_to_their_owner() {
        let db = Database::new(MemoryStore::new());

        db.set_current_user(&user("u1", "One")).await;
        let p = db.save_user_prompt(draft("private to u1")).await.unwrap();

        db.set_current_user(&user("u2", "Two")).await;
        db.save_user_prompt(draft("private to u2")).await.unwrap();

        let u2_prompts = db.list_my_prompts().await;
        assert_eq!(u2_prompts.len(), 1);
        assert_eq!(u2_prompts[0].text, "private to u2");
        assert!(u2_prompts.iter().all(|q| q.id != p.id));

        let u1_prompts = db.list_user_prompts("u1").await;
        assert_eq!(u1_prompts.len(), 1);
        assert_eq!(u1_prompts[0].id, p.id);
    }

    #[tokio::test]
    async fn test_listings_are_most_recent_first() {
        let db = Database::new(MemoryStore::new());
        db.set_current_user(&user("u1", "One")).await;

        db.save_user_prompt(draft("first")).await.unwrap();
        db.save_user_prompt(draft("second")).await.unwrap();

        let prompts = db.list_my_prompts().await;
        assert_eq!(prompts[0].text, "second");
        assert_eq!(prompts[1].text, "first");
    }

    #[tokio::test]
    async fn test_delete_is_silent_for_missing_or_foreign_ids() {
        let db = Database::new(MemoryStore::new());
        db.set_current_user(&user("u1", "One")).await;
        let p = db.save_user_prompt(draft("keep me")).await.unwrap();

        // Missing id: no-op
        db.delete_user_prompt("user_prompt_nope", "u1").await.unwrap();
        // Right id, wrong owner: no-op
        db.delete_user_prompt(&p.id, "u2").await.unwrap();
        assert_eq!(db.list_user_prompts("u1").await.len(), 1);

        // Signed out: rejected, record untouched
        db.clear_current_user().await;
        assert_eq!(
            db.delete_user_prompt(&p.id, "u1").await,
            Err(StoreError::Unauthenticated)
        );
        assert_eq!(db.list_user_prompts("u1").await.len(), 1);

        // Matching id and owner: removed
        db.set_current_user(&user("u1", "One")).await;
        db.delete_user_prompt(&p.id, "u1").await.unwrap();
        assert!(db.list_user_prompts("u1").await.is_empty());
    }

    #[tokio::test]
    async fn test_sharing_copies_and_stamps_display_name() {
        let db = Database::new(MemoryStore::new());
        db.set_current_user(&user("u1", "Ada")).await;

        db.save_user_prompt(draft("a city at dawn")).await.unwrap();
        let shared = db.share_prompt(draft("a city at dawn")).await.unwrap();

        assert_eq!(shared.sharer_display_name.as_deref(), Some("Ada"));
        // Sharing is a copy, not a move
        assert_eq!(db.list_user_prompts("u1").await.len(), 1);
        // The feed is public, readable signed out
        db.clear_current_user().await;
        let feed = db.list_shared_prompts().await;
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, shared.id);
    }

    #[tokio::test]
    async fn test_gallery_save_and_owner_filter() {
        let db = Database::new(MemoryStore::new());
        db.set_current_user(&user("u1", "One")).await;

        let saved = db
            .save_generated_image(ImageDraft {
                prompt_text: "a lion".to_string(),
                image_url: "img://lion".to_string(),
            })
            .await
            .unwrap();

        let images = db.list_my_images().await;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, saved.id);
        assert!(db.list_user_images("u2").await.is_empty());
    }

    #[tokio::test]
    async fn test_editing_session_slot_roundtrip() {
        let db = Database::new(MemoryStore::new());
        assert!(db.editing_session().await.is_none());

        let session = EditingSession {
            prompt_id: "p1".to_string(),
            history: vec!["img0".to_string(), "img1".to_string()],
            history_index: 1,
        };
        db.save_editing_session(&session).await;
        assert_eq!(db.editing_session().await, Some(session));

        db.clear_editing_session().await;
        assert!(db.editing_session().await.is_none());
    }

    #[tokio::test]
    async fn test_wipe_all_erases_every_collection() {
        let db = Database::new(MemoryStore::new());
        db.set_current_user(&user("u1", "One")).await;
        db.save_user_prompt(draft("p")).await.unwrap();
        db.share_prompt(draft("s")).await.unwrap();
        db.save_generated_image(ImageDraft {
            prompt_text: "i".to_string(),
            image_url: "img://i".to_string(),
        })
        .await
        .unwrap();
        db.save_editing_session(&EditingSession {
            prompt_id: "p1".to_string(),
            history: vec!["a".to_string(), "b".to_string()],
            history_index: 1,
        })
        .await;

        db.wipe_all().await;

        assert!(db.current_user().await.is_none());
        assert!(db.list_user_prompts("u1").await.is_empty());
        assert!(db.list_shared_prompts().await.is_empty());
        assert!(db.list_user_images("u1").await.is_empty());
        assert!(db.editing_session().await.is_none());
    }

    #[test]
    fn test_next_id_is_unique_within_a_millisecond() {
        let a = next_id("user_prompt");
        let b = next_id("user_prompt");
        assert_ne!(a, b);
        assert!(a.starts_with("user_prompt_"));
    }
}
