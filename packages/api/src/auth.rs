//! # Auth gate — mock authentication with observer notification
//!
//! [`AuthService`] is the single source of truth for "who is signed in". It
//! emulates a hosted auth provider: credentials are accepted without a real
//! backend (with a designated wrong-password sentinel for testing the failure
//! path), the resulting [`User`] is persisted through the [`Database`] so the
//! identity survives restarts, and every state change fans out synchronously
//! to subscribed observers in registration order.
//!
//! ## Observer contract
//!
//! [`subscribe`](AuthService::subscribe) registers a callback and immediately
//! invokes it once with the current state, so late subscribers are never
//! missed. It returns a [`Subscription`] disposer; after
//! [`unsubscribe`](Subscription::unsubscribe) the callback is never invoked
//! again. Notification is in-process only — no cross-tab propagation.
//!
//! ## Operations
//!
//! | Method | Behaviour |
//! |--------|-----------|
//! | [`sign_in_with_email`](AuthService::sign_in_with_email) | Validates non-empty credentials, rejects the `"wrongpassword"` sentinel, then mints and persists a user |
//! | [`sign_in_with_google`](AuthService::sign_in_with_google) | Federated variant with a fixed mock identity |
//! | [`sign_up`](AuthService::sign_up) | Requires email, password, and display name |
//! | [`sign_out`](AuthService::sign_out) | Clears the current user and notifies |
//! | [`update_profile`](AuthService::update_profile) | Merges partial fields into the current user |
//! | [`delete_account`](AuthService::delete_account) | Clears the user and wipes every persisted collection |

use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

use store::{next_id, Database, KeyValueStore, User};

/// Mock rejection path: any sign-in with this password fails.
const WRONG_PASSWORD_SENTINEL: &str = "wrongpassword";

/// Errors from authentication operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("user not authenticated")]
    Unauthenticated,
}

/// Partial profile fields to merge into the current user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

type Listener = Arc<dyn Fn(Option<&User>) + Send + Sync>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Disposer returned by [`AuthService::subscribe`].
pub struct Subscription {
    id: u64,
    listeners: Arc<Mutex<ListenerRegistry>>,
}

impl Subscription {
    /// Remove the observer; it will not be invoked again.
    pub fn unsubscribe(self) {
        let mut registry = self.listeners.lock().unwrap();
        registry.entries.retain(|(id, _)| *id != self.id);
    }
}

/// The auth gate: owns the current-user slot and the observer registry.
pub struct AuthService<S: KeyValueStore> {
    db: Database<S>,
    current: Arc<Mutex<Option<User>>>,
    listeners: Arc<Mutex<ListenerRegistry>>,
}

impl<S: KeyValueStore> AuthService<S> {
    /// Build the service, restoring any persisted signed-in user.
    pub async fn new(db: Database<S>) -> Self {
        let current = db.current_user().await;
        Self {
            db,
            current: Arc::new(Mutex::new(current)),
            listeners: Arc::new(Mutex::new(ListenerRegistry::default())),
        }
    }

    /// The signed-in user, or None. Pure read, no side effect.
    pub fn current_user(&self) -> Option<User> {
        self.current.lock().unwrap().clone()
    }

    /// Register an observer for auth state changes. The observer is invoked
    /// immediately with the current state, then on every change, in
    /// registration order.
    pub fn subscribe(&self, observer: impl Fn(Option<&User>) + Send + Sync + 'static) -> Subscription {
        let observer: Listener = Arc::new(observer);
        let id = {
            let mut registry = self.listeners.lock().unwrap();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, observer.clone()));
            id
        };
        observer(self.current_user().as_ref());
        Subscription {
            id,
            listeners: Arc::clone(&self.listeners),
        }
    }

    fn notify(&self) {
        let user = self.current_user();
        // Snapshot the callbacks so an observer may unsubscribe from within
        // its own invocation without deadlocking the registry.
        let callbacks: Vec<Listener> = {
            let registry = self.listeners.lock().unwrap();
            registry.entries.iter().map(|(_, f)| f.clone()).collect()
        };
        for callback in callbacks {
            callback(user.as_ref());
        }
    }

    async fn replace_user(&self, user: Option<User>) {
        match &user {
            Some(u) => self.db.set_current_user(u).await,
            None => self.db.clear_current_user().await,
        }
        *self.current.lock().unwrap() = user;
        self.notify();
    }

    /// Sign in with email and password. The mock accepts any non-empty
    /// credentials except the wrong-password sentinel.
    pub async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        if password == WRONG_PASSWORD_SENTINEL {
            return Err(AuthError::InvalidCredentials);
        }
        let name = email.split('@').next().unwrap_or(email).to_string();
        let user = User {
            uid: next_id("email"),
            email: Some(email.to_string()),
            name: Some(name),
            photo_url: Some(format!("https://i.pravatar.cc/150?u={email}")),
        };
        tracing::info!(uid = %user.uid, "signed in with email");
        self.replace_user(Some(user.clone())).await;
        Ok(user)
    }

    /// Federated sign-in. The mock returns a fixed Google identity.
    pub async fn sign_in_with_google(&self) -> Result<User, AuthError> {
        let user = User {
            uid: next_id("google"),
            email: Some("user@google.com".to_string()),
            name: Some("Google User".to_string()),
            photo_url: Some("https://i.pravatar.cc/150?u=google".to_string()),
        };
        tracing::info!(uid = %user.uid, "signed in with google");
        self.replace_user(Some(user.clone())).await;
        Ok(user)
    }

    /// Create an account. Email, password, and display name are all required.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<User, AuthError> {
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        if display_name.is_empty() {
            return Err(AuthError::MissingField("display name"));
        }
        let user = User {
            uid: next_id("email"),
            email: Some(email.to_string()),
            name: Some(display_name.to_string()),
            photo_url: Some(format!("https://i.pravatar.cc/150?u={email}")),
        };
        tracing::info!(uid = %user.uid, "signed up");
        self.replace_user(Some(user.clone())).await;
        Ok(user)
    }

    /// Clear the current user and notify observers.
    pub async fn sign_out(&self) {
        tracing::info!("signed out");
        self.replace_user(None).await;
    }

    /// Merge the provided fields into the current user's profile.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, AuthError> {
        let mut user = self.current_user().ok_or(AuthError::Unauthenticated)?;
        if let Some(name) = update.name {
            user.name = Some(name);
        }
        if let Some(photo_url) = update.photo_url {
            user.photo_url = Some(photo_url);
        }
        self.replace_user(Some(user.clone())).await;
        Ok(user)
    }

    /// Full account erasure: clears the current user and wipes every
    /// persisted collection, then notifies observers.
    pub async fn delete_account(&self) {
        if let Some(user) = self.current_user() {
            tracing::info!(uid = %user.uid, "deleting account");
        }
        self.db.wipe_all().await;
        *self.current.lock().unwrap() = None;
        self.notify();
    }
}

/// Encode raw avatar bytes as a `data:` URI for the profile `photo_url`.
pub fn avatar_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{MemoryStore, PromptDraft};

    async fn service() -> (Database<MemoryStore>, AuthService<MemoryStore>) {
        let db = Database::new(MemoryStore::new());
        let auth = AuthService::new(db.clone()).await;
        (db, auth)
    }

    #[tokio::test]
    async fn test_sign_in_sets_and_persists_the_user() {
        let (db, auth) = service().await;

        let user = auth.sign_in_with_email("ada@example.com", "s3cret").await.unwrap();
        assert_eq!(user.name.as_deref(), Some("ada"));
        assert_eq!(auth.current_user(), Some(user.clone()));
        assert_eq!(db.current_user().await, Some(user));
    }

    #[tokio::test]
    async fn test_invalid_credentials_leave_state_unchanged() {
        let (db, auth) = service().await;

        assert_eq!(
            auth.sign_in_with_email("", "").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.sign_in_with_email("ada@example.com", "wrongpassword").await,
            Err(AuthError::InvalidCredentials)
        );
        assert!(auth.current_user().is_none());
        assert!(db.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_sign_up_requires_every_field() {
        let (_db, auth) = service().await;

        assert_eq!(
            auth.sign_up("", "pw", "Ada").await,
            Err(AuthError::MissingField("email"))
        );
        assert_eq!(
            auth.sign_up("ada@example.com", "", "Ada").await,
            Err(AuthError::MissingField("password"))
        );
        assert_eq!(
            auth.sign_up("ada@example.com", "pw", "").await,
            Err(AuthError::MissingField("display name"))
        );

        let user = auth.sign_up("ada@example.com", "pw", "Ada").await.unwrap();
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(auth.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_subscribers_get_an_immediate_call_then_changes_in_order() {
        let (_db, auth) = service().await;
        let log = Arc::new(Mutex::new(Vec::<String>::new()));

        let log_a = Arc::clone(&log);
        let _sub_a = auth.subscribe(move |user| {
            log_a
                .lock()
                .unwrap()
                .push(format!("a:{}", user.map(|u| u.display_name()).unwrap_or("-")));
        });
        let log_b = Arc::clone(&log);
        let _sub_b = auth.subscribe(move |user| {
            log_b
                .lock()
                .unwrap()
                .push(format!("b:{}", user.map(|u| u.display_name()).unwrap_or("-")));
        });

        auth.sign_in_with_email("ada@example.com", "pw").await.unwrap();
        auth.sign_out().await;

        let events = log.lock().unwrap().clone();
        assert_eq!(events, ["a:-", "b:-", "a:ada", "b:ada", "a:-", "b:-"]);
    }

    #[tokio::test]
    async fn test_unsubscribed_observers_are_not_invoked() {
        let (_db, auth) = service().await;
        let log = Arc::new(Mutex::new(Vec::<String>::new()));

        let log_a = Arc::clone(&log);
        let sub = auth.subscribe(move |_| log_a.lock().unwrap().push("a".to_string()));
        let log_b = Arc::clone(&log);
        let _keep = auth.subscribe(move |_| log_b.lock().unwrap().push("b".to_string()));

        sub.unsubscribe();
        auth.sign_in_with_google().await.unwrap();

        let events = log.lock().unwrap().clone();
        assert_eq!(events, ["a", "b", "b"]);
    }

    #[tokio::test]
    async fn test_update_profile_merges_only_provided_fields() {
        let (_db, auth) = service().await;

        assert_eq!(
            auth.update_profile(ProfileUpdate::default()).await,
            Err(AuthError::Unauthenticated)
        );

        auth.sign_in_with_email("ada@example.com", "pw").await.unwrap();
        let updated = auth
            .update_profile(ProfileUpdate {
                name: Some("Countess".to_string()),
                photo_url: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Countess"));
        // Untouched fields survive the merge
        assert_eq!(updated.email.as_deref(), Some("ada@example.com"));
        assert!(updated.photo_url.is_some());
    }

    #[tokio::test]
    async fn test_delete_account_wipes_every_collection() {
        let (db, auth) = service().await;
        auth.sign_in_with_email("ada@example.com", "pw").await.unwrap();
        db.share_prompt(PromptDraft {
            text: "a shared idea".to_string(),
            category: "Art".to_string(),
            style: "Abstract".to_string(),
        })
        .await
        .unwrap();

        auth.delete_account().await;

        assert!(auth.current_user().is_none());
        assert!(db.current_user().await.is_none());
        assert!(db.list_shared_prompts().await.is_empty());
    }

    #[tokio::test]
    async fn test_restores_persisted_user_on_construction() {
        let db = Database::new(MemoryStore::new());
        {
            let auth = AuthService::new(db.clone()).await;
            auth.sign_in_with_email("ada@example.com", "pw").await.unwrap();
        }
        let auth = AuthService::new(db).await;
        assert_eq!(
            auth.current_user().and_then(|u| u.email),
            Some("ada@example.com".to_string())
        );
    }

    #[test]
    fn test_avatar_data_uri_encodes_the_payload() {
        let uri = avatar_data_uri("image/png", b"pixels");
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        assert_eq!(BASE64.decode(payload).unwrap(), b"pixels");
    }
}
