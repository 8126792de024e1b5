//! # Domain models for users, prompts, and gallery images
//!
//! Defines the record types persisted by [`crate::Database`] and the draft
//! (input) types screens hand to it. Everything is `Serialize + Deserialize`
//! so records can be stored as JSON documents and cross the UI boundary.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | The signed-in identity: opaque `uid`, email, display name, optional avatar reference. At most one user is "current" at a time. |
//! | [`Prompt`] | A saved prompt record. Lives either in the private `user_prompts` collection or, as an independent copy, in the public `shared_prompts` collection (where `sharer_display_name` is set). |
//! | [`GeneratedImage`] | A gallery entry: prompt snapshot plus an opaque image reference (URL or data URI). Immutable once saved. |
//! | [`EditingSession`] | A durable snapshot of one [`crate::EditHistory`], tagged with the prompt it belongs to. Singleton slot, overwritten on every history mutation. |
//! | [`PromptDraft`] | Input for saving or sharing a prompt (text + category + style). |
//! | [`ImageDraft`] | Input for saving a generated result to the gallery. |

use serde::{Deserialize, Serialize};

/// A signed-in user identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identity, e.g. "email_1712345678901_4"
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Avatar reference: URL or data URI
    pub photo_url: Option<String>,
}

impl User {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Anonymous")
    }
}

/// A saved prompt, either private ("my prompts") or a shared copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    /// Owning user id
    pub user_id: String,
    /// Free-text prompt body
    pub text: String,
    pub category: String,
    pub style: String,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
    /// Present only on shared/community copies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharer_display_name: Option<String>,
}

/// A generated image saved to the user's gallery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub user_id: String,
    pub prompt_id: String,
    /// Snapshot of the prompt text at save time
    pub prompt_text: String,
    /// Opaque image reference: URL or data URI
    pub image_url: String,
    pub created_at: i64,
}

/// Durable snapshot of an edit history, tied to the prompt it was started from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditingSession {
    pub prompt_id: String,
    /// Image states, original first
    pub history: Vec<String>,
    /// Cursor into `history`
    pub history_index: usize,
}

/// Input for saving or sharing a prompt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptDraft {
    pub text: String,
    pub category: String,
    pub style: String,
}

/// Input for saving a generated image to the gallery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageDraft {
    pub prompt_text: String,
    pub image_url: String,
}
