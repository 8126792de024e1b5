//! # Session auto-save and resume
//!
//! [`EditingSessionManager`] keeps the persisted session slot consistent with
//! a live [`EditHistory`] and offers resumption across reloads. One manager is
//! owned by the editing screen for the prompt being edited.
//!
//! ## Protocol
//!
//! - Every history mutation that leaves at least one real edit (`len > 1`)
//!   overwrites the session slot with a snapshot tagged by the prompt id. A
//!   fresh `[seed]` history is never persisted — there is nothing to resume.
//! - On entry, [`check_resume`](EditingSessionManager::check_resume) surfaces
//!   a stored session only when its prompt id matches this manager's prompt
//!   and it contains real edits. The caller then asks the user to
//!   [`resume`](EditingSessionManager::resume) or
//!   [`discard`](EditingSessionManager::discard) — stale edits are never
//!   applied silently.
//! - Starting a new generation ([`start`](EditingSessionManager::start)) or
//!   clearing history clears the slot unconditionally: a new original
//!   supersedes any prior edit session.
//!
//! Mutating methods return whether the live history changed, so guarded
//! no-ops (undo at the original, redo at the tip) stay observable.

use crate::db::{Database, KeyValueStore};
use crate::history::{EditHistory, HistoryError};
use crate::models::EditingSession;

/// Bridges a live edit history to the persisted session slot.
pub struct EditingSessionManager<S: KeyValueStore> {
    db: Database<S>,
    prompt_id: String,
    history: Option<EditHistory>,
    pending_resume: Option<EditingSession>,
}

impl<S: KeyValueStore> EditingSessionManager<S> {
    /// Create a manager for the prompt being edited. No history exists until
    /// [`start`](Self::start) or [`resume`](Self::resume) is called.
    pub fn new(db: Database<S>, prompt_id: impl Into<String>) -> Self {
        Self {
            db,
            prompt_id: prompt_id.into(),
            history: None,
            pending_resume: None,
        }
    }

    pub fn prompt_id(&self) -> &str {
        &self.prompt_id
    }

    /// The live history, if a generation or resume has happened.
    pub fn history(&self) -> Option<&EditHistory> {
        self.history.as_ref()
    }

    /// The image currently shown, if any.
    pub fn current_image(&self) -> Option<&str> {
        self.history.as_ref().map(|h| h.current())
    }

    /// Look for a resumable session for this prompt. Returns the snapshot the
    /// user should be offered, or None when the slot is empty, belongs to a
    /// different prompt, or holds no real edits.
    pub async fn check_resume(&mut self) -> Option<&EditingSession> {
        let session = self.db.editing_session().await;
        self.pending_resume =
            session.filter(|s| s.prompt_id == self.prompt_id && s.history.len() > 1);
        self.pending_resume.as_ref()
    }

    /// Begin a fresh history from a newly generated image. Any prior session
    /// snapshot is cleared — the new original supersedes it.
    pub async fn start(&mut self, seed: impl Into<String>) {
        self.db.clear_editing_session().await;
        self.pending_resume = None;
        self.history = Some(EditHistory::new(seed));
    }

    /// Replace the live history with the pending snapshot. Returns false when
    /// no resumable session is pending or the snapshot is corrupt.
    pub fn resume(&mut self) -> bool {
        let Some(session) = self.pending_resume.take() else {
            return false;
        };
        match EditHistory::from_session(&session) {
            Ok(history) => {
                self.history = Some(history);
                true
            }
            Err(_) => false,
        }
    }

    /// Drop the pending snapshot and clear the slot; the live history (if
    /// any) is left untouched.
    pub async fn discard(&mut self) {
        self.db.clear_editing_session().await;
        self.pending_resume = None;
    }

    /// Append an edited image to the history and persist the session.
    /// Returns false when no generation has happened yet.
    pub async fn apply_edit(&mut self, image: impl Into<String>) -> bool {
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        history.apply_edit(image);
        self.persist().await;
        true
    }

    /// Undo one step. Returns whether the cursor moved.
    pub async fn undo(&mut self) -> bool {
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        if !history.undo() {
            return false;
        }
        self.persist().await;
        true
    }

    /// Redo one step. Returns whether the cursor moved.
    pub async fn redo(&mut self) -> bool {
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        if !history.redo() {
            return false;
        }
        self.persist().await;
        true
    }

    /// Jump to a state from the history timeline. `Ok(false)` means no live
    /// history exists yet.
    pub async fn jump_to(&mut self, index: usize) -> Result<bool, HistoryError> {
        let Some(history) = self.history.as_mut() else {
            return Ok(false);
        };
        history.jump_to(index)?;
        self.persist().await;
        Ok(true)
    }

    /// Discard all edits, keeping the original, and clear the session slot.
    /// Returns false when there were no edits to clear.
    pub async fn clear_history(&mut self) -> bool {
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        if !history.has_edits() {
            return false;
        }
        history.clear();
        self.db.clear_editing_session().await;
        true
    }

    /// Overwrite the session slot when real edits exist. Called after every
    /// history mutation; ordering is [mutate] then [persist], never reversed.
    async fn persist(&self) {
        if let Some(history) = &self.history {
            if history.has_edits() {
                self.db
                    .save_editing_session(&history.to_session(&self.prompt_id))
                    .await;
            }
        }
    }
}
