//! # EditHistory — linear undo/redo over image states
//!
//! The in-memory state machine behind the image editor. An [`EditHistory`] is
//! an ordered sequence of image references (`states[0]` is always the unedited
//! original) plus a cursor selecting the current state.
//!
//! ## Transitions
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`new`](EditHistory::new) | `states = [seed]`, `cursor = 0` — a fresh generation |
//! | [`apply_edit`](EditHistory::apply_edit) | Truncate everything after the cursor, append the new state, move the cursor to it |
//! | [`undo`](EditHistory::undo) / [`redo`](EditHistory::redo) | Move the cursor one step; guarded no-ops at the boundaries, returning whether the cursor moved |
//! | [`jump_to`](EditHistory::jump_to) | Set the cursor to an arbitrary index; out of range is a hard error |
//! | [`clear`](EditHistory::clear) | Discard all edits, keeping only the original |
//!
//! History is strictly linear: applying an edit after undoing discards the
//! forward states, as in conventional editors. There is no redo branching.

use thiserror::Error;

use crate::models::EditingSession;

/// Errors from history navigation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum HistoryError {
    #[error("history index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered image states plus a cursor, supporting linear undo/redo.
#[derive(Clone, Debug, PartialEq)]
pub struct EditHistory {
    states: Vec<String>,
    cursor: usize,
}

impl EditHistory {
    /// Start a history from a freshly generated image.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            states: vec![seed.into()],
            cursor: 0,
        }
    }

    /// Rebuild a history from a persisted snapshot. Fails if the snapshot's
    /// cursor does not point inside its state list.
    pub fn from_session(session: &EditingSession) -> Result<Self, HistoryError> {
        if session.history.is_empty() || session.history_index >= session.history.len() {
            return Err(HistoryError::IndexOutOfRange {
                index: session.history_index,
                len: session.history.len(),
            });
        }
        Ok(Self {
            states: session.history.clone(),
            cursor: session.history_index,
        })
    }

    /// Serialize for the persisted session slot, tagged with its prompt.
    pub fn to_session(&self, prompt_id: impl Into<String>) -> EditingSession {
        EditingSession {
            prompt_id: prompt_id.into(),
            history: self.states.clone(),
            history_index: self.cursor,
        }
    }

    /// The image the editor is currently showing.
    pub fn current(&self) -> &str {
        &self.states[self.cursor]
    }

    /// The unedited original this history was seeded with.
    pub fn original(&self) -> &str {
        &self.states[0]
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether at least one real edit exists beyond the original.
    pub fn has_edits(&self) -> bool {
        self.states.len() > 1
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.states.len() - 1
    }

    /// Append an edited state. Any states after the cursor are discarded
    /// first — editing after an undo abandons the redo branch.
    pub fn apply_edit(&mut self, image: impl Into<String>) {
        self.states.truncate(self.cursor + 1);
        self.states.push(image.into());
        self.cursor = self.states.len() - 1;
    }

    /// Step the cursor back one state. Returns false (and does nothing) when
    /// already at the original.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step the cursor forward one state. Returns false (and does nothing)
    /// when already at the newest state.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move the cursor to an arbitrary state, e.g. from the history timeline.
    pub fn jump_to(&mut self, index: usize) -> Result<(), HistoryError> {
        if index >= self.states.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: self.states.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    /// Discard all edits, keeping only the original state.
    pub fn clear(&mut self) {
        self.states.truncate(1);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_never_displaced_by_edits() {
        let mut history = EditHistory::new("img0");
        for i in 1..=5 {
            history.apply_edit(format!("img{i}"));
        }
        assert_eq!(history.original(), "img0");
        assert_eq!(history.states()[0], "img0");
        assert_eq!(history.cursor(), 5);
        assert_eq!(history.current(), "img5");
    }

    #[test]
    fn test_undo_then_redo_restores_cursor() {
        let mut history = EditHistory::new("img0");
        history.apply_edit("img1");
        history.apply_edit("img2");
        let before = history.clone();

        assert!(history.undo());
        assert!(history.redo());
        assert_eq!(history, before);
    }

    #[test]
    fn test_undo_and_redo_are_guarded_no_ops_at_the_boundaries() {
        let mut history = EditHistory::new("img0");
        assert!(!history.undo());
        assert!(!history.redo());
        assert_eq!(history.cursor(), 0);

        history.apply_edit("img1");
        assert!(!history.redo());
        assert_eq!(history.current(), "img1");
    }

    #[test]
    fn test_edit_after_undo_truncates_forward_states() {
        let mut history = EditHistory::new("A");
        history.apply_edit("B");
        history.apply_edit("C");
        assert_eq!(history.cursor(), 2);

        assert!(history.undo());
        assert_eq!(history.cursor(), 1);

        history.apply_edit("D");
        assert_eq!(history.states(), ["A", "B", "D"]);
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn test_clear_keeps_only_the_original() {
        let mut history = EditHistory::new("img0");
        history.apply_edit("img1");
        history.apply_edit("img2");
        assert!(history.undo());

        history.clear();
        assert_eq!(history.states(), ["img0"]);
        assert_eq!(history.cursor(), 0);
        assert!(!history.has_edits());
    }

    #[test]
    fn test_jump_to_out_of_range_fails_fast() {
        let mut history = EditHistory::new("img0");
        history.apply_edit("img1");

        assert_eq!(
            history.jump_to(2),
            Err(HistoryError::IndexOutOfRange { index: 2, len: 2 })
        );
        // State untouched by the failed jump
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_jump_after_undo_keeps_forward_states() {
        // seed -> edit -> edit -> undo -> jump_to(0)
        let mut history = EditHistory::new("img0");
        history.apply_edit("img1");
        history.apply_edit("img2");
        assert!(history.undo());
        history.jump_to(0).unwrap();

        assert_eq!(history.states(), ["img0", "img1", "img2"]);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.current(), "img0");
    }

    #[test]
    fn test_session_snapshot_roundtrip() {
        let mut history = EditHistory::new("img0");
        history.apply_edit("img1");
        assert!(history.undo());

        let session = history.to_session("prompt_1");
        assert_eq!(session.prompt_id, "prompt_1");
        assert_eq!(session.history_index, 0);

        let restored = EditHistory::from_session(&session).unwrap();
        assert_eq!(restored, history);
    }

    #[test]
    fn test_corrupt_session_snapshot_is_rejected() {
        let session = crate::models::EditingSession {
            prompt_id: "p".to_string(),
            history: vec!["img0".to_string()],
            history_index: 3,
        };
        assert!(EditHistory::from_session(&session).is_err());
    }
}
