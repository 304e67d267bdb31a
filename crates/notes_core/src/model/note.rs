//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its write shapes.
//! - Hold the field limits shared by form validation and storage.
//!
//! # Invariants
//! - `author_id` is set once by `NewNote` and never reassigned by `NoteChanges`.
//! - `slug` is URL-safe and unique across all notes.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Row id of a persisted note.
pub type NoteId = i64;

/// Maximum number of characters in a note title.
pub const TITLE_MAX_LENGTH: usize = 100;
/// Maximum number of characters in a note slug.
pub const SLUG_MAX_LENGTH: usize = 100;

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    /// Unique, URL-safe identifier used in note-scoped routes.
    pub slug: String,
    /// Owner of the note. Only the author may view, edit or delete it.
    pub author_id: UserId,
}

impl Note {
    /// Returns whether `user_id` owns this note.
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}

/// Write shape for note creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: UserId,
}

/// Write shape for note edits. Carries no author field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: String,
    pub text: String,
    pub slug: String,
}
