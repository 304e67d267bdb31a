//! Authorization policy for note access.
//!
//! # Responsibility
//! - Decide whether the acting identity may reach a private page.
//! - Decide whether an authenticated user may view/edit/delete a note.
//!
//! # Invariants
//! - Anonymous callers are always asked to authenticate first, before any
//!   note lookup happens.
//! - A note owned by someone else is reported exactly like a missing note.

use crate::model::note::Note;
use crate::model::user::{Identity, User};
use std::fmt::{Display, Formatter};

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Caller is anonymous; redirect to login and come back.
    AuthenticationRequired,
    /// Note is missing or belongs to another author.
    NotFound,
}

impl Display for Denial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationRequired => write!(f, "authentication required"),
            Self::NotFound => write!(f, "not found"),
        }
    }
}

impl std::error::Error for Denial {}

/// Requires an authenticated identity.
pub fn require_user(identity: &Identity) -> Result<&User, Denial> {
    identity.user().ok_or(Denial::AuthenticationRequired)
}

/// Grants access to `note` only when `user` is its author.
pub fn authorize_note(user: &User, note: Option<Note>) -> Result<Note, Denial> {
    match note {
        Some(note) if note.is_authored_by(user.id) => Ok(note),
        _ => Err(Denial::NotFound),
    }
}
