//! Note use-case service.
//!
//! # Responsibility
//! - Provide author-scoped list/get/create/update/delete APIs.
//! - Run form validation and the authorization policy before any write.
//!
//! # Invariants
//! - Author is taken from the acting user on create and never changed later.
//! - A note that is missing or foreign yields `NoteServiceError::NotFound`.
//! - Invalid forms persist nothing; their errors stay on the form.

use crate::form::note_form::NoteForm;
use crate::model::note::{NewNote, Note, NoteChanges};
use crate::model::user::User;
use crate::policy::authorize_note;
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Note does not exist or is not owned by the acting user.
    NotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(slug) => write!(f, "note not found: `{slug}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists exactly the notes authored by `user`.
    pub fn list_notes(&self, user: &User) -> RepoResult<Vec<Note>> {
        self.repo.list_notes_by_author(user.id)
    }

    /// Gets one note by slug if `user` is its author.
    pub fn get_note(&self, user: &User, slug: &str) -> Result<Note, NoteServiceError> {
        let found = self.repo.get_note_by_slug(slug)?;
        authorize_note(user, found).map_err(|_| NoteServiceError::NotFound(slug.to_string()))
    }

    /// Validates `form` and creates a note authored by `user`.
    ///
    /// Returns `Ok(None)` when the form is invalid; errors are left on `form`.
    pub fn create_note(
        &self,
        user: &User,
        form: &mut NoteForm,
    ) -> Result<Option<Note>, NoteServiceError> {
        let Some(cleaned) = form.clean(&self.repo)? else {
            warn!(
                "event=note_create module=service status=rejected author_id={} reason=invalid_form",
                user.id
            );
            return Ok(None);
        };

        let new_note = NewNote {
            title: cleaned.title,
            text: cleaned.text,
            slug: cleaned.slug,
            author_id: user.id,
        };
        match self.repo.create_note(&new_note) {
            Ok(note) => {
                info!(
                    "event=note_create module=service status=ok note_id={} author_id={}",
                    note.id, user.id
                );
                Ok(Some(note))
            }
            Err(RepoError::SlugTaken(slug)) => {
                warn!(
                    "event=note_create module=service status=rejected author_id={} reason=slug_taken",
                    user.id
                );
                form.add_slug_taken_error(&slug);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Validates `form` and applies it to the note `slug` owned by `user`.
    ///
    /// Returns `Ok(None)` when the form is invalid; errors are left on `form`.
    pub fn update_note(
        &self,
        user: &User,
        slug: &str,
        form: &mut NoteForm,
    ) -> Result<Option<Note>, NoteServiceError> {
        let note = self.get_note(user, slug)?;
        form.set_instance(note.id);
        let Some(cleaned) = form.clean(&self.repo)? else {
            warn!(
                "event=note_update module=service status=rejected note_id={} reason=invalid_form",
                note.id
            );
            return Ok(None);
        };

        let changes = NoteChanges {
            title: cleaned.title,
            text: cleaned.text,
            slug: cleaned.slug,
        };
        match self.repo.update_note(note.id, &changes) {
            Ok(updated) => {
                info!(
                    "event=note_update module=service status=ok note_id={}",
                    updated.id
                );
                Ok(Some(updated))
            }
            Err(RepoError::SlugTaken(taken)) => {
                form.add_slug_taken_error(&taken);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes the note `slug` owned by `user`.
    pub fn delete_note(&self, user: &User, slug: &str) -> Result<Note, NoteServiceError> {
        let note = self.get_note(user, slug)?;
        self.repo.delete_note(note.id)?;
        info!(
            "event=note_delete module=service status=ok note_id={}",
            note.id
        );
        Ok(note)
    }

    /// Returns the total number of notes across all authors.
    pub fn count_notes(&self) -> RepoResult<u64> {
        self.repo.count_notes()
    }
}
