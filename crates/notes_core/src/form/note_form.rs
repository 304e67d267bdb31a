//! Note add/edit form.
//!
//! # Responsibility
//! - Bind `title`, `text` and `slug` fields.
//! - Derive a slug from the title when none is supplied.
//! - Reject slugs already used by another note.
//!
//! # Invariants
//! - A duplicate slug yields exactly `[<slug> + WARNING]` on the `slug` field.
//! - Uniqueness ignores the note being edited (`instance`).

use crate::form::{field, max_length_message, FormData, FormErrors, REQUIRED_MESSAGE};
use crate::model::note::{Note, NoteId, SLUG_MAX_LENGTH, TITLE_MAX_LENGTH};
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoResult;
use crate::slug::{derive_slug, is_valid_slug};
use serde::Serialize;

/// Suffix appended to a duplicate slug in the `slug` field error.
pub const WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";

const INVALID_SLUG_MESSAGE: &str =
    "Значение должно состоять только из латинских букв, цифр, знаков подчеркивания или дефиса.";
const UNDERIVABLE_SLUG_MESSAGE: &str =
    "Не удалось сформировать slug из заголовка, укажите его вручную.";

/// Validated note fields ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedNote {
    pub title: String,
    pub text: String,
    pub slug: String,
}

/// Bound (or initial) note form as shown on the add and edit pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub errors: FormErrors,
    /// Note being edited; `None` on the add page.
    #[serde(skip)]
    instance: Option<NoteId>,
}

impl NoteForm {
    /// Empty form for the add page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form prefilled from an existing note for the edit page.
    pub fn for_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
            errors: FormErrors::default(),
            instance: Some(note.id),
        }
    }

    /// Binds submitted data.
    pub fn bind(data: &FormData) -> Self {
        Self {
            title: field(data, "title").to_string(),
            text: field(data, "text").to_string(),
            slug: field(data, "slug").to_string(),
            errors: FormErrors::default(),
            instance: None,
        }
    }

    pub fn instance(&self) -> Option<NoteId> {
        self.instance
    }

    /// Marks the form as editing `id`, so its own slug is not a duplicate.
    pub fn set_instance(&mut self, id: NoteId) {
        self.instance = Some(id);
    }

    /// Validates the bound data.
    ///
    /// Returns `Ok(None)` and fills `errors` when the data is invalid.
    /// Repository failures are returned as `Err`.
    pub fn clean<R: NoteRepository>(&mut self, repo: &R) -> RepoResult<Option<CleanedNote>> {
        self.errors.clear();

        let title_len = self.title.chars().count();
        if self.title.is_empty() {
            self.errors.add("title", REQUIRED_MESSAGE);
        } else if title_len > TITLE_MAX_LENGTH {
            self.errors
                .add("title", max_length_message(TITLE_MAX_LENGTH, title_len));
        }

        if self.text.is_empty() {
            self.errors.add("text", REQUIRED_MESSAGE);
        }

        let slug_len = self.slug.chars().count();
        if slug_len > SLUG_MAX_LENGTH {
            self.errors
                .add("slug", max_length_message(SLUG_MAX_LENGTH, slug_len));
        } else if !self.slug.is_empty() && !is_valid_slug(&self.slug) {
            self.errors.add("slug", INVALID_SLUG_MESSAGE);
        }

        if !self.errors.is_empty() {
            return Ok(None);
        }

        let slug = if self.slug.is_empty() {
            derive_slug(&self.title)
        } else {
            self.slug.clone()
        };
        if slug.is_empty() {
            self.errors.add("slug", UNDERIVABLE_SLUG_MESSAGE);
            return Ok(None);
        }

        if repo.slug_exists(&slug, self.instance)? {
            self.add_slug_taken_error(&slug);
            return Ok(None);
        }

        Ok(Some(CleanedNote {
            title: self.title.clone(),
            text: self.text.clone(),
            slug,
        }))
    }

    /// Records the duplicate-slug error for `slug`.
    pub fn add_slug_taken_error(&mut self, slug: &str) {
        self.errors.add("slug", format!("{slug}{WARNING}"));
    }
}
