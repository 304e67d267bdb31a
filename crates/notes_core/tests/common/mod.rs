#![allow(dead_code)]

use notes_core::db::open_db_in_memory;
use notes_core::model::note::NewNote;
use notes_core::{Note, NoteRepository, NotesApp, SqliteNoteRepository, User};

/// bcrypt minimum cost keeps password tests fast.
pub const TEST_HASH_COST: u32 = 4;

pub fn app() -> NotesApp {
    NotesApp::new(open_db_in_memory().unwrap(), TEST_HASH_COST)
}

/// Creates a user without a password, like a direct model insert.
pub fn user(app: &NotesApp, username: &str) -> User {
    app.auth().unwrap().create_user(username, None).unwrap()
}

pub fn user_with_password(app: &NotesApp, username: &str, password: &str) -> User {
    app.auth()
        .unwrap()
        .create_user(username, Some(password))
        .unwrap()
}

/// Inserts a note directly, bypassing forms and access rules.
pub fn note(app: &NotesApp, author: &User, title: &str, text: &str, slug: &str) -> Note {
    let repo = SqliteNoteRepository::try_new(app.connection()).unwrap();
    repo.create_note(&NewNote {
        title: title.to_string(),
        text: text.to_string(),
        slug: slug.to_string(),
        author_id: author.id,
    })
    .unwrap()
}

pub fn notes_count(app: &NotesApp) -> u64 {
    app.notes().unwrap().count_notes().unwrap()
}

pub fn note_by_slug(app: &NotesApp, slug: &str) -> Option<Note> {
    let repo = SqliteNoteRepository::try_new(app.connection()).unwrap();
    repo.get_note_by_slug(slug).unwrap()
}
