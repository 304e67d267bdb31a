//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide note CRUD over the `notes` table.
//! - Own the slug uniqueness check that guards every write.
//!
//! # Invariants
//! - Create/update check slug uniqueness inside the same immediate
//!   transaction as the write; a failed check persists nothing.
//! - `update_note` never touches `author_id`.
//! - Author-scoped listing is ordered by `id ASC`.

use crate::model::note::{NewNote, Note, NoteChanges, NoteId};
use crate::model::user::UserId;
use crate::repo::{ensure_tables, is_unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    text,
    slug,
    author_id
FROM notes";

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Inserts a note and returns the persisted record.
    fn create_note(&self, note: &NewNote) -> RepoResult<Note>;
    /// Replaces title, text and slug of an existing note.
    fn update_note(&self, id: NoteId, changes: &NoteChanges) -> RepoResult<Note>;
    /// Hard-deletes one note.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    /// Gets one note by row id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Gets one note by slug, regardless of author.
    fn get_note_by_slug(&self, slug: &str) -> RepoResult<Option<Note>>;
    /// Lists every note owned by `author_id`.
    fn list_notes_by_author(&self, author_id: UserId) -> RepoResult<Vec<Note>>;
    /// Returns whether `slug` is used by any note other than `exclude`.
    fn slug_exists(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool>;
    /// Returns the total number of notes across all authors.
    fn count_notes(&self) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "notes"])?;
        Ok(Self { conn })
    }

    fn begin_write(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &NewNote) -> RepoResult<Note> {
        let tx = self.begin_write()?;
        if slug_exists_in(&tx, note.slug.as_str(), None)? {
            return Err(RepoError::SlugTaken(note.slug.clone()));
        }

        tx.execute(
            "INSERT INTO notes (title, text, slug, author_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                note.title.as_str(),
                note.text.as_str(),
                note.slug.as_str(),
                note.author_id,
            ],
        )
        .map_err(|err| map_slug_violation(err, note.slug.as_str()))?;

        let id = tx.last_insert_rowid();
        let created = get_note_in(&tx, id)?.ok_or(RepoError::NoteNotFound(id))?;
        tx.commit()?;
        Ok(created)
    }

    fn update_note(&self, id: NoteId, changes: &NoteChanges) -> RepoResult<Note> {
        let tx = self.begin_write()?;
        if slug_exists_in(&tx, changes.slug.as_str(), Some(id))? {
            return Err(RepoError::SlugTaken(changes.slug.clone()));
        }

        let changed = tx
            .execute(
                "UPDATE notes
                 SET
                    title = ?2,
                    text = ?3,
                    slug = ?4,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![
                    id,
                    changes.title.as_str(),
                    changes.text.as_str(),
                    changes.slug.as_str(),
                ],
            )
            .map_err(|err| map_slug_violation(err, changes.slug.as_str()))?;

        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }

        let updated = get_note_in(&tx, id)?.ok_or(RepoError::NoteNotFound(id))?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        get_note_in(self.conn, id)
    }

    fn get_note_by_slug(&self, slug: &str) -> RepoResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE slug = ?1;"),
                [slug],
                parse_note_row,
            )
            .optional()?;
        Ok(note)
    }

    fn list_notes_by_author(&self, author_id: UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE author_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([author_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn slug_exists(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool> {
        slug_exists_in(self.conn, slug, exclude)
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

fn get_note_in(conn: &Connection, id: NoteId) -> RepoResult<Option<Note>> {
    let note = conn
        .query_row(
            &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_note_row,
        )
        .optional()?;
    Ok(note)
}

fn slug_exists_in(conn: &Connection, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM notes
            WHERE slug = ?1
              AND (?2 IS NULL OR id != ?2)
        );",
        params![slug, exclude],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn map_slug_violation(err: rusqlite::Error, slug: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::SlugTaken(slug.to_string())
    } else {
        err.into()
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        slug: row.get("slug")?,
        author_id: row.get("author_id")?,
    })
}
