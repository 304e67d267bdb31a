//! Login session storage.
//!
//! # Invariants
//! - Tokens are random UUID v4 strings and map to exactly one user.
//! - Deleting a user removes their sessions (FK cascade).

use crate::model::user::{User, UserId};
use crate::repo::{ensure_tables, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Repository interface for session operations.
pub trait SessionRepository {
    /// Creates a session for `user_id` and returns its token.
    fn create_session(&self, user_id: UserId) -> RepoResult<String>;
    /// Resolves a token to its user, if the session is still alive.
    fn session_user(&self, token: &str) -> RepoResult<Option<User>>;
    /// Deletes a session. Returns whether a session was removed.
    fn delete_session(&self, token: &str) -> RepoResult<bool>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "sessions"])?;
        Ok(Self { conn })
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn create_session(&self, user_id: UserId) -> RepoResult<String> {
        let token = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO sessions (token, user_id) VALUES (?1, ?2);",
            params![token.as_str(), user_id],
        )?;
        Ok(token)
    }

    fn session_user(&self, token: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT u.id, u.username
                 FROM sessions s
                 INNER JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1;",
                [token],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn delete_session(&self, token: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?1;", [token])?;
        Ok(changed > 0)
    }
}
