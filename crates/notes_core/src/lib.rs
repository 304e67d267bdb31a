//! Core domain logic for the notes application.
//! This crate is the single source of truth for access and slug invariants.

pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;
pub mod slug;
pub mod web;

pub use config::{load_settings, ConfigError, Settings};
pub use form::note_form::{NoteForm, WARNING};
pub use form::{FormData, FormErrors};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId};
pub use model::user::{Identity, User, UserId};
pub use policy::Denial;
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::session_repo::{SessionRepository, SqliteSessionRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::{AuthError, AuthService};
pub use service::note_service::{NoteService, NoteServiceError};
pub use slug::slugify;
pub use web::app::NotesApp;
pub use web::client::{form_data, Client};
pub use web::http::{Method, Page, Request, Response};
pub use web::routes::{reverse, Route};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
