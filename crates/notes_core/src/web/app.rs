//! Request dispatch for the notes application.
//!
//! # Responsibility
//! - Resolve the route, identify the caller, run the matching handler.
//! - Map the error taxonomy onto responses in one place.
//!
//! # Invariants
//! - Anonymous callers on private routes are redirected to login with
//!   `next=<full path>` before any note lookup.
//! - Foreign notes answer `NotFound`, never a distinct forbidden status.
//! - Storage failures answer `ServerError` and are logged, never panicked on.

use crate::config::Settings;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::form::auth_form::{LoginForm, SignupForm};
use crate::form::note_form::NoteForm;
use crate::model::user::{Identity, User};
use crate::policy::{require_user, Denial};
use crate::repo::note_repo::SqliteNoteRepository;
use crate::repo::session_repo::SqliteSessionRepository;
use crate::repo::user_repo::SqliteUserRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::auth_service::{AuthError, AuthService};
use crate::service::note_service::{NoteService, NoteServiceError};
use crate::web::http::{Method, Page, Request, Response};
use crate::web::routes::{is_safe_redirect, login_redirect, query_param, Route};
use log::{debug, error};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};

pub type SqliteAuthService<'conn> =
    AuthService<SqliteUserRepository<'conn>, SqliteSessionRepository<'conn>>;
pub type SqliteNoteService<'conn> = NoteService<SqliteNoteRepository<'conn>>;

#[derive(Debug)]
enum HandlerError {
    Denied(Denial),
    Repo(RepoError),
    Auth(AuthError),
}

impl Display for HandlerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Denied(denial) => write!(f, "{denial}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
        }
    }
}

impl From<Denial> for HandlerError {
    fn from(value: Denial) -> Self {
        Self::Denied(value)
    }
}

impl From<RepoError> for HandlerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<AuthError> for HandlerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<NoteServiceError> for HandlerError {
    fn from(value: NoteServiceError) -> Self {
        match value {
            NoteServiceError::NotFound(_) => Self::Denied(Denial::NotFound),
            NoteServiceError::Repo(err) => Self::Repo(err),
        }
    }
}

type HandlerResult = Result<Response, HandlerError>;

/// The notes application over one SQLite connection.
pub struct NotesApp {
    conn: Connection,
    hash_cost: u32,
}

impl NotesApp {
    /// Wraps a migrated connection. `hash_cost` is the bcrypt work factor.
    pub fn new(conn: Connection, hash_cost: u32) -> Self {
        Self { conn, hash_cost }
    }

    /// Opens the database named by `settings` (in-memory when unset).
    pub fn open(settings: &Settings) -> DbResult<Self> {
        let conn = match settings.database_path.as_ref() {
            Some(path) => open_db(path)?,
            None => open_db_in_memory()?,
        };
        Ok(Self::new(conn, settings.password_hash_cost))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn auth(&self) -> RepoResult<SqliteAuthService<'_>> {
        Ok(AuthService::new(
            SqliteUserRepository::try_new(&self.conn)?,
            SqliteSessionRepository::try_new(&self.conn)?,
            self.hash_cost,
        ))
    }

    pub fn notes(&self) -> RepoResult<SqliteNoteService<'_>> {
        Ok(NoteService::new(SqliteNoteRepository::try_new(&self.conn)?))
    }

    /// Handles one request. Never panics on storage failures.
    pub fn handle(&self, request: &Request) -> Response {
        let response = match self.dispatch(request) {
            Ok(response) => response,
            Err(HandlerError::Denied(Denial::AuthenticationRequired)) => {
                Response::redirect(login_redirect(&request.path))
            }
            Err(HandlerError::Denied(Denial::NotFound)) => Response::NotFound,
            Err(err) => {
                error!(
                    "event=request module=web status=error method={} error={}",
                    request.method, err
                );
                Response::ServerError
            }
        };
        debug!(
            "event=request module=web status=done method={} status_code={}",
            request.method,
            response.status()
        );
        response
    }

    fn dispatch(&self, request: &Request) -> HandlerResult {
        let Some(route) = Route::resolve(&request.path) else {
            return Ok(Response::NotFound);
        };

        let identity = self.auth()?.identify(request.session.as_deref())?;
        if route.is_private() {
            require_user(&identity)?;
        }

        match route {
            Route::Home => self.home(request),
            Route::Login => self.login(request),
            Route::Logout => self.logout(request),
            Route::Signup => self.signup(request),
            Route::List => self.list(request, authenticated(&identity)?),
            Route::Add => self.add(request, authenticated(&identity)?),
            Route::Success => self.success(request),
            Route::Detail(slug) => self.detail(request, authenticated(&identity)?, &slug),
            Route::Edit(slug) => self.edit(request, authenticated(&identity)?, &slug),
            Route::Delete(slug) => self.delete(request, authenticated(&identity)?, &slug),
        }
    }

    fn home(&self, request: &Request) -> HandlerResult {
        if !request.method.is_safe() {
            return Ok(Response::MethodNotAllowed);
        }
        Ok(Response::Ok(Page::Home))
    }

    fn login(&self, request: &Request) -> HandlerResult {
        let next = query_param(&request.path, "next")
            .or_else(|| request.form.get("next").cloned())
            .filter(|target| is_safe_redirect(target));

        match request.method {
            Method::Get | Method::Head => Ok(Response::Ok(Page::Login {
                form: LoginForm::new(),
                next,
            })),
            Method::Post => {
                let mut form = LoginForm::bind(&request.form);
                match self.auth()?.login(&mut form)? {
                    Some(session) => Ok(Response::Redirect {
                        location: next.unwrap_or_else(|| Route::Home.path()),
                        session: Some(session.token),
                    }),
                    None => Ok(Response::Ok(Page::Login { form, next })),
                }
            }
            _ => Ok(Response::MethodNotAllowed),
        }
    }

    fn logout(&self, request: &Request) -> HandlerResult {
        if !matches!(request.method, Method::Get | Method::Head | Method::Post) {
            return Ok(Response::MethodNotAllowed);
        }
        if let Some(token) = request.session.as_deref() {
            self.auth()?.logout(token)?;
        }
        Ok(Response::Ok(Page::LoggedOut))
    }

    fn signup(&self, request: &Request) -> HandlerResult {
        match request.method {
            Method::Get | Method::Head => Ok(Response::Ok(Page::Signup {
                form: SignupForm::new(),
            })),
            Method::Post => {
                let mut form = SignupForm::bind(&request.form);
                match self.auth()?.signup(&mut form)? {
                    Some(_) => Ok(Response::redirect(Route::Login.path())),
                    None => Ok(Response::Ok(Page::Signup { form })),
                }
            }
            _ => Ok(Response::MethodNotAllowed),
        }
    }

    fn list(&self, request: &Request, user: &User) -> HandlerResult {
        if !request.method.is_safe() {
            return Ok(Response::MethodNotAllowed);
        }
        let object_list = self.notes()?.list_notes(user)?;
        Ok(Response::Ok(Page::NoteList { object_list }))
    }

    fn add(&self, request: &Request, user: &User) -> HandlerResult {
        match request.method {
            Method::Get | Method::Head => Ok(Response::Ok(Page::NoteForm {
                form: NoteForm::new(),
            })),
            Method::Post => {
                let mut form = NoteForm::bind(&request.form);
                match self.notes()?.create_note(user, &mut form)? {
                    Some(_) => Ok(Response::redirect(Route::Success.path())),
                    None => Ok(Response::Ok(Page::NoteForm { form })),
                }
            }
            _ => Ok(Response::MethodNotAllowed),
        }
    }

    fn success(&self, request: &Request) -> HandlerResult {
        if !request.method.is_safe() {
            return Ok(Response::MethodNotAllowed);
        }
        Ok(Response::Ok(Page::Success))
    }

    fn detail(&self, request: &Request, user: &User, slug: &str) -> HandlerResult {
        let note = self.notes()?.get_note(user, slug)?;
        if !request.method.is_safe() {
            return Ok(Response::MethodNotAllowed);
        }
        Ok(Response::Ok(Page::NoteDetail { note }))
    }

    fn edit(&self, request: &Request, user: &User, slug: &str) -> HandlerResult {
        let notes = self.notes()?;
        match request.method {
            Method::Get | Method::Head => {
                let note = notes.get_note(user, slug)?;
                Ok(Response::Ok(Page::NoteForm {
                    form: NoteForm::for_note(&note),
                }))
            }
            Method::Post => {
                let mut form = NoteForm::bind(&request.form);
                match notes.update_note(user, slug, &mut form)? {
                    Some(_) => Ok(Response::redirect(Route::Success.path())),
                    None => Ok(Response::Ok(Page::NoteForm { form })),
                }
            }
            _ => {
                notes.get_note(user, slug)?;
                Ok(Response::MethodNotAllowed)
            }
        }
    }

    fn delete(&self, request: &Request, user: &User, slug: &str) -> HandlerResult {
        let notes = self.notes()?;
        match request.method {
            Method::Get | Method::Head => {
                let note = notes.get_note(user, slug)?;
                Ok(Response::Ok(Page::NoteDelete { note }))
            }
            Method::Post => {
                notes.delete_note(user, slug)?;
                Ok(Response::redirect(Route::Success.path()))
            }
            _ => {
                notes.get_note(user, slug)?;
                Ok(Response::MethodNotAllowed)
            }
        }
    }
}

fn authenticated(identity: &Identity) -> Result<&User, HandlerError> {
    Ok(require_user(identity)?)
}
