//! Authentication use-case service.
//!
//! # Responsibility
//! - Register users with bcrypt-hashed passwords.
//! - Verify credentials and issue/destroy login sessions.
//! - Resolve a session token into the acting `Identity`.
//!
//! # Invariants
//! - Plain passwords are never persisted or logged.
//! - Unknown, logged-out or missing tokens resolve to `Identity::Anonymous`.
//! - Sessions live until logout or until their user is deleted.

use crate::form::auth_form::{LoginForm, SignupForm, INVALID_LOGIN_MESSAGE};
use crate::form::NON_FIELD_ERRORS;
use crate::model::user::{Identity, User, UserId};
use crate::repo::session_repo::SessionRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for authentication use-cases.
#[derive(Debug)]
pub enum AuthError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Password hashing backend failure.
    Hash(bcrypt::BcryptError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Hash(err) => write!(f, "password hashing failed: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Hash(err) => Some(err),
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::Hash(value)
    }
}

/// Successful login: the user and the new session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub user: User,
    pub token: String,
}

/// Authentication service over user and session repositories.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    users: U,
    sessions: S,
    hash_cost: u32,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    /// Creates a service; `hash_cost` is the bcrypt work factor.
    pub fn new(users: U, sessions: S, hash_cost: u32) -> Self {
        Self {
            users,
            sessions,
            hash_cost,
        }
    }

    /// Creates a user directly, bypassing form validation.
    ///
    /// Users created without a password cannot log in.
    pub fn create_user(&self, username: &str, password: Option<&str>) -> Result<User, AuthError> {
        let password_hash = match password {
            Some(password) => Some(bcrypt::hash(password, self.hash_cost)?),
            None => None,
        };
        let user = self.users.create_user(username, password_hash.as_deref())?;
        info!(
            "event=user_create module=auth status=ok user_id={} has_password={}",
            user.id,
            password.is_some()
        );
        Ok(user)
    }

    /// Validates `form` and registers the user.
    ///
    /// Returns `Ok(None)` when the form is invalid; errors are left on `form`.
    pub fn signup(&self, form: &mut SignupForm) -> Result<Option<User>, AuthError> {
        let Some(cleaned) = form.clean(&self.users)? else {
            warn!("event=signup module=auth status=rejected reason=invalid_form");
            return Ok(None);
        };

        match self.create_user(&cleaned.username, Some(cleaned.password.as_str())) {
            Ok(user) => Ok(Some(user)),
            Err(AuthError::Repo(RepoError::UsernameTaken(_))) => {
                form.add_username_taken_error();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Verifies credentials and opens a session.
    ///
    /// Returns `Ok(None)` on bad credentials; the error is left on `form`.
    pub fn login(&self, form: &mut LoginForm) -> Result<Option<LoginSession>, AuthError> {
        if !form.check_required() {
            return Ok(None);
        }

        let verified = match self.users.find_credentials(&form.username)? {
            Some(credentials) => match credentials.password_hash.as_deref() {
                Some(hash) => match bcrypt::verify(form.password(), hash) {
                    Ok(true) => Some(credentials.user),
                    Ok(false) => None,
                    Err(err) => {
                        warn!(
                            "event=login module=auth status=error user_id={} error_code=bad_hash error={}",
                            credentials.user.id, err
                        );
                        None
                    }
                },
                None => None,
            },
            None => None,
        };

        let Some(user) = verified else {
            warn!("event=login module=auth status=rejected reason=bad_credentials");
            form.errors.add(NON_FIELD_ERRORS, INVALID_LOGIN_MESSAGE);
            return Ok(None);
        };

        let token = self.sessions.create_session(user.id)?;
        info!("event=login module=auth status=ok user_id={}", user.id);
        Ok(Some(LoginSession { user, token }))
    }

    /// Opens a session for `user_id` without checking a password.
    pub fn force_login(&self, user_id: UserId) -> Result<String, AuthError> {
        if self.users.get_user(user_id)?.is_none() {
            return Err(RepoError::UserNotFound(user_id).into());
        }
        Ok(self.sessions.create_session(user_id)?)
    }

    /// Destroys the session behind `token`. Returns whether one existed.
    pub fn logout(&self, token: &str) -> Result<bool, AuthError> {
        let removed = self.sessions.delete_session(token)?;
        if removed {
            info!("event=logout module=auth status=ok");
        }
        Ok(removed)
    }

    /// Resolves the acting identity of a request.
    pub fn identify(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let Some(token) = token else {
            return Ok(Identity::Anonymous);
        };
        Ok(match self.sessions.session_user(token)? {
            Some(user) => Identity::User(user),
            None => Identity::Anonymous,
        })
    }
}
