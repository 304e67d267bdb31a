//! Signup and login forms.
//!
//! Passwords are bound but never serialized into page contexts and never
//! trimmed.

use crate::form::{field, max_length_message, FormData, FormErrors, REQUIRED_MESSAGE};
use crate::model::user::USERNAME_MAX_LENGTH;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

const INVALID_USERNAME_MESSAGE: &str = "Введите правильное имя пользователя. Оно может содержать только буквы, цифры и знаки @/./+/-/_.";
const USERNAME_TAKEN_MESSAGE: &str = "Пользователь с таким именем уже существует.";
const PASSWORD_MISMATCH_MESSAGE: &str = "Введенные пароли не совпадают.";
pub(crate) const INVALID_LOGIN_MESSAGE: &str = "Пожалуйста, введите правильные имя пользователя и пароль. Оба поля могут быть чувствительны к регистру.";

/// Validated signup data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedSignup {
    pub username: String,
    pub password: String,
}

/// Account registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignupForm {
    pub username: String,
    pub errors: FormErrors,
    #[serde(skip)]
    password1: String,
    #[serde(skip)]
    password2: String,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(data: &FormData) -> Self {
        Self {
            username: field(data, "username").to_string(),
            errors: FormErrors::default(),
            password1: raw_field(data, "password1"),
            password2: raw_field(data, "password2"),
        }
    }

    /// Validates the bound data; fills `errors` and returns `Ok(None)` when invalid.
    pub fn clean<R: UserRepository>(&mut self, users: &R) -> RepoResult<Option<CleanedSignup>> {
        self.errors.clear();

        let username_len = self.username.chars().count();
        if self.username.is_empty() {
            self.errors.add("username", REQUIRED_MESSAGE);
        } else if username_len > USERNAME_MAX_LENGTH {
            self.errors.add(
                "username",
                max_length_message(USERNAME_MAX_LENGTH, username_len),
            );
        } else if !USERNAME_RE.is_match(&self.username) {
            self.errors.add("username", INVALID_USERNAME_MESSAGE);
        } else if users.find_by_username(&self.username)?.is_some() {
            self.errors.add("username", USERNAME_TAKEN_MESSAGE);
        }

        if self.password1.is_empty() {
            self.errors.add("password1", REQUIRED_MESSAGE);
        }
        if self.password2.is_empty() {
            self.errors.add("password2", REQUIRED_MESSAGE);
        } else if !self.password1.is_empty() && self.password1 != self.password2 {
            self.errors.add("password2", PASSWORD_MISMATCH_MESSAGE);
        }

        if !self.errors.is_empty() {
            return Ok(None);
        }

        Ok(Some(CleanedSignup {
            username: self.username.clone(),
            password: self.password1.clone(),
        }))
    }

    /// Records a username collision detected after validation.
    pub fn add_username_taken_error(&mut self) {
        self.errors.add("username", USERNAME_TAKEN_MESSAGE);
    }
}

/// Login form. Credential checking lives in the auth service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub errors: FormErrors,
    #[serde(skip)]
    password: String,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(data: &FormData) -> Self {
        Self {
            username: field(data, "username").to_string(),
            errors: FormErrors::default(),
            password: raw_field(data, "password"),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Checks field presence; returns whether credentials can be verified.
    pub fn check_required(&mut self) -> bool {
        self.errors.clear();
        if self.username.is_empty() {
            self.errors.add("username", REQUIRED_MESSAGE);
        }
        if self.password.is_empty() {
            self.errors.add("password", REQUIRED_MESSAGE);
        }
        self.errors.is_empty()
    }
}

fn raw_field(data: &FormData, name: &str) -> String {
    data.get(name).cloned().unwrap_or_default()
}
