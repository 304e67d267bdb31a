//! User identity model.
//!
//! Users are opaque principals beyond their username; the only relation the
//! core cares about is "is the author of note X".

use serde::{Deserialize, Serialize};

/// Row id of a persisted user.
pub type UserId = i64;

/// Maximum number of characters in a username.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Persisted user record. The password hash never leaves the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// Acting principal of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(User),
}

impl Identity {
    /// Returns the authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }
}
