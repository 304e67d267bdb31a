//! Domain model for notes and the users who own them.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every note has exactly one author, fixed at creation.
//! - Note slugs are unique across all authors.

pub mod note;
pub mod user;
