//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, form and policy calls into use-case level APIs.
//! - Keep the request surface decoupled from storage details.

pub mod auth_service;
pub mod note_service;
