//! Request-handling surface: named routes, dispatch and an in-process client.
//!
//! # Responsibility
//! - Turn a `Request` into a `Response` following the access rules.
//! - Stay transport-agnostic; no sockets, no templates.

pub mod app;
pub mod client;
pub mod http;
pub mod routes;
