//! Runtime support for generated clients.
//!
//! Generated code stays thin: each method fills a
//! [`RequestTemplate`] from its typed parameter groups and delegates the
//! exchange to [`Client`]. Everything behavioral — base-URL joining,
//! default-header precedence, query serialization styles, the
//! success-set check, and the error taxonomy — lives here where it can be
//! tested against a real HTTP server without compiling generated code.

mod client;
mod error;

pub use client::{Client, RequestTemplate};
pub use error::{ApiError, Error};
