//! Core of a deep-link demo application: a single-table SQLite user store,
//! an observable list feed, and a typed deep-link resolver.
//!
//! The rendering layer is intentionally absent. `DirectoryService` is the
//! seam a UI would sit on top of: it observes the user list, resolves
//! incoming link URIs into screen destinations, and dispatches writes to a
//! background context.

pub mod config;
pub mod db;
pub mod error;
pub mod links;
pub mod models;
pub mod platform;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::User;
