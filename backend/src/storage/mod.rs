//! # Storage Module
//!
//! Persistence for authors and books on SQLite through SQLx.
//!
//! - **connection.rs** - pool construction and schema setup
//! - **repositories/** - one repository per table, returning domain models
//!
//! Repositories are plain structs over a cloned `DbConnection`; services own
//! the repositories they need, so every piece can be built against a fresh
//! in-memory database in tests.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{AuthorRepository, BookRepository};
