//! # Domain Module
//!
//! Business rules for the book catalogue, independent of HTTP and of the
//! storage engine.
//!
//! ## Module Organization
//!
//! - **models**: `Author`, `Book` and the sort allow-list
//! - **commands**: inputs and results of service operations
//! - **book_service** / **author_service**: validation, uniqueness checks,
//!   partial updates, cascade deletes
//! - **error**: `LibraryError`, the failure taxonomy every operation reports
//!
//! ## Business Rules
//!
//! - A book needs a title and an existing author
//! - isbn (when present) and author name are unique
//! - Updates change only the fields supplied
//! - Deleting an author deletes their books

pub mod author_service;
pub mod book_service;
pub mod commands;
pub mod error;
pub mod models;

pub use author_service::AuthorService;
pub use book_service::BookService;
pub use error::{LibraryError, LibraryResult};
