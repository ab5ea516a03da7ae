//! # REST API Interface Layer
//!
//! - **book_apis** / **author_apis**: `/api/books` and `/api/authors` routers
//! - **docs_apis**: the HTML endpoint overview served at `/`
//! - **extract**: path-id and JSON-body extractors that reject with `LibraryError`
//! - **error**: `LibraryError` → `{success: false, error}` responses
//! - **mappers**: domain models → `shared` DTOs

pub mod author_apis;
pub mod book_apis;
pub mod docs_apis;
pub mod error;
pub mod extract;
pub mod mappers;
