use thiserror::Error;

/// Failure of a library operation, independent of the transport.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Missing or malformed input; nothing was written
    #[error("{0}")]
    Validation(String),
    /// The addressed record, or a record it references, does not exist
    #[error("{0}")]
    NotFound(String),
    /// A unique field (author name, isbn) is already taken
    #[error("{0}")]
    Conflict(String),
    #[error("Storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type LibraryResult<T> = Result<T, LibraryError>;

impl LibraryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn book_not_found() -> Self {
        Self::NotFound("Book not found".to_string())
    }

    pub fn author_not_found() -> Self {
        Self::NotFound("Author not found".to_string())
    }

    pub fn duplicate_isbn() -> Self {
        Self::Conflict("ISBN already exists".to_string())
    }

    pub fn duplicate_author() -> Self {
        Self::Conflict("Author already exists".to_string())
    }

    /// Translate a failed write. Constraint violations that slipped past the
    /// pre-checks (concurrent writers) become the same errors the pre-checks
    /// would have produced.
    pub fn from_write(err: anyhow::Error, on_unique: fn() -> Self) -> Self {
        if let Some(sqlx::Error::Database(db_err)) = err.downcast_ref::<sqlx::Error>() {
            if db_err.is_unique_violation() {
                return on_unique();
            }
            if db_err.is_foreign_key_violation() {
                return Self::author_not_found();
            }
        }
        Self::Storage(err)
    }
}
