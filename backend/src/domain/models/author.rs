use serde::{Deserialize, Serialize};

use super::book::Book;

/// Domain model representing an author row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub city: String,
}

/// An author together with every book they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorWithBooks {
    pub author: Author,
    pub books: Vec<Book>,
}
