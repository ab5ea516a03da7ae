pub mod author;
pub mod book;

pub use author::{Author, AuthorWithBooks};
pub use book::{AuthorRef, Book, BookSortField, NewBook, SortOrder};
