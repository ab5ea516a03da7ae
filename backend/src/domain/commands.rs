//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs defined in the
//! `shared` crate and the query strings it receives to these internal types.

pub mod books {
    use crate::domain::models::{Book, BookSortField, SortOrder};

    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PER_PAGE: u32 = 5;

    /// Input for creating a book. Required fields are optional here so the
    /// service can report which one is missing.
    #[derive(Debug, Clone, Default)]
    pub struct CreateBookCommand {
        pub title: Option<String>,
        pub year: Option<i32>,
        pub isbn: Option<String>,
        pub author_id: Option<i64>,
    }

    /// Partial update; `None` leaves a field untouched.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateBookCommand {
        pub title: Option<String>,
        pub year: Option<Option<i32>>,
        pub isbn: Option<Option<String>>,
        pub author_id: Option<i64>,
    }

    /// Filters for book search, combined with AND.
    #[derive(Debug, Clone, Default)]
    pub struct BookSearchQuery {
        pub title: Option<String>,
        pub author: Option<String>,
        pub year: Option<i32>,
    }

    #[derive(Debug, Clone, Copy)]
    pub struct BookPageQuery {
        pub page: u32,
        pub per_page: u32,
    }

    impl Default for BookPageQuery {
        fn default() -> Self {
            Self {
                page: DEFAULT_PAGE,
                per_page: DEFAULT_PER_PAGE,
            }
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct BookSortQuery {
        pub field: BookSortField,
        pub order: SortOrder,
    }

    /// One page of books plus the totals needed to navigate the rest.
    #[derive(Debug, Clone)]
    pub struct BookPage {
        pub books: Vec<Book>,
        pub page: u32,
        pub per_page: u32,
        pub total_items: u64,
        pub total_pages: u64,
    }
}

pub mod authors {
    #[derive(Debug, Clone, Default)]
    pub struct CreateAuthorCommand {
        pub name: Option<String>,
        pub city: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateAuthorCommand {
        pub name: Option<String>,
        pub city: Option<String>,
    }

    /// `title` matches authors owning at least one book with that title fragment.
    #[derive(Debug, Clone, Default)]
    pub struct AuthorSearchQuery {
        pub name: Option<String>,
        pub city: Option<String>,
        pub title: Option<String>,
    }
}
