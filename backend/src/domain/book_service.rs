use chrono::Utc;
use tracing::{info, warn};

use crate::domain::commands::books::{
    BookPage, BookPageQuery, BookSearchQuery, BookSortQuery, CreateBookCommand,
    UpdateBookCommand, DEFAULT_PER_PAGE,
};
use crate::domain::error::{LibraryError, LibraryResult};
use crate::domain::models::{AuthorRef, Book, NewBook};
use crate::storage::{AuthorRepository, BookRepository, DbConnection};

/// Service for creating, querying and modifying books
#[derive(Clone)]
pub struct BookService {
    books: BookRepository,
    authors: AuthorRepository,
}

impl BookService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            books: BookRepository::new(db.clone()),
            authors: AuthorRepository::new(db),
        }
    }

    /// List every book ordered by id
    pub async fn list_books(&self) -> LibraryResult<Vec<Book>> {
        let books = self.books.list_books().await?;
        info!("Found {} books", books.len());
        Ok(books)
    }

    /// Get a book by ID
    pub async fn get_book(&self, book_id: i64) -> LibraryResult<Book> {
        match self.books.get_book(book_id).await? {
            Some(book) => Ok(book),
            None => {
                warn!("Book not found: {}", book_id);
                Err(LibraryError::book_not_found())
            }
        }
    }

    /// Create a new book owned by an existing author
    pub async fn create_book(&self, command: CreateBookCommand) -> LibraryResult<Book> {
        let title = required_title(command.title.as_deref())?;
        let author_id = command
            .author_id
            .ok_or_else(|| LibraryError::validation("Author id required"))?;

        if self.authors.get_author(author_id).await?.is_none() {
            warn!("Cannot create book, author {} does not exist", author_id);
            return Err(LibraryError::author_not_found());
        }

        let isbn = normalize_isbn(command.isbn);
        if let Some(isbn) = &isbn {
            if self.books.find_id_by_isbn(isbn).await?.is_some() {
                return Err(LibraryError::duplicate_isbn());
            }
        }

        let draft = NewBook {
            title,
            year: command.year,
            isbn,
            author_id,
            created_at: Utc::now(),
        };
        let book_id = self
            .books
            .store_book(&draft)
            .await
            .map_err(|e| LibraryError::from_write(e, LibraryError::duplicate_isbn))?;

        info!("Created book '{}' with ID: {}", draft.title, book_id);
        self.get_book(book_id).await
    }

    /// Apply the fields present in `command` to an existing book
    pub async fn update_book(&self, book_id: i64, command: UpdateBookCommand) -> LibraryResult<Book> {
        let mut book = self.get_book(book_id).await?;

        if let Some(title) = command.title {
            book.title = required_title(Some(&title))?;
        }
        if let Some(year) = command.year {
            book.year = year;
        }
        if let Some(isbn) = command.isbn {
            let isbn = normalize_isbn(isbn);
            if let Some(isbn) = &isbn {
                if let Some(owner) = self.books.find_id_by_isbn(isbn).await? {
                    if owner != book_id {
                        return Err(LibraryError::duplicate_isbn());
                    }
                }
            }
            book.isbn = isbn;
        }
        if let Some(author_id) = command.author_id {
            let author = self
                .authors
                .get_author(author_id)
                .await?
                .ok_or_else(LibraryError::author_not_found)?;
            book.author = AuthorRef {
                id: author.id,
                name: author.name,
            };
        }

        self.books
            .update_book(&book)
            .await
            .map_err(|e| LibraryError::from_write(e, LibraryError::duplicate_isbn))?;

        info!("Updated book: {} with ID: {}", book.title, book.id);
        Ok(book)
    }

    /// Delete a book
    pub async fn delete_book(&self, book_id: i64) -> LibraryResult<()> {
        if !self.books.delete_book(book_id).await? {
            warn!("Book not found: {}", book_id);
            return Err(LibraryError::book_not_found());
        }
        info!("Deleted book with ID: {}", book_id);
        Ok(())
    }

    /// Books matching every given filter. Blank filters are ignored.
    pub async fn search_books(&self, query: BookSearchQuery) -> LibraryResult<Vec<Book>> {
        let query = BookSearchQuery {
            title: non_blank(query.title),
            author: non_blank(query.author),
            year: query.year,
        };
        let books = self.books.search_books(&query).await?;
        info!("Book search {:?} matched {} books", query, books.len());
        Ok(books)
    }

    /// One page of books ordered by id. Pages past the end are empty.
    pub async fn list_books_page(&self, query: BookPageQuery) -> LibraryResult<BookPage> {
        let page = query.page.max(1);
        let per_page = if query.per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            query.per_page
        };

        let total_items = self.books.count_books().await?;
        let total_pages = total_items.div_ceil(u64::from(per_page));
        let offset = u64::from(page - 1) * u64::from(per_page);

        let books = if offset >= total_items {
            Vec::new()
        } else {
            self.books.list_books_page(per_page, offset).await?
        };

        Ok(BookPage {
            books,
            page,
            per_page,
            total_items,
            total_pages,
        })
    }

    /// Every book under the requested ordering
    pub async fn list_books_sorted(&self, query: BookSortQuery) -> LibraryResult<Vec<Book>> {
        let books = self.books.list_books_sorted(query.field, query.order).await?;
        info!(
            "Listed {} books sorted by {} {}",
            books.len(),
            query.field.as_str(),
            query.order.as_str()
        );
        Ok(books)
    }
}

fn required_title(title: Option<&str>) -> LibraryResult<String> {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(LibraryError::validation("Title required")),
    }
}

// Blank isbn is stored as NULL
fn normalize_isbn(isbn: Option<String>) -> Option<String> {
    non_blank(isbn)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
