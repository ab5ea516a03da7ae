use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::commands::authors::{AuthorSearchQuery, CreateAuthorCommand, UpdateAuthorCommand};
use crate::domain::error::{LibraryError, LibraryResult};
use crate::domain::models::{Author, AuthorWithBooks, Book};
use crate::storage::{AuthorRepository, BookRepository, DbConnection};

const NAME_AND_CITY_REQUIRED: &str = "Name and city are required";

/// Service for managing authors and, through cascade, their books
#[derive(Clone)]
pub struct AuthorService {
    authors: AuthorRepository,
    books: BookRepository,
}

impl AuthorService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            authors: AuthorRepository::new(db.clone()),
            books: BookRepository::new(db),
        }
    }

    /// List every author with their books
    pub async fn list_authors(&self) -> LibraryResult<Vec<AuthorWithBooks>> {
        let authors = self.authors.list_authors().await?;
        info!("Found {} authors", authors.len());
        self.attach_books(authors).await
    }

    /// Get an author by ID
    pub async fn get_author(&self, author_id: i64) -> LibraryResult<AuthorWithBooks> {
        let author = self.find_author(author_id).await?;
        let books = self.books.list_books_for_authors(&[author.id]).await?;
        Ok(AuthorWithBooks { author, books })
    }

    /// Create a new author with a unique name
    pub async fn create_author(&self, command: CreateAuthorCommand) -> LibraryResult<AuthorWithBooks> {
        let (name, city) = match (required(command.name), required(command.city)) {
            (Some(name), Some(city)) => (name, city),
            _ => return Err(LibraryError::validation(NAME_AND_CITY_REQUIRED)),
        };

        if self.authors.find_by_name(&name).await?.is_some() {
            return Err(LibraryError::duplicate_author());
        }

        let author_id = self
            .authors
            .store_author(&name, &city)
            .await
            .map_err(|e| LibraryError::from_write(e, LibraryError::duplicate_author))?;

        info!("Created author: {} with ID: {}", name, author_id);
        Ok(AuthorWithBooks {
            author: Author {
                id: author_id,
                name,
                city,
            },
            books: Vec::new(),
        })
    }

    /// Apply the fields present in `command` to an existing author
    pub async fn update_author(
        &self,
        author_id: i64,
        command: UpdateAuthorCommand,
    ) -> LibraryResult<AuthorWithBooks> {
        let mut author = self.find_author(author_id).await?;

        if let Some(name) = command.name {
            let name = required(Some(name)).ok_or_else(|| LibraryError::validation(NAME_AND_CITY_REQUIRED))?;
            if let Some(existing) = self.authors.find_by_name(&name).await? {
                if existing.id != author_id {
                    return Err(LibraryError::duplicate_author());
                }
            }
            author.name = name;
        }
        if let Some(city) = command.city {
            author.city = required(Some(city)).ok_or_else(|| LibraryError::validation(NAME_AND_CITY_REQUIRED))?;
        }

        self.authors
            .update_author(&author)
            .await
            .map_err(|e| LibraryError::from_write(e, LibraryError::duplicate_author))?;

        info!("Updated author: {} with ID: {}", author.name, author.id);
        self.get_author(author_id).await
    }

    /// Delete an author together with all of their books.
    /// Returns how many books were removed.
    pub async fn delete_author(&self, author_id: i64) -> LibraryResult<u64> {
        match self.authors.delete_author(author_id).await? {
            Some(books_removed) => {
                info!("Deleted author {} and {} of their books", author_id, books_removed);
                Ok(books_removed)
            }
            None => {
                warn!("Author not found: {}", author_id);
                Err(LibraryError::author_not_found())
            }
        }
    }

    /// Authors matching every given filter. Blank filters are ignored.
    pub async fn search_authors(&self, query: AuthorSearchQuery) -> LibraryResult<Vec<AuthorWithBooks>> {
        let query = AuthorSearchQuery {
            name: required(query.name),
            city: required(query.city),
            title: required(query.title),
        };
        let authors = self.authors.search_authors(&query).await?;
        info!("Author search {:?} matched {} authors", query, authors.len());
        self.attach_books(authors).await
    }

    async fn find_author(&self, author_id: i64) -> LibraryResult<Author> {
        match self.authors.get_author(author_id).await? {
            Some(author) => Ok(author),
            None => {
                warn!("Author not found: {}", author_id);
                Err(LibraryError::author_not_found())
            }
        }
    }

    // One query for all books, then grouped per author, preserving author order.
    async fn attach_books(&self, authors: Vec<Author>) -> LibraryResult<Vec<AuthorWithBooks>> {
        let ids: Vec<i64> = authors.iter().map(|a| a.id).collect();
        let mut by_author: HashMap<i64, Vec<Book>> = HashMap::new();
        for book in self.books.list_books_for_authors(&ids).await? {
            by_author.entry(book.author.id).or_default().push(book);
        }

        Ok(authors
            .into_iter()
            .map(|author| {
                let books = by_author.remove(&author.id).unwrap_or_default();
                AuthorWithBooks { author, books }
            })
            .collect())
    }
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
