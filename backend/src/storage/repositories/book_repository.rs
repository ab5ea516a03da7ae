use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::contains_pattern;
use crate::domain::commands::books::BookSearchQuery;
use crate::domain::models::{AuthorRef, Book, BookSortField, NewBook, SortOrder};
use crate::storage::connection::DbConnection;

// Every book read joins its author so the summary is always available.
const SELECT_BOOKS: &str = r#"
    SELECT b.id, b.title, b.year, b.isbn, b.created_at, b.author_id, a.name AS author_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

pub(crate) const AUTHOR_ID_CHUNK: usize = 500;

/// Repository for book rows
#[derive(Clone)]
pub struct BookRepository {
    db: DbConnection,
}

impl BookRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a book and return the generated id
    pub async fn store_book(&self, book: &NewBook) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (title, year, isbn, created_at, author_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.title)
        .bind(book.year)
        .bind(&book.isbn)
        .bind(format_timestamp(&book.created_at))
        .bind(book.author_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a book by ID
    pub async fn get_book(&self, book_id: i64) -> Result<Option<Book>> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_BOOKS);
        builder.push(" WHERE b.id = ").push_bind(book_id);

        let row = builder.build().fetch_optional(self.db.pool()).await?;
        row.as_ref().map(book_from_row).transpose()
    }

    /// Id of the book currently holding `isbn`, if any
    pub async fn find_id_by_isbn(&self, isbn: &str) -> Result<Option<i64>> {
        let id = sqlx::query_scalar("SELECT id FROM books WHERE isbn = ?")
            .bind(isbn)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(id)
    }

    /// List all books ordered by id
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.list_books_sorted(BookSortField::Id, SortOrder::Asc).await
    }

    /// List all books under the given ordering. Ties fall back to ascending id.
    pub async fn list_books_sorted(&self, field: BookSortField, order: SortOrder) -> Result<Vec<Book>> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_BOOKS);
        builder.push(format!(" ORDER BY {} {}", field.column(), order.keyword()));
        if field != BookSortField::Id {
            builder.push(", b.id ASC");
        }

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(book_from_row).collect()
    }

    /// One window of books ordered by ascending id
    pub async fn list_books_page(&self, limit: u32, offset: u64) -> Result<Vec<Book>> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_BOOKS);
        builder
            .push(" ORDER BY b.id ASC LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(book_from_row).collect()
    }

    /// Books owned by any of the given authors, ordered by id.
    /// Ids are bound in chunks to stay under SQLite's bind-variable limit.
    pub async fn list_books_for_authors(&self, author_ids: &[i64]) -> Result<Vec<Book>> {
        let mut books = Vec::new();
        for chunk in author_ids.chunks(AUTHOR_ID_CHUNK) {
            let mut builder = QueryBuilder::<Sqlite>::new(SELECT_BOOKS);
            builder.push(" WHERE b.author_id IN (");
            let mut ids = builder.separated(", ");
            for author_id in chunk {
                ids.push_bind(*author_id);
            }
            ids.push_unseparated(")");

            let rows = builder.build().fetch_all(self.db.pool()).await?;
            for row in &rows {
                books.push(book_from_row(row)?);
            }
        }

        books.sort_by_key(|book| book.id);
        Ok(books)
    }

    /// Books matching every given filter
    pub async fn search_books(&self, query: &BookSearchQuery) -> Result<Vec<Book>> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_BOOKS);
        let mut separator = " WHERE ";

        if let Some(title) = &query.title {
            builder
                .push(separator)
                .push("b.title LIKE ")
                .push_bind(contains_pattern(title))
                .push(" ESCAPE '\\'");
            separator = " AND ";
        }
        if let Some(author) = &query.author {
            builder
                .push(separator)
                .push("a.name LIKE ")
                .push_bind(contains_pattern(author))
                .push(" ESCAPE '\\'");
            separator = " AND ";
        }
        if let Some(year) = query.year {
            builder.push(separator).push("b.year = ").push_bind(year);
        }
        builder.push(" ORDER BY b.id ASC");

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(book_from_row).collect()
    }

    /// Persist the mutable fields of a book. created_at is never rewritten.
    pub async fn update_book(&self, book: &Book) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE books
            SET title = ?, year = ?, isbn = ?, author_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&book.title)
        .bind(book.year)
        .bind(&book.isbn)
        .bind(book.author.id)
        .bind(book.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete a book. Returns false if it did not exist.
    pub async fn delete_book(&self, book_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(book_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_books(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count as u64)
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn book_from_row(row: &SqliteRow) -> Result<Book> {
    let created_at: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .with_context(|| format!("Invalid created_at timestamp: {}", created_at))?
        .with_timezone(&Utc);

    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        year: row.try_get("year")?,
        isbn: row.try_get("isbn")?,
        created_at,
        author: AuthorRef {
            id: row.try_get("author_id")?,
            name: row.try_get("author_name")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repositories::AuthorRepository;
    use chrono::Duration;

    struct Fixture {
        books: BookRepository,
        authors: AuthorRepository,
    }

    async fn setup_test() -> Fixture {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        Fixture {
            books: BookRepository::new(db.clone()),
            authors: AuthorRepository::new(db),
        }
    }

    fn new_book(title: &str, year: Option<i32>, isbn: Option<&str>, author_id: i64) -> NewBook {
        NewBook {
            title: title.to_string(),
            year,
            isbn: isbn.map(str::to_string),
            author_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_book() {
        let f = setup_test().await;
        let author_id = f.authors.store_author("Robert C. Martin", "London").await.unwrap();

        let draft = new_book("Clean Code", Some(2008), Some("978-0132350884"), author_id);
        let id = f.books.store_book(&draft).await.unwrap();
        let book = f.books.get_book(id).await.unwrap().expect("book should exist");

        assert_eq!(book.title, "Clean Code");
        assert_eq!(book.year, Some(2008));
        assert_eq!(book.isbn.as_deref(), Some("978-0132350884"));
        assert_eq!(book.author.id, author_id);
        assert_eq!(book.author.name, "Robert C. Martin");
        assert_eq!(book.created_at.timestamp_micros(), draft.created_at.timestamp_micros());
    }

    #[tokio::test]
    async fn test_find_id_by_isbn() {
        let f = setup_test().await;
        let author_id = f.authors.store_author("A", "X").await.unwrap();
        let id = f.books.store_book(&new_book("T", None, Some("111"), author_id)).await.unwrap();

        assert_eq!(f.books.find_id_by_isbn("111").await.unwrap(), Some(id));
        assert_eq!(f.books.find_id_by_isbn("222").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_books_without_isbn_do_not_collide() {
        let f = setup_test().await;
        let author_id = f.authors.store_author("A", "X").await.unwrap();

        f.books.store_book(&new_book("One", None, None, author_id)).await.unwrap();
        f.books.store_book(&new_book("Two", None, None, author_id)).await.unwrap();

        assert_eq!(f.books.count_books().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_author_cascades_to_books() {
        let f = setup_test().await;
        let keep = f.authors.store_author("Keep", "X").await.unwrap();
        let gone = f.authors.store_author("Drop", "Y").await.unwrap();
        f.books.store_book(&new_book("K1", None, None, keep)).await.unwrap();
        let d1 = f.books.store_book(&new_book("D1", None, None, gone)).await.unwrap();
        let d2 = f.books.store_book(&new_book("D2", None, None, gone)).await.unwrap();

        let removed = f.authors.delete_author(gone).await.unwrap();

        assert_eq!(removed, Some(2));
        assert!(f.books.get_book(d1).await.unwrap().is_none());
        assert!(f.books.get_book(d2).await.unwrap().is_none());
        assert_eq!(f.books.count_books().await.unwrap(), 1);
        assert_eq!(f.authors.count_authors().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_books_for_authors_groups_by_owner() {
        let f = setup_test().await;
        let a = f.authors.store_author("A", "X").await.unwrap();
        let b = f.authors.store_author("B", "Y").await.unwrap();
        let c = f.authors.store_author("C", "Z").await.unwrap();
        f.books.store_book(&new_book("A1", None, None, a)).await.unwrap();
        f.books.store_book(&new_book("B1", None, None, b)).await.unwrap();
        f.books.store_book(&new_book("C1", None, None, c)).await.unwrap();

        let books = f.books.list_books_for_authors(&[a, c]).await.unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["A1", "C1"]);

        assert!(f.books.list_books_for_authors(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_books_for_more_authors_than_one_chunk() {
        let f = setup_test().await;
        let mut author_ids = Vec::new();
        for i in 0..AUTHOR_ID_CHUNK + 5 {
            author_ids.push(f.authors.store_author(&format!("Author {}", i), "X").await.unwrap());
        }
        let first = author_ids[0];
        let last = author_ids[author_ids.len() - 1];
        f.books.store_book(&new_book("Last", None, None, last)).await.unwrap();
        f.books.store_book(&new_book("First", None, None, first)).await.unwrap();

        let books = f.books.list_books_for_authors(&author_ids).await.unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Last", "First"]);
    }

    #[tokio::test]
    async fn test_page_window() {
        let f = setup_test().await;
        let author_id = f.authors.store_author("A", "X").await.unwrap();
        for i in 0..7 {
            f.books
                .store_book(&new_book(&format!("Book {}", i), None, None, author_id))
                .await
                .unwrap();
        }

        let second = f.books.list_books_page(5, 5).await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].title, "Book 5");

        assert!(f.books.list_books_page(5, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sorted_by_year_puts_missing_years_last_when_descending() {
        let f = setup_test().await;
        let author_id = f.authors.store_author("A", "X").await.unwrap();
        f.books.store_book(&new_book("Old", Some(1999), None, author_id)).await.unwrap();
        f.books.store_book(&new_book("Undated", None, None, author_id)).await.unwrap();
        f.books.store_book(&new_book("New", Some(2020), None, author_id)).await.unwrap();

        let books = f.books.list_books_sorted(BookSortField::Year, SortOrder::Desc).await.unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
    }

    #[tokio::test]
    async fn test_sorted_by_year_puts_missing_years_first_when_ascending() {
        let f = setup_test().await;
        let author_id = f.authors.store_author("A", "X").await.unwrap();
        f.books.store_book(&new_book("New", Some(2020), None, author_id)).await.unwrap();
        f.books.store_book(&new_book("Undated", None, None, author_id)).await.unwrap();
        f.books.store_book(&new_book("Old", Some(1999), None, author_id)).await.unwrap();

        let books = f.books.list_books_sorted(BookSortField::Year, SortOrder::Asc).await.unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Undated", "Old", "New"]);
    }

    #[tokio::test]
    async fn test_sorted_by_created_at_follows_creation_time() {
        let f = setup_test().await;
        let author_id = f.authors.store_author("A", "X").await.unwrap();
        let base = Utc::now();
        let at = |title: &str, micros: i64| NewBook {
            created_at: base + Duration::microseconds(micros),
            ..new_book(title, None, None, author_id)
        };

        // Inserted out of creation order, across a whole-second boundary
        f.books.store_book(&at("Latest", 1_000_000)).await.unwrap();
        f.books.store_book(&at("Earliest", 0)).await.unwrap();
        f.books.store_book(&at("Middle", 999_999)).await.unwrap();
        f.books.store_book(&at("Second", 1)).await.unwrap();

        let books = f.books.list_books_sorted(BookSortField::CreatedAt, SortOrder::Asc).await.unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Earliest", "Second", "Middle", "Latest"]);
    }

    #[tokio::test]
    async fn test_search_combines_filters() {
        let f = setup_test().await;
        let eric = f.authors.store_author("Eric Matthes", "New York").await.unwrap();
        let miguel = f.authors.store_author("Miguel Grinberg", "Washington").await.unwrap();
        f.books
            .store_book(&new_book("Python Crash Course", Some(2019), None, eric))
            .await
            .unwrap();
        f.books
            .store_book(&new_book("Flask Web Development", Some(2018), None, miguel))
            .await
            .unwrap();
        f.books
            .store_book(&new_book("Python Tricks", Some(2018), None, miguel))
            .await
            .unwrap();

        let python = f
            .books
            .search_books(&BookSearchQuery {
                title: Some("python".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(python.len(), 2);

        let narrowed = f
            .books
            .search_books(&BookSearchQuery {
                title: Some("python".to_string()),
                author: Some("GRINBERG".to_string()),
                year: Some(2018),
            })
            .await
            .unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].title, "Python Tricks");

        let all = f.books.search_books(&BookSearchQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
