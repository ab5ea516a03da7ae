use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::contains_pattern;
use crate::domain::commands::authors::AuthorSearchQuery;
use crate::domain::models::Author;
use crate::storage::connection::DbConnection;

/// Repository for author rows
#[derive(Clone)]
pub struct AuthorRepository {
    db: DbConnection,
}

impl AuthorRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert an author and return the generated id
    pub async fn store_author(&self, name: &str, city: &str) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO authors (name, city)
            VALUES (?, ?)
            "#,
        )
        .bind(name)
        .bind(city)
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get an author by ID
    pub async fn get_author(&self, author_id: i64) -> Result<Option<Author>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, city
            FROM authors
            WHERE id = ?
            "#,
        )
        .bind(author_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(author_from_row).transpose()
    }

    /// Find an author by exact name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Author>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, city
            FROM authors
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(author_from_row).transpose()
    }

    /// List all authors ordered by id
    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, city
            FROM authors
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(author_from_row).collect()
    }

    /// Authors matching every given filter, each at most once
    pub async fn search_authors(&self, query: &AuthorSearchQuery) -> Result<Vec<Author>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT a.id, a.name, a.city FROM authors a");
        let mut separator = " WHERE ";

        if let Some(name) = &query.name {
            builder
                .push(separator)
                .push("a.name LIKE ")
                .push_bind(contains_pattern(name))
                .push(" ESCAPE '\\'");
            separator = " AND ";
        }
        if let Some(city) = &query.city {
            builder
                .push(separator)
                .push("a.city LIKE ")
                .push_bind(contains_pattern(city))
                .push(" ESCAPE '\\'");
            separator = " AND ";
        }
        if let Some(title) = &query.title {
            builder
                .push(separator)
                .push("EXISTS (SELECT 1 FROM books b WHERE b.author_id = a.id AND b.title LIKE ")
                .push_bind(contains_pattern(title))
                .push(" ESCAPE '\\')");
        }
        builder.push(" ORDER BY a.id ASC");

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(author_from_row).collect()
    }

    /// Update name and city of an existing author
    pub async fn update_author(&self, author: &Author) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE authors
            SET name = ?, city = ?
            WHERE id = ?
            "#,
        )
        .bind(&author.name)
        .bind(&author.city)
        .bind(author.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete an author and all of their books in one transaction.
    /// Returns the number of books removed, or `None` if the author did not exist.
    pub async fn delete_author(&self, author_id: i64) -> Result<Option<u64>> {
        let mut tx = self.db.pool().begin().await?;

        let books_removed = sqlx::query("DELETE FROM books WHERE author_id = ?")
            .bind(author_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let authors_removed = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(author_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if authors_removed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(books_removed))
    }

    pub async fn count_authors(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count as u64)
    }
}

fn author_from_row(row: &SqliteRow) -> Result<Author> {
    Ok(Author {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> AuthorRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        AuthorRepository::new(db)
    }

    #[tokio::test]
    async fn test_store_and_get_author() {
        let repo = setup_test().await;

        let id = repo.store_author("Eric Matthes", "New York").await.unwrap();
        let author = repo.get_author(id).await.unwrap().expect("author should exist");

        assert_eq!(author.id, id);
        assert_eq!(author.name, "Eric Matthes");
        assert_eq!(author.city, "New York");
        assert!(repo.get_author(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected_by_store() {
        let repo = setup_test().await;

        repo.store_author("Eric Matthes", "New York").await.unwrap();
        let err = repo.store_author("Eric Matthes", "Boston").await.unwrap_err();

        match err.downcast_ref::<sqlx::Error>() {
            Some(sqlx::Error::Database(db_err)) => assert!(db_err.is_unique_violation()),
            other => panic!("expected unique violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_by_name_and_city() {
        let repo = setup_test().await;
        repo.store_author("Eric Matthes", "New York").await.unwrap();
        repo.store_author("Miguel Grinberg", "Washington").await.unwrap();
        repo.store_author("Robert C. Martin", "London").await.unwrap();

        let by_name = repo
            .search_authors(&AuthorSearchQuery {
                name: Some("MART".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Robert C. Martin");

        let combined = repo
            .search_authors(&AuthorSearchQuery {
                name: Some("e".to_string()),
                city: Some("york".to_string()),
                title: None,
            })
            .await
            .unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].name, "Eric Matthes");

        let everyone = repo.search_authors(&AuthorSearchQuery::default()).await.unwrap();
        assert_eq!(everyone.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_author_returns_none() {
        let repo = setup_test().await;
        assert_eq!(repo.delete_author(7).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_and_count() {
        let repo = setup_test().await;
        let id = repo.store_author("A", "X").await.unwrap();

        repo.update_author(&Author {
            id,
            name: "A".to_string(),
            city: "Y".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(repo.get_author(id).await.unwrap().unwrap().city, "Y");
        assert_eq!(repo.count_authors().await.unwrap(), 1);
    }
}
