//! Sample catalogue loaded into an empty database on startup.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::models::NewBook;
use crate::storage::{AuthorRepository, BookRepository, DbConnection};

struct SampleBook {
    title: &'static str,
    year: i32,
    isbn: &'static str,
    author: &'static str,
}

const SAMPLE_AUTHORS: [(&str, &str); 3] = [
    ("Eric Matthes", "New York"),
    ("Miguel Grinberg", "Washington"),
    ("Robert C. Martin", "London"),
];

const SAMPLE_BOOKS: [SampleBook; 3] = [
    SampleBook {
        title: "Python Crash Course",
        year: 2019,
        isbn: "978-1593279288",
        author: "Eric Matthes",
    },
    SampleBook {
        title: "Flask Web Development",
        year: 2018,
        isbn: "978-1491991732",
        author: "Miguel Grinberg",
    },
    SampleBook {
        title: "Clean Code",
        year: 2008,
        isbn: "978-0132350884",
        author: "Robert C. Martin",
    },
];

/// Insert the sample authors when there are no authors, and the sample books
/// when there are no books. Returns whether anything was inserted.
pub async fn seed_sample_data(db: &DbConnection) -> Result<bool> {
    let authors = AuthorRepository::new(db.clone());
    let books = BookRepository::new(db.clone());
    let mut seeded = false;

    if authors.count_authors().await? == 0 {
        for (name, city) in SAMPLE_AUTHORS {
            authors.store_author(name, city).await?;
        }
        info!("Seeded {} sample authors", SAMPLE_AUTHORS.len());
        seeded = true;
    }

    if books.count_books().await? == 0 {
        let mut inserted = 0;
        for sample in &SAMPLE_BOOKS {
            let Some(author) = authors.find_by_name(sample.author).await? else {
                warn!("Skipping sample book '{}', author {} is gone", sample.title, sample.author);
                continue;
            };
            books
                .store_book(&NewBook {
                    title: sample.title.to_string(),
                    year: Some(sample.year),
                    isbn: Some(sample.isbn.to_string()),
                    author_id: author.id,
                    created_at: Utc::now(),
                })
                .await?;
            inserted += 1;
        }
        info!("Seeded {} sample books", inserted);
        seeded |= inserted > 0;
    }

    if !seeded {
        info!("Database already populated, skipping sample data");
    }
    Ok(seeded)
}
