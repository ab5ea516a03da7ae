//! # Library Backend
//!
//! REST service for a catalogue of books and the authors who wrote them.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, extractors, mappers)
//!     ↓
//! Domain Layer (services, validation rules)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```
//!
//! `main.rs` reads [`config::ServerConfig`], calls [`initialize_backend`] and
//! serves the router built by [`create_router`].

pub mod config;
pub mod domain;
pub mod io;
pub mod seed;
pub mod storage;

use anyhow::Result;
use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::domain::{AuthorService, BookService};
use crate::io::rest::{author_apis, book_apis, docs_apis, error};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub book_service: BookService,
    pub author_service: AuthorService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            book_service: BookService::new(db.clone()),
            author_service: AuthorService::new(db),
        }
    }
}

/// Open the database, load sample data if configured, and build the services
pub async fn initialize_backend(config: &ServerConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    if config.seed_sample_data {
        seed::seed_sample_data(&db).await?;
    }

    info!("Setting up application state");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(docs_apis::index))
        .nest("/api/books", book_apis::router())
        .nest("/api/authors", author_apis::router())
        .fallback(error::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
