//! # REST API for Books
//!
//! CRUD endpoints plus search, pagination and sorting under `/api/books`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{
    BookListResponse, BookResponse, CreateBookRequest, MessageResponse, PaginatedBooksResponse,
    SortedBooksResponse, UpdateBookRequest,
};
use tracing::info;

use crate::domain::commands::books::{
    BookPageQuery, BookSearchQuery, BookSortQuery, CreateBookCommand, UpdateBookCommand,
    DEFAULT_PAGE, DEFAULT_PER_PAGE,
};
use crate::domain::models::{BookSortField, SortOrder};
use crate::domain::{LibraryError, LibraryResult};
use crate::io::rest::extract::{JsonPayload, RecordId};
use crate::io::rest::mappers::BookMapper;
use crate::AppState;

/// Query parameters for GET /api/books/search
#[derive(Debug, Deserialize)]
pub struct BookSearchParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
}

/// Query parameters for GET /api/books/paginated. Kept as strings so
/// unparseable values fall back to the defaults instead of failing.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Query parameters for GET /api/books/sorted
#[derive(Debug, Deserialize)]
pub struct SortParams {
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Create a router for book related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/search", get(search_books))
        .route("/paginated", get(list_books_paginated))
        .route("/sorted", get(list_books_sorted))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

/// List all books
pub async fn list_books(State(state): State<AppState>) -> LibraryResult<Json<BookListResponse>> {
    info!("GET /api/books");

    let books = state.book_service.list_books().await?;
    Ok(Json(BookMapper::to_list_response(books)))
}

/// Get a book by ID
pub async fn get_book(
    State(state): State<AppState>,
    RecordId(book_id): RecordId,
) -> LibraryResult<Json<BookResponse>> {
    info!("GET /api/books/{}", book_id);

    let book = state.book_service.get_book(book_id).await?;
    Ok(Json(BookMapper::to_book_response(book, None)))
}

/// Create a new book
pub async fn create_book(
    State(state): State<AppState>,
    JsonPayload(request): JsonPayload<CreateBookRequest>,
) -> LibraryResult<impl IntoResponse> {
    info!("POST /api/books - request: {:?}", request);

    let command = CreateBookCommand {
        title: request.title,
        year: request.year,
        isbn: request.isbn,
        author_id: request.author_id,
    };
    let book = state.book_service.create_book(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookMapper::to_book_response(book, Some("Book created successfully"))),
    ))
}

/// Update the supplied fields of a book
pub async fn update_book(
    State(state): State<AppState>,
    RecordId(book_id): RecordId,
    payload: Result<JsonPayload<UpdateBookRequest>, LibraryError>,
) -> LibraryResult<Json<BookResponse>> {
    info!("PUT /api/books/{}", book_id);

    // A missing book is reported before a missing payload
    let JsonPayload(request) = match payload {
        Ok(payload) => payload,
        Err(err) => {
            state.book_service.get_book(book_id).await?;
            return Err(err);
        }
    };

    let command = UpdateBookCommand {
        title: request.title,
        year: request.year,
        isbn: request.isbn,
        author_id: request.author_id,
    };
    let book = state.book_service.update_book(book_id, command).await?;

    Ok(Json(BookMapper::to_book_response(book, Some("Book updated successfully"))))
}

/// Delete a book
pub async fn delete_book(
    State(state): State<AppState>,
    RecordId(book_id): RecordId,
) -> LibraryResult<Json<MessageResponse>> {
    info!("DELETE /api/books/{}", book_id);

    state.book_service.delete_book(book_id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Book deleted successfully".to_string(),
    }))
}

/// Search books by title, author name and year
pub async fn search_books(
    State(state): State<AppState>,
    Query(params): Query<BookSearchParams>,
) -> LibraryResult<Json<BookListResponse>> {
    info!("GET /api/books/search - query: {:?}", params);

    let year = match params.year.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(year) => Some(
            year.parse::<i32>()
                .map_err(|_| LibraryError::validation("Year must be an integer"))?,
        ),
    };
    let query = BookSearchQuery {
        title: params.title,
        author: params.author,
        year,
    };

    let books = state.book_service.search_books(query).await?;
    Ok(Json(BookMapper::to_list_response(books)))
}

/// List one page of books ordered by id
pub async fn list_books_paginated(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> LibraryResult<Json<PaginatedBooksResponse>> {
    info!("GET /api/books/paginated - query: {:?}", params);

    let query = BookPageQuery {
        page: parse_or(params.page.as_deref(), DEFAULT_PAGE),
        per_page: parse_or(params.per_page.as_deref(), DEFAULT_PER_PAGE),
    };

    let page = state.book_service.list_books_page(query).await?;
    Ok(Json(BookMapper::to_page_response(page)))
}

/// List all books under an allow-listed ordering
pub async fn list_books_sorted(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> LibraryResult<Json<SortedBooksResponse>> {
    info!("GET /api/books/sorted - query: {:?}", params);

    let query = BookSortQuery {
        field: BookSortField::from_param(params.sort.as_deref()),
        order: SortOrder::from_param(params.order.as_deref()),
    };

    let books = state.book_service.list_books_sorted(query).await?;
    Ok(Json(BookMapper::to_sorted_response(books, query)))
}

fn parse_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}
