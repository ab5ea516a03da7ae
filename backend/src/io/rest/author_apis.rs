//! # REST API for Authors
//!
//! Endpoints for creating, retrieving, updating, deleting and searching authors.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{AuthorListResponse, AuthorResponse, CreateAuthorRequest, MessageResponse, UpdateAuthorRequest};
use tracing::info;

use crate::domain::commands::authors::{AuthorSearchQuery, CreateAuthorCommand, UpdateAuthorCommand};
use crate::domain::{LibraryError, LibraryResult};
use crate::io::rest::extract::{JsonPayload, RecordId};
use crate::io::rest::mappers::AuthorMapper;
use crate::AppState;

/// Query parameters for GET /api/authors/search
#[derive(Debug, Deserialize)]
pub struct AuthorSearchParams {
    pub name: Option<String>,
    pub city: Option<String>,
    pub title: Option<String>,
}

/// Create a router for author related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route("/search", get(search_authors))
        .route("/:id", get(get_author).put(update_author).delete(delete_author))
}

/// List all authors with their books
pub async fn list_authors(State(state): State<AppState>) -> LibraryResult<Json<AuthorListResponse>> {
    info!("GET /api/authors");

    let authors = state.author_service.list_authors().await?;
    Ok(Json(AuthorMapper::to_list_response(authors)))
}

/// Get an author by ID
pub async fn get_author(
    State(state): State<AppState>,
    RecordId(author_id): RecordId,
) -> LibraryResult<Json<AuthorResponse>> {
    info!("GET /api/authors/{}", author_id);

    let author = state.author_service.get_author(author_id).await?;
    Ok(Json(AuthorMapper::to_author_response(author, None)))
}

/// Create a new author
pub async fn create_author(
    State(state): State<AppState>,
    JsonPayload(request): JsonPayload<CreateAuthorRequest>,
) -> LibraryResult<impl IntoResponse> {
    info!("POST /api/authors - request: {:?}", request);

    let command = CreateAuthorCommand {
        name: request.name,
        city: request.city,
    };
    let author = state.author_service.create_author(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthorMapper::to_author_response(author, Some("Author created successfully"))),
    ))
}

/// Update the supplied fields of an author
pub async fn update_author(
    State(state): State<AppState>,
    RecordId(author_id): RecordId,
    payload: Result<JsonPayload<UpdateAuthorRequest>, LibraryError>,
) -> LibraryResult<Json<AuthorResponse>> {
    info!("PUT /api/authors/{}", author_id);

    // A missing author is reported before a missing payload
    let JsonPayload(request) = match payload {
        Ok(payload) => payload,
        Err(err) => {
            state.author_service.get_author(author_id).await?;
            return Err(err);
        }
    };

    let command = UpdateAuthorCommand {
        name: request.name,
        city: request.city,
    };
    let author = state.author_service.update_author(author_id, command).await?;

    Ok(Json(AuthorMapper::to_author_response(author, Some("Author updated successfully"))))
}

/// Delete an author and every book they own
pub async fn delete_author(
    State(state): State<AppState>,
    RecordId(author_id): RecordId,
) -> LibraryResult<Json<MessageResponse>> {
    info!("DELETE /api/authors/{}", author_id);

    state.author_service.delete_author(author_id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Author deleted successfully".to_string(),
    }))
}

/// Search authors by name, city and the titles of their books
pub async fn search_authors(
    State(state): State<AppState>,
    Query(params): Query<AuthorSearchParams>,
) -> LibraryResult<Json<AuthorListResponse>> {
    info!("GET /api/authors/search - query: {:?}", params);

    let query = AuthorSearchQuery {
        name: params.name,
        city: params.city,
        title: params.title,
    };

    let authors = state.author_service.search_authors(query).await?;
    Ok(Json(AuthorMapper::to_list_response(authors)))
}
