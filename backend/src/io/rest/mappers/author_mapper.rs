use shared::{Author as SharedAuthor, AuthorListResponse, AuthorResponse};

use super::book_mapper::BookMapper;
use crate::domain::models::AuthorWithBooks;

/// Mapper from domain authors to the author view sent to clients.
/// Books are rendered through `BookMapper`, whose author field is only a
/// summary, so the two views never expand into each other.
pub struct AuthorMapper;

impl AuthorMapper {
    pub fn to_dto(domain: AuthorWithBooks) -> SharedAuthor {
        SharedAuthor {
            id: domain.author.id,
            name: domain.author.name,
            city: domain.author.city,
            books: BookMapper::to_dtos(domain.books),
        }
    }

    pub fn to_author_response(domain: AuthorWithBooks, message: Option<&str>) -> AuthorResponse {
        AuthorResponse {
            success: true,
            message: message.map(str::to_string),
            author: Self::to_dto(domain),
        }
    }

    pub fn to_list_response(authors: Vec<AuthorWithBooks>) -> AuthorListResponse {
        let authors: Vec<SharedAuthor> = authors.into_iter().map(Self::to_dto).collect();
        AuthorListResponse {
            success: true,
            count: authors.len(),
            authors,
        }
    }
}
