use chrono::SecondsFormat;
use shared::{
    AuthorSummary, Book as SharedBook, BookListResponse, BookResponse, PaginatedBooksResponse,
    SortedBooksResponse,
};

use crate::domain::commands::books::{BookPage, BookSortQuery};
use crate::domain::models::Book as DomainBook;

/// Mapper from domain books to the book view sent to clients.
pub struct BookMapper;

impl BookMapper {
    /// Full book fields plus the minimal author summary
    pub fn to_dto(domain: DomainBook) -> SharedBook {
        SharedBook {
            id: domain.id,
            title: domain.title,
            year: domain.year,
            isbn: domain.isbn,
            author: AuthorSummary {
                id: domain.author.id,
                name: domain.author.name,
            },
            created_at: Some(domain.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
        }
    }

    pub fn to_dtos(books: Vec<DomainBook>) -> Vec<SharedBook> {
        books.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_book_response(domain: DomainBook, message: Option<&str>) -> BookResponse {
        BookResponse {
            success: true,
            message: message.map(str::to_string),
            book: Self::to_dto(domain),
        }
    }

    pub fn to_list_response(books: Vec<DomainBook>) -> BookListResponse {
        let books = Self::to_dtos(books);
        BookListResponse {
            success: true,
            count: books.len(),
            books,
        }
    }

    pub fn to_page_response(page: BookPage) -> PaginatedBooksResponse {
        let books = Self::to_dtos(page.books);
        PaginatedBooksResponse {
            success: true,
            page: page.page,
            per_page: page.per_page,
            total_items: page.total_items,
            total_pages: page.total_pages,
            count: books.len(),
            books,
        }
    }

    pub fn to_sorted_response(books: Vec<DomainBook>, query: BookSortQuery) -> SortedBooksResponse {
        let books = Self::to_dtos(books);
        SortedBooksResponse {
            success: true,
            sort: query.field.as_str().to_string(),
            order: query.order.as_str().to_string(),
            count: books.len(),
            books,
        }
    }
}
