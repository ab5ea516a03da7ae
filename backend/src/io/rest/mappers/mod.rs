pub mod author_mapper;
pub mod book_mapper;

pub use author_mapper::AuthorMapper;
pub use book_mapper::BookMapper;
