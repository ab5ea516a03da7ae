pub mod author_repository;
pub mod book_repository;

pub use author_repository::AuthorRepository;
pub use book_repository::BookRepository;

/// Build a `LIKE ... ESCAPE '\'` pattern matching `term` anywhere in a column.
/// SQLite's LIKE is case-insensitive for ASCII, which gives the search semantics.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
