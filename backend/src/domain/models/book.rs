use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The owning author as seen from a book: identity and display name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i64,
    pub name: String,
}

/// Domain model representing a stored book joined with its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: AuthorRef,
}

/// A validated book that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Columns a book listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSortField {
    #[default]
    Id,
    Title,
    Year,
    Isbn,
    CreatedAt,
}

impl BookSortField {
    /// Resolve a query-string value against the allow-list, falling back to `Id`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("title") => Self::Title,
            Some("year") => Self::Year,
            Some("isbn") => Self::Isbn,
            Some("created_at") => Self::CreatedAt,
            _ => Self::Id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Year => "year",
            Self::Isbn => "isbn",
            Self::CreatedAt => "created_at",
        }
    }

    /// Qualified column name; only ever one of these fixed strings reaches SQL.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "b.id",
            Self::Title => "b.title",
            Self::Year => "b.year",
            Self::Isbn => "b.isbn",
            Self::CreatedAt => "b.created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Case-insensitive; anything other than "desc" sorts ascending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(order) if order.trim().eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_allow_list() {
        assert_eq!(BookSortField::from_param(Some("title")), BookSortField::Title);
        assert_eq!(BookSortField::from_param(Some("created_at")), BookSortField::CreatedAt);
        assert_eq!(BookSortField::from_param(Some("nonsense")), BookSortField::Id);
        assert_eq!(BookSortField::from_param(Some("id; DROP TABLE books")), BookSortField::Id);
        assert_eq!(BookSortField::from_param(None), BookSortField::Id);
    }

    #[test]
    fn test_sort_order_is_case_insensitive() {
        assert_eq!(SortOrder::from_param(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("Desc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("sideways")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(None), SortOrder::Asc);
    }
}
