use serde::{Deserialize, Deserializer, Serialize};

/// Minimal author reference embedded in every book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: i64,
    pub name: String,
}

/// Book as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub author: AuthorSummary,
    /// Creation timestamp (RFC 3339), null when unknown
    pub created_at: Option<String>,
}

/// Author as returned by the API, with the books they wrote.
/// Nested books only carry the author summary, never the full author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
}

/// Partial book update. Absent fields are left untouched; an explicit
/// `null` for `year` or `isbn` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAuthorRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAuthorRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub book: Book,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookListResponse {
    pub success: bool,
    pub count: usize,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedBooksResponse {
    pub success: bool,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub count: usize,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortedBooksResponse {
    pub success: bool,
    pub sort: String,
    pub order: String,
    pub count: usize,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub author: Author,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorListResponse {
    pub success: bool,
    pub count: usize,
    pub authors: Vec<Author>,
}

/// Confirmation for operations that return no record (deletes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Body of every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// Distinguishes `"field": null` (Some(None)) from a missing field (None).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_book_request_distinguishes_null_from_missing() {
        let missing: UpdateBookRequest = serde_json::from_value(json!({"title": "T"})).unwrap();
        assert_eq!(missing.title.as_deref(), Some("T"));
        assert_eq!(missing.year, None);
        assert_eq!(missing.isbn, None);

        let cleared: UpdateBookRequest =
            serde_json::from_value(json!({"year": null, "isbn": null})).unwrap();
        assert_eq!(cleared.year, Some(None));
        assert_eq!(cleared.isbn, Some(None));

        let set: UpdateBookRequest = serde_json::from_value(json!({"year": 2020})).unwrap();
        assert_eq!(set.year, Some(Some(2020)));
    }

    #[test]
    fn test_unknown_update_fields_are_ignored() {
        let request: UpdateAuthorRequest =
            serde_json::from_value(json!({"book_name": "x", "city": "Paris"})).unwrap();
        assert_eq!(request.name, None);
        assert_eq!(request.city.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_error_response_shape() {
        let value = serde_json::to_value(ErrorResponse::new("Book not found")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "Book not found"}));
    }

    #[test]
    fn test_book_response_omits_missing_message() {
        let response = BookResponse {
            success: true,
            message: None,
            book: Book {
                id: 1,
                title: "Clean Code".to_string(),
                year: Some(2008),
                isbn: None,
                author: AuthorSummary {
                    id: 3,
                    name: "Robert C. Martin".to_string(),
                },
                created_at: None,
            },
        };
        let value = serde_json::to_value(response).unwrap();
        assert!(value.get("message").is_none());
        assert_eq!(value["book"]["author"]["name"], "Robert C. Martin");
        assert!(value["book"]["isbn"].is_null());
    }
}
