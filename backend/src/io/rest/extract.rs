use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::LibraryError;

/// Numeric record id taken from the `:id` path segment
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = LibraryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| LibraryError::validation("Invalid id"))?;
        raw.parse::<i64>()
            .map(RecordId)
            .map_err(|_| LibraryError::validation(format!("Invalid id: {}", raw)))
    }
}

/// JSON request body. An absent body, `null` or `{}` is rejected with
/// "No data provided" so every endpoint reports a missing payload the same way.
#[derive(Debug, Clone)]
pub struct JsonPayload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = LibraryError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| LibraryError::validation(rejection.body_text()))?;
        parse_payload(&bytes).map(JsonPayload)
    }
}

fn parse_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LibraryError> {
    let no_data = || LibraryError::validation("No data provided");

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }

    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| LibraryError::validation(format!("Invalid JSON: {}", e)))?;
    match &value {
        Value::Null => return Err(no_data()),
        Value::Object(fields) if fields.is_empty() => return Err(no_data()),
        Value::Object(_) => {}
        _ => return Err(LibraryError::validation("Request body must be a JSON object")),
    }

    serde_json::from_value(value).map_err(|e| LibraryError::validation(format!("Invalid request: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CreateBookRequest;

    fn message(result: Result<CreateBookRequest, LibraryError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_missing_payloads() {
        assert_eq!(message(parse_payload(b"")), "No data provided");
        assert_eq!(message(parse_payload(b"  \n")), "No data provided");
        assert_eq!(message(parse_payload(b"null")), "No data provided");
        assert_eq!(message(parse_payload(b"{}")), "No data provided");
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(message(parse_payload(b"{not json")).starts_with("Invalid JSON"));
        assert_eq!(message(parse_payload(b"[1, 2]")), "Request body must be a JSON object");
        assert!(message(parse_payload(br#"{"year": "soon"}"#)).starts_with("Invalid request"));
    }

    #[test]
    fn test_valid_payload() {
        let request: CreateBookRequest = parse_payload(br#"{"title": "T", "author_id": 1}"#).unwrap();
        assert_eq!(request.title.as_deref(), Some("T"));
        assert_eq!(request.author_id, Some(1));
        assert_eq!(request.year, None);
    }
}
