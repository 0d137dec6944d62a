//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Parse a JSON request body. Unknown fields and malformed input are
/// rejected with `400`.
pub fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}

/// Parse a product identifier from a path segment.
pub fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Validation failed (uuid is expected): {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::CreateProduct;

    #[test]
    fn test_parse_json_rejects_unknown_fields() {
        let body = br#"{"title": "Tee", "gender": "men", "color": "red"}"#;
        let err = parse_json::<CreateProduct>(body).unwrap_err();
        assert_eq!(err.code(), "bad_request");
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("not-a-uuid"), Err(ApiError::BadRequest(_))));
    }
}
