//! Shared API response types

use serde::{Deserialize, Serialize};

/// JSON error body returned by every Folio endpoint
///
/// # Examples
///
/// ```
/// use folio_common::api::types::ErrorResponse;
///
/// let body = ErrorResponse::new("NOT_FOUND", "Article not found: 7");
/// let json = serde_json::to_string(&body).unwrap();
/// assert_eq!(json, r#"{"error":{"code":"NOT_FOUND","message":"Article not found: 7"}}"#);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error code and human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable machine-readable identifier (e.g. `FORBIDDEN`)
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}
