//! Error types for folio-api
//!
//! [`CollectionError`] is the collection service's taxonomy. [`ApiError`] is
//! its HTTP rendering.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use folio_common::api::types::ErrorResponse;
use std::fmt;
use thiserror::Error;

use crate::identity::GateError;
use crate::models::{ArticleId, EntryId, UserId};
use crate::store::StoreError;

/// What a `NotFound` refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    User(UserId),
    Article(ArticleId),
    Entry(EntryId),
    Favorite {
        user_id: UserId,
        article_id: ArticleId,
    },
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::User(id) => write!(f, "User {}", id),
            Missing::Article(id) => write!(f, "Article {}", id),
            Missing::Entry(id) => write!(f, "Program entry {}", id),
            Missing::Favorite {
                user_id,
                article_id,
            } => write!(f, "Favorite (user {}, article {})", user_id, article_id),
        }
    }
}

/// Collection service errors
///
/// All kinds are terminal for the request; nothing is retried internally.
/// Duplicate adds are absorbed, so there is no conflict kind.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Identity gate rejected the credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0} not found")]
    NotFound(Missing),

    /// Acting user does not own the targeted item
    #[error("User {actor} may not access {resource}")]
    Forbidden { actor: UserId, resource: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<GateError> for CollectionError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Unauthorized(reason) => CollectionError::Unauthorized(reason),
            GateError::Store(err) => CollectionError::Store(err),
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or rejected credential (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Ownership mismatch (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<CollectionError> for ApiError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::Unauthorized(reason) => ApiError::Unauthorized(reason),
            CollectionError::NotFound(missing) => ApiError::NotFound(format!("{} not found", missing)),
            err @ CollectionError::Forbidden { .. } => ApiError::Forbidden(err.to_string()),
            CollectionError::Store(err) => {
                tracing::error!("Storage failure: {}", err);
                ApiError::Internal("Storage failure".to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        CollectionError::Store(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(ErrorResponse::new(error_code, message));

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_errors_map_to_status() {
        let cases = [
            (CollectionError::Unauthorized("bad".into()), StatusCode::UNAUTHORIZED),
            (
                CollectionError::NotFound(Missing::Article(ArticleId(7))),
                StatusCode::NOT_FOUND,
            ),
            (
                CollectionError::Forbidden {
                    actor: UserId(2),
                    resource: "program entry".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                CollectionError::Store(StoreError::Corrupt("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = ApiError::Unauthorized("missing".into()).into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_missing_display() {
        let missing = Missing::Favorite {
            user_id: UserId(1),
            article_id: ArticleId(3),
        };
        assert_eq!(
            CollectionError::NotFound(missing).to_string(),
            "Favorite (user 1, article 3) not found"
        );
    }
}
