//! Identity gate
//!
//! Turns a bearer credential into the acting user's id. The collection
//! service trusts that id for every ownership decision, so the gate only ever
//! yields ids of users that exist.

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use crate::models::UserId;
use crate::store::StoreError;
use folio_common::api::auth::verify_token;

#[derive(Debug, Error)]
pub enum GateError {
    /// Credential rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[async_trait]
pub trait IdentityGate: Send + Sync {
    /// Verify a bearer credential and return the authenticated user
    async fn authenticate(&self, credential: &str) -> Result<UserId, GateError>;

    /// Whether `user_id` names an existing user
    async fn user_exists(&self, user_id: UserId) -> Result<bool, GateError>;
}

/// Gate verifying signed bearer tokens against the `users` table
#[derive(Clone)]
pub struct TokenGate {
    pool: SqlitePool,
    shared_secret: i64,
    ttl_ms: i64,
}

impl TokenGate {
    pub fn new(pool: SqlitePool, shared_secret: i64, ttl_secs: u64) -> Self {
        Self {
            pool,
            shared_secret,
            ttl_ms: i64::try_from(ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX),
        }
    }
}

#[async_trait]
impl IdentityGate for TokenGate {
    async fn authenticate(&self, credential: &str) -> Result<UserId, GateError> {
        let user_id = verify_token(
            credential,
            self.shared_secret,
            folio_common::time::now_millis(),
            self.ttl_ms,
        )
        .map(UserId)
        .map_err(|e| GateError::Unauthorized(e.to_string()))?;

        if !self.user_exists(user_id).await? {
            debug!("Token for unknown user {} rejected", user_id);
            return Err(GateError::Unauthorized(format!("Unknown user {}", user_id)));
        }

        Ok(user_id)
    }

    async fn user_exists(&self, user_id: UserId) -> Result<bool, GateError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(found.is_some())
    }
}
