//! Bearer token primitives
//!
//! # Token format
//!
//! `<user_id>.<issued_at_ms>.<signature>` where the signature is the SHA-256
//! (64 lowercase hex chars) of `"<user_id>.<issued_at_ms>"` immediately
//! followed by the shared secret as a decimal i64 string.
//!
//! - Tokens expire `ttl_ms` after `issued_at_ms`
//! - Tokens issued more than [`MAX_CLOCK_SKEW_MS`] in the future are rejected
//! - The shared secret is stored in the database settings table
//!
//! # Pure Functions
//!
//! Apart from the shared-secret helpers this module has no I/O and no HTTP
//! framework dependencies; the service wraps it in axum middleware.

use sha2::{Digest, Sha256};

#[cfg(feature = "sqlx")]
use sqlx::SqlitePool;

/// Settings key holding the token signing secret
pub const SHARED_SECRET_KEY: &str = "api_shared_secret";

/// Tolerated clock drift for tokens issued "in the future"
pub const MAX_CLOCK_SKEW_MS: i64 = 1000;

// ========================================
// Error Types
// ========================================

/// Token validation and secret loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token does not have the `user.issued.signature` shape
    Malformed(String),

    /// Signature does not match the calculated value
    InvalidSignature,

    /// Token older than its time-to-live
    Expired { issued_at: i64, now: i64 },

    /// Token issued later than the allowed clock skew
    IssuedInFuture { issued_at: i64, now: i64 },

    /// Database error loading the shared secret
    DatabaseError(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Malformed(reason) => write!(f, "Malformed token: {}", reason),
            TokenError::InvalidSignature => write!(f, "Invalid token signature"),
            TokenError::Expired { issued_at, now } => {
                write!(f, "Token expired (issued {}ms ago)", now - issued_at)
            }
            TokenError::IssuedInFuture { issued_at, now } => {
                write!(f, "Token issued {}ms in the future", issued_at - now)
            }
            TokenError::DatabaseError(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for TokenError {}

// ========================================
// Shared Secret Management
// ========================================

/// Load the token signing secret, generating it on first use
#[cfg(feature = "sqlx")]
pub async fn load_shared_secret(db: &SqlitePool) -> Result<i64, TokenError> {
    let result: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(SHARED_SECRET_KEY)
        .fetch_optional(db)
        .await
        .map_err(|e| TokenError::DatabaseError(e.to_string()))?;

    match result {
        Some((value,)) => value
            .parse::<i64>()
            .map_err(|e| TokenError::DatabaseError(format!("Invalid i64: {}", e))),
        None => initialize_shared_secret(db).await,
    }
}

/// Generate and store a random non-zero secret
///
/// Uses `INSERT OR IGNORE` followed by a read-back, so two processes racing on
/// first start agree on a single secret.
#[cfg(feature = "sqlx")]
pub async fn initialize_shared_secret(db: &SqlitePool) -> Result<i64, TokenError> {
    use rand::Rng;

    let secret: i64 = {
        let mut rng = rand::thread_rng();
        loop {
            let val = rng.gen::<i64>();
            if val != 0 {
                break val;
            }
        }
    };

    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(SHARED_SECRET_KEY)
        .bind(secret.to_string())
        .execute(db)
        .await
        .map_err(|e| TokenError::DatabaseError(e.to_string()))?;

    let (stored,): (String,) = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(SHARED_SECRET_KEY)
        .fetch_one(db)
        .await
        .map_err(|e| TokenError::DatabaseError(e.to_string()))?;

    stored
        .parse::<i64>()
        .map_err(|e| TokenError::DatabaseError(format!("Invalid i64: {}", e)))
}

// ========================================
// Signing
// ========================================

/// Calculate the token signature
///
/// # Examples
///
/// ```
/// use folio_common::api::auth::sign;
///
/// let signature = sign(42, 1730000000000, 123456789);
/// assert_eq!(signature.len(), 64);
/// assert_ne!(signature, sign(42, 1730000000000, 987654321));
/// ```
pub fn sign(user_id: i64, issued_at_ms: i64, shared_secret: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}.{}{}", user_id, issued_at_ms, shared_secret).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build a bearer token for `user_id`
///
/// # Examples
///
/// ```
/// use folio_common::api::auth::{issue_token, verify_token};
///
/// let token = issue_token(42, 1730000000000, 123456789);
/// let user = verify_token(&token, 123456789, 1730000000500, 60_000).unwrap();
/// assert_eq!(user, 42);
/// ```
pub fn issue_token(user_id: i64, issued_at_ms: i64, shared_secret: i64) -> String {
    format!(
        "{}.{}.{}",
        user_id,
        issued_at_ms,
        sign(user_id, issued_at_ms, shared_secret)
    )
}

/// Verify a bearer token and return the user id it was issued for
pub fn verify_token(
    token: &str,
    shared_secret: i64,
    now_ms: i64,
    ttl_ms: i64,
) -> Result<i64, TokenError> {
    let mut parts = token.trim().splitn(3, '.');
    let (user_part, issued_part, signature) = match (parts.next(), parts.next(), parts.next()) {
        (Some(u), Some(i), Some(s)) => (u, i, s),
        _ => return Err(TokenError::Malformed("expected three dot-separated parts".into())),
    };

    let user_id: i64 = user_part
        .parse()
        .map_err(|_| TokenError::Malformed(format!("bad user id '{}'", user_part)))?;
    let issued_at: i64 = issued_part
        .parse()
        .map_err(|_| TokenError::Malformed(format!("bad timestamp '{}'", issued_part)))?;

    let expected = sign(user_id, issued_at, shared_secret);
    if !constant_time_eq(signature.as_bytes(), expected.as_bytes()) {
        return Err(TokenError::InvalidSignature);
    }

    if issued_at - now_ms > MAX_CLOCK_SKEW_MS {
        return Err(TokenError::IssuedInFuture {
            issued_at,
            now: now_ms,
        });
    }

    if now_ms.saturating_sub(issued_at) > ttl_ms {
        return Err(TokenError::Expired {
            issued_at,
            now: now_ms,
        });
    }

    Ok(user_id)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ========================================
// Tests
// ========================================
