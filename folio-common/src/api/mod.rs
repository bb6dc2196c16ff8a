//! Shared HTTP API functionality
//!
//! Pure functions and shared types only. The service crate wraps these with
//! axum middleware and extractors.

pub mod auth;
pub mod types;

pub use auth::{issue_token, sign, verify_token, TokenError};
pub use types::ErrorResponse;
