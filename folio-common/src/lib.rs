//! # Folio Common Library
//!
//! Shared code for the Folio services including:
//! - Error types
//! - Bootstrap configuration and root folder resolution
//! - Database initialization and schema
//! - Shared-secret and bearer token primitives
//! - API error response types

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
