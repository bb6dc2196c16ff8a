//! HTTP API handlers for folio-api

pub mod auth;
pub mod catalog;
pub mod favorite;
pub mod health;
pub mod program;

pub use auth::{require_actor, Actor};
pub use catalog::catalog_routes;
pub use favorite::favorite_routes;
pub use health::health_routes;
pub use program::program_routes;
