//! folio-api library interface
//!
//! Exposes the collection service, its stores and the HTTP router for
//! integration testing and embedding.

pub mod api;
pub mod catalog;
pub mod error;
pub mod identity;
pub mod logging;
pub mod memory;
pub mod models;
pub mod service;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::{ArticleCatalog, SqliteCatalog};
use crate::identity::TokenGate;
use crate::service::CollectionService;
use crate::store::{SqliteFavoriteStore, SqliteProgramStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: CollectionService,
    /// Catalog reads exposed on the public routes
    pub catalog: Arc<dyn ArticleCatalog>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: CollectionService, catalog: Arc<dyn ArticleCatalog>) -> Self {
        Self {
            service,
            catalog,
            startup_time: Utc::now(),
        }
    }

    /// Wire every collaborator to one SQLite pool
    pub fn from_pool(pool: SqlitePool, shared_secret: i64, token_ttl_secs: u64) -> Self {
        let catalog: Arc<dyn ArticleCatalog> = Arc::new(SqliteCatalog::new(pool.clone()));
        let service = CollectionService::new(
            Arc::new(SqliteProgramStore::new(pool.clone())),
            Arc::new(SqliteFavoriteStore::new(pool.clone())),
            catalog.clone(),
            Arc::new(TokenGate::new(pool, shared_secret, token_ttl_secs)),
        );
        Self::new(service, catalog)
    }
}

/// Build application router
///
/// Collection routes require a bearer token. Catalog reads and `/health` are
/// public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    let protected = Router::new()
        .merge(api::program_routes())
        .merge(api::favorite_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_actor,
        ));

    let public = Router::new()
        .merge(api::catalog_routes())
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
