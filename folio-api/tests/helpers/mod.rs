//! Shared fixtures for folio-api integration tests
#![allow(dead_code)]

pub mod log_capture;

use axum::body::Body;
use axum::http::{header, Request};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;

use folio_api::{build_router, AppState};
use folio_common::api::auth::{issue_token, load_shared_secret};
use folio_common::time::now_millis;

pub const TOKEN_TTL_SECS: u64 = 3600;

/// File-backed database seeded with a small catalog
///
/// Users 1 (ada) and 2 (brian). Articles 3, 7, 8 and 9; article 3 is in
/// category "Science" with labels "beginner" and "long-read", article 7 is in
/// "Art". Ada wrote articles 3 and 7.
pub struct TestDb {
    pub pool: SqlitePool,
    pub shared_secret: i64,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let pool = folio_common::db::init_database(&dir.path().join("folio.db"))
            .await
            .unwrap();

        for statement in [
            "INSERT INTO users (id, username) VALUES (1, 'ada'), (2, 'brian')",
            "INSERT INTO categories (id, name) VALUES (1, 'Science'), (2, 'Art')",
            "INSERT INTO labels (id, name) VALUES (10, 'long-read'), (11, 'beginner')",
            "INSERT INTO articles (id, title, category_id, author_id) VALUES \
             (3, 'Quarks', 1, 1), (7, 'Seven', 2, 1), (8, 'Eight', NULL, NULL), \
             (9, 'Nine', NULL, NULL)",
            "INSERT INTO article_labels (article_id, label_id) VALUES (3, 10), (3, 11)",
        ] {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }

        let shared_secret = load_shared_secret(&pool).await.unwrap();

        Self {
            pool,
            shared_secret,
            _dir: dir,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::from_pool(self.pool.clone(), self.shared_secret, TOKEN_TTL_SECS)
    }

    pub fn app(&self) -> axum::Router {
        build_router(self.state())
    }

    pub fn token(&self, user_id: i64) -> String {
        issue_token(user_id, now_millis(), self.shared_secret)
    }
}

/// Request without credentials
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Request carrying `Authorization: Bearer <token>`
pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
