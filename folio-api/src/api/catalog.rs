//! Public catalog reads

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::models::{ArticleId, ArticleSummary, Category, Label, UserId};
use crate::AppState;

/// GET /api/article/:id
pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> ApiResult<Json<ArticleSummary>> {
    state
        .catalog
        .find_article(ArticleId(article_id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Article {} not found", article_id)))
}

/// GET /api/articles
pub async fn list_articles(State(state): State<AppState>) -> ApiResult<Json<Vec<ArticleSummary>>> {
    Ok(Json(state.catalog.list_articles().await?))
}

/// GET /api/category/:id
pub async fn articles_in_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> ApiResult<Json<Vec<ArticleSummary>>> {
    state
        .catalog
        .find_by_category(category_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", category_id)))
}

/// GET /api/labels/:id/articles
pub async fn articles_with_label(
    State(state): State<AppState>,
    Path(label_id): Path<i64>,
) -> ApiResult<Json<Vec<ArticleSummary>>> {
    state
        .catalog
        .find_by_label(label_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Label {} not found", label_id)))
}

/// GET /api/user/:id/articles
pub async fn articles_by_author(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<ArticleSummary>>> {
    state
        .catalog
        .find_by_author(UserId(user_id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog.list_categories().await?))
}

/// GET /api/labels
pub async fn list_labels(State(state): State<AppState>) -> ApiResult<Json<Vec<Label>>> {
    Ok(Json(state.catalog.list_labels().await?))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/article/:id", get(get_article))
        .route("/api/articles", get(list_articles))
        .route("/api/category/:id", get(articles_in_category))
        .route("/api/categories", get(list_categories))
        .route("/api/labels", get(list_labels))
        .route("/api/labels/:id/articles", get(articles_with_label))
        .route("/api/user/:id/articles", get(articles_by_author))
}
