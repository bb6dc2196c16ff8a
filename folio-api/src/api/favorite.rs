//! Favorite endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use super::Actor;
use crate::error::ApiResult;
use crate::models::{ArticleId, UserId};
use crate::service::{ensure_owner, AddFavorite, FavoriteItem, RemoveFavorite};
use crate::AppState;

/// GET /api/user/:id/favorite
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<FavoriteItem>>> {
    let user_id = UserId(user_id);
    ensure_owner(actor, user_id, format!("favorites of user {}", user_id))?;

    Ok(Json(state.service.list_favorites(user_id).await?))
}

/// POST /api/article/:id/favorite
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(article_id): Path<i64>,
) -> ApiResult<Json<FavoriteItem>> {
    let item = state
        .service
        .add_favorite(AddFavorite {
            user_id: actor,
            article_id: ArticleId(article_id),
        })
        .await?;

    Ok(Json(item))
}

/// DELETE /api/article/:id/favorite
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(article_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .service
        .remove_favorite(RemoveFavorite {
            user_id: actor,
            article_id: ArticleId(article_id),
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/:id/favorite", get(list_favorites))
        .route(
            "/api/article/:id/favorite",
            post(add_favorite).delete(remove_favorite),
        )
}
