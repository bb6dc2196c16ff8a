//! Reading program endpoints
//!
//! The acting user always comes from the bearer token, never from the
//! request path or body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use super::Actor;
use crate::error::ApiResult;
use crate::models::{ArticleId, EntryId, UserId};
use crate::service::{
    ensure_owner, AddToProgram, ProgramItem, RemoveFromProgram, ValidateProgramEntry,
    ValidatedEntry,
};
use crate::AppState;

/// GET /api/user/:id/program
///
/// Only the owner may read a program.
pub async fn list_program(
    State(state): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<ProgramItem>>> {
    let user_id = UserId(user_id);
    ensure_owner(actor, user_id, format!("program of user {}", user_id))?;

    Ok(Json(state.service.list_program(user_id).await?))
}

/// POST /api/article/:id/program
pub async fn add_to_program(
    State(state): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(article_id): Path<i64>,
) -> ApiResult<Json<ProgramItem>> {
    let item = state
        .service
        .add_to_program(AddToProgram {
            user_id: actor,
            article_id: ArticleId(article_id),
        })
        .await?;

    Ok(Json(item))
}

/// DELETE /api/program/:id
pub async fn remove_from_program(
    State(state): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(entry_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .service
        .remove_from_program(RemoveFromProgram {
            user_id: actor,
            entry_id: EntryId(entry_id),
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/program/:id
///
/// Marks the entry as read.
pub async fn validate_program_entry(
    State(state): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(entry_id): Path<Uuid>,
) -> ApiResult<Json<ValidatedEntry>> {
    let validated = state
        .service
        .validate_program_entry(ValidateProgramEntry {
            user_id: actor,
            entry_id: EntryId(entry_id),
        })
        .await?;

    Ok(Json(validated))
}

pub fn program_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/:id/program", get(list_program))
        .route("/api/article/:id/program", post(add_to_program))
        .route(
            "/api/program/:id",
            patch(validate_program_entry).delete(remove_from_program),
        )
}
