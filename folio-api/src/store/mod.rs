//! Persistence for personal collections
//!
//! Stores are dumb persistence. Idempotency semantics, ownership checks and
//! validation monotonicity live in [`crate::service::CollectionService`].
//!
//! The one guarantee a store must give is atomic composite uniqueness: two
//! concurrent inserts for the same `(user_id, article_id)` resolve to a single
//! row, and the loser receives the winner's row back.

mod favorite;
mod program;

pub use favorite::SqliteFavoriteStore;
pub use program::SqliteProgramStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ArticleId, EntryId, FavoriteEntry, ProgramEntry, UserId};

/// Persistence failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be decoded into a domain value
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of an insert: the stored row and whether this call created it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inserted<T> {
    pub value: T,
    pub created: bool,
}

/// Per-user reading program entries
#[async_trait]
pub trait ProgramStore: Send + Sync {
    /// Insert `entry`, or return the existing entry for its (user, article) pair
    async fn insert(&self, entry: ProgramEntry) -> StoreResult<Inserted<ProgramEntry>>;

    /// Look an entry up by id, regardless of owner
    async fn find_by_id(&self, id: EntryId) -> StoreResult<Option<ProgramEntry>>;

    /// Look an entry up by its (user, article) pair
    async fn find_one(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> StoreResult<Option<ProgramEntry>>;

    /// All entries of a user, `created_at` ascending, ties in insertion order
    async fn find_by_owner(&self, user_id: UserId) -> StoreResult<Vec<ProgramEntry>>;

    /// Delete the entry if it exists and belongs to `user_id`
    async fn delete_by_owner_and_key(&self, user_id: UserId, id: EntryId) -> StoreResult<bool>;

    /// Set `validated = true`; returns the updated entry, or `None` if absent
    async fn mark_validated(&self, id: EntryId) -> StoreResult<Option<ProgramEntry>>;
}

/// Per-user favorite articles
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Insert `entry`, or return the existing favorite for its pair
    async fn insert(&self, entry: FavoriteEntry) -> StoreResult<Inserted<FavoriteEntry>>;

    async fn find_one(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> StoreResult<Option<FavoriteEntry>>;

    async fn find_by_owner(&self, user_id: UserId) -> StoreResult<Vec<FavoriteEntry>>;

    /// Delete the pair; `false` when it was not present
    async fn delete_by_owner_and_key(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> StoreResult<bool>;
}
