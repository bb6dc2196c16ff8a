//! SQLite favorite store
//!
//! `(user_id, article_id)` is the table's primary key; inserts use the same
//! insert-then-read-back transaction as the program store.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{FavoriteStore, Inserted, StoreResult};
use crate::models::{ArticleId, FavoriteEntry, UserId};
use folio_common::time::from_millis;

#[derive(Clone)]
pub struct SqliteFavoriteStore {
    pool: SqlitePool,
}

impl SqliteFavoriteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn favorite_from_row(row: &SqliteRow) -> StoreResult<FavoriteEntry> {
    Ok(FavoriteEntry {
        user_id: UserId(row.try_get("user_id")?),
        article_id: ArticleId(row.try_get("article_id")?),
        created_at: from_millis(row.try_get("created_at")?),
    })
}

#[async_trait]
impl FavoriteStore for SqliteFavoriteStore {
    async fn insert(&self, entry: FavoriteEntry) -> StoreResult<Inserted<FavoriteEntry>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, article_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, article_id) DO NOTHING
            "#,
        )
        .bind(entry.user_id.0)
        .bind(entry.article_id.0)
        .bind(entry.created_at.timestamp_millis())
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(
            "SELECT user_id, article_id, created_at FROM favorites WHERE user_id = ? AND article_id = ?",
        )
        .bind(entry.user_id.0)
        .bind(entry.article_id.0)
        .fetch_one(&mut *tx)
        .await?;
        let stored = favorite_from_row(&row)?;

        tx.commit().await?;

        Ok(Inserted {
            value: stored,
            created: result.rows_affected() == 1,
        })
    }

    async fn find_one(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> StoreResult<Option<FavoriteEntry>> {
        sqlx::query(
            "SELECT user_id, article_id, created_at FROM favorites WHERE user_id = ? AND article_id = ?",
        )
        .bind(user_id.0)
        .bind(article_id.0)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| favorite_from_row(&row))
        .transpose()
    }

    async fn find_by_owner(&self, user_id: UserId) -> StoreResult<Vec<FavoriteEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, article_id, created_at FROM favorites
            WHERE user_id = ?
            ORDER BY created_at ASC, article_id ASC
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(favorite_from_row).collect()
    }

    async fn delete_by_owner_and_key(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND article_id = ?")
            .bind(user_id.0)
            .bind(article_id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
