//! SQLite program store
//!
//! Uniqueness comes from `UNIQUE(user_id, article_id)` on the `program` table.
//! Insert and read-back run in one transaction: the INSERT takes SQLite's
//! write lock even when the conflict clause turns it into a no-op, so no
//! concurrent delete can slip in before the read-back.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{Inserted, ProgramStore, StoreError, StoreResult};
use crate::models::{ArticleId, EntryId, ProgramEntry, UserId};
use folio_common::time::from_millis;

const SELECT_COLUMNS: &str = "SELECT id, user_id, article_id, validated, created_at FROM program";

#[derive(Clone)]
pub struct SqliteProgramStore {
    pool: SqlitePool,
}

impl SqliteProgramStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn entry_from_row(row: &SqliteRow) -> StoreResult<ProgramEntry> {
    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| StoreError::Corrupt(format!("program.id '{}': {}", id, e)))?;

    Ok(ProgramEntry {
        id: EntryId(id),
        user_id: UserId(row.try_get("user_id")?),
        article_id: ArticleId(row.try_get("article_id")?),
        validated: row.try_get::<i64, _>("validated")? != 0,
        created_at: from_millis(row.try_get("created_at")?),
    })
}

#[async_trait]
impl ProgramStore for SqliteProgramStore {
    async fn insert(&self, entry: ProgramEntry) -> StoreResult<Inserted<ProgramEntry>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO program (id, user_id, article_id, validated, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, article_id) DO NOTHING
            "#,
        )
        .bind(entry.id.0.to_string())
        .bind(entry.user_id.0)
        .bind(entry.article_id.0)
        .bind(entry.validated)
        .bind(entry.created_at.timestamp_millis())
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(&format!("{} WHERE user_id = ? AND article_id = ?", SELECT_COLUMNS))
            .bind(entry.user_id.0)
            .bind(entry.article_id.0)
            .fetch_one(&mut *tx)
            .await?;
        let stored = entry_from_row(&row)?;

        tx.commit().await?;

        Ok(Inserted {
            value: stored,
            created: result.rows_affected() == 1,
        })
    }

    async fn find_by_id(&self, id: EntryId) -> StoreResult<Option<ProgramEntry>> {
        sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.0.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(|row| entry_from_row(&row))
            .transpose()
    }

    async fn find_one(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> StoreResult<Option<ProgramEntry>> {
        sqlx::query(&format!("{} WHERE user_id = ? AND article_id = ?", SELECT_COLUMNS))
            .bind(user_id.0)
            .bind(article_id.0)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| entry_from_row(&row))
            .transpose()
    }

    async fn find_by_owner(&self, user_id: UserId) -> StoreResult<Vec<ProgramEntry>> {
        // rowid breaks created_at ties in insertion order
        let rows = sqlx::query(&format!(
            "{} WHERE user_id = ? ORDER BY created_at ASC, rowid ASC",
            SELECT_COLUMNS
        ))
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn delete_by_owner_and_key(&self, user_id: UserId, id: EntryId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM program WHERE id = ? AND user_id = ?")
            .bind(id.0.to_string())
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_validated(&self, id: EntryId) -> StoreResult<Option<ProgramEntry>> {
        sqlx::query(
            r#"
            UPDATE program SET validated = 1 WHERE id = ?
            RETURNING id, user_id, article_id, validated, created_at
            "#,
        )
        .bind(id.0.to_string())
        .fetch_optional(&self.pool)
        .await?
        .map(|row| entry_from_row(&row))
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn setup() -> SqliteProgramStore {
        let pool = folio_common::db::init_in_memory().await.unwrap();
        sqlx::query("INSERT INTO users (id, username) VALUES (1, 'ada'), (2, 'brian')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO articles (id, title) VALUES (7, 'Seven'), (8, 'Eight'), (9, 'Nine')")
            .execute(&pool)
            .await
            .unwrap();
        SqliteProgramStore::new(pool)
    }

    #[tokio::test]
    async fn test_insert_then_duplicate_returns_existing() {
        let store = setup().await;
        let first = store.insert(ProgramEntry::new(UserId(1), ArticleId(7))).await.unwrap();
        let second = store.insert(ProgramEntry::new(UserId(1), ArticleId(7))).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.value, second.value);
        assert_eq!(store.find_by_owner(UserId(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_fields() {
        let store = setup().await;
        let entry = ProgramEntry::new(UserId(2), ArticleId(8));
        store.insert(entry.clone()).await.unwrap();

        assert_eq!(store.find_by_id(entry.id).await.unwrap(), Some(entry.clone()));
        assert_eq!(store.find_one(UserId(2), ArticleId(8)).await.unwrap(), Some(entry));
        assert_eq!(store.find_one(UserId(1), ArticleId(8)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_by_owner_orders_by_creation() {
        let store = setup().await;
        let base = ProgramEntry::new(UserId(1), ArticleId(9));
        let mut newest = base.clone();
        let mut oldest = ProgramEntry::new(UserId(1), ArticleId(7));
        let mut middle = ProgramEntry::new(UserId(1), ArticleId(8));
        oldest.created_at = base.created_at - Duration::seconds(20);
        middle.created_at = base.created_at - Duration::seconds(10);
        newest.created_at = base.created_at;

        // Inserted out of chronological order
        store.insert(newest.clone()).await.unwrap();
        store.insert(oldest.clone()).await.unwrap();
        store.insert(middle.clone()).await.unwrap();

        let ids: Vec<EntryId> = store
            .find_by_owner(UserId(1))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![oldest.id, middle.id, newest.id]);
    }

    #[tokio::test]
    async fn test_delete_requires_matching_owner() {
        let store = setup().await;
        let entry = store
            .insert(ProgramEntry::new(UserId(1), ArticleId(7)))
            .await
            .unwrap()
            .value;

        assert!(!store.delete_by_owner_and_key(UserId(2), entry.id).await.unwrap());
        assert!(store.find_by_id(entry.id).await.unwrap().is_some());

        assert!(store.delete_by_owner_and_key(UserId(1), entry.id).await.unwrap());
        assert!(store.find_by_id(entry.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_validated() {
        let store = setup().await;
        let entry = store
            .insert(ProgramEntry::new(UserId(1), ArticleId(7)))
            .await
            .unwrap()
            .value;

        let updated = store.mark_validated(entry.id).await.unwrap().unwrap();
        assert!(updated.validated);
        assert_eq!(updated.created_at, entry.created_at);

        assert!(store.mark_validated(EntryId::generate()).await.unwrap().is_none());
    }
}
