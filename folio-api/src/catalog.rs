//! Article catalog access
//!
//! The collection service only reads the catalog: existence checks before an
//! add, and metadata for the joined list views. The public routes also list
//! articles overall and by category, label or author. Catalog writes happen
//! outside this crate.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;

use crate::models::{ArticleId, ArticleSummary, Category, Label, UserId};
use crate::store::StoreResult;

/// Ids bound per `IN (...)` query, well below SQLite's variable limit
const IDS_PER_QUERY: usize = 500;

/// Read-only catalog lookups
///
/// Article lists are ordered by article id. The filtered lists return `None`
/// when the category, label or author itself does not exist.
#[async_trait]
pub trait ArticleCatalog: Send + Sync {
    /// Article metadata, or `None` if the article does not exist
    async fn find_article(&self, id: ArticleId) -> StoreResult<Option<ArticleSummary>>;

    /// Batch lookup; ids that do not exist are simply absent from the map
    async fn find_articles(
        &self,
        ids: &[ArticleId],
    ) -> StoreResult<HashMap<ArticleId, ArticleSummary>>;

    async fn list_articles(&self) -> StoreResult<Vec<ArticleSummary>>;

    async fn find_by_category(&self, category_id: i64)
        -> StoreResult<Option<Vec<ArticleSummary>>>;

    async fn find_by_label(&self, label_id: i64) -> StoreResult<Option<Vec<ArticleSummary>>>;

    async fn find_by_author(&self, author: UserId) -> StoreResult<Option<Vec<ArticleSummary>>>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn list_labels(&self) -> StoreResult<Vec<Label>>;
}

/// Catalog backed by the `articles`, `categories` and `labels` tables
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load one chunk of ids into `articles`, labels included
    async fn load_chunk(
        &self,
        ids: &[ArticleId],
        articles: &mut HashMap<ArticleId, ArticleSummary>,
    ) -> StoreResult<()> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT a.id, a.title, c.id AS category_id, c.name AS category_name
            FROM articles a
            LEFT JOIN categories c ON c.id = a.category_id
            WHERE a.id IN (
            "#,
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.0);
        }
        separated.push_unseparated(")");

        let rows = query.build().fetch_all(&self.pool).await?;
        if rows.is_empty() {
            return Ok(());
        }

        for row in rows {
            let id = ArticleId(row.try_get("id")?);
            let category = match row.try_get::<Option<i64>, _>("category_id")? {
                Some(category_id) => Some(Category {
                    id: category_id,
                    name: row.try_get("category_name")?,
                }),
                None => None,
            };

            articles.insert(
                id,
                ArticleSummary {
                    id,
                    title: row.try_get("title")?,
                    category,
                    labels: Vec::new(),
                },
            );
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT al.article_id, l.id, l.name
            FROM article_labels al
            JOIN labels l ON l.id = al.label_id
            WHERE al.article_id IN (
            "#,
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.0);
        }
        separated.push_unseparated(") ORDER BY l.name ASC");

        for row in query.build().fetch_all(&self.pool).await? {
            let article_id = ArticleId(row.try_get("article_id")?);
            if let Some(article) = articles.get_mut(&article_id) {
                article.labels.push(Label {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                });
            }
        }

        Ok(())
    }

    /// Article ids selected by `sql`, which yields an `id` column
    async fn article_ids(&self, sql: &str, bind: Option<i64>) -> StoreResult<Vec<ArticleId>> {
        let mut query = sqlx::query_scalar::<Sqlite, i64>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }

        Ok(query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ArticleId)
            .collect())
    }

    /// Summaries for `ids`, keeping their order
    async fn summaries(&self, ids: Vec<ArticleId>) -> StoreResult<Vec<ArticleSummary>> {
        let mut found = self.find_articles(&ids).await?;
        Ok(ids.into_iter().filter_map(|id| found.remove(&id)).collect())
    }

    async fn exists(&self, sql: &str, id: i64) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Articles matching a filter whose owner row is checked first
    async fn filtered(
        &self,
        owner_sql: &str,
        ids_sql: &str,
        id: i64,
    ) -> StoreResult<Option<Vec<ArticleSummary>>> {
        if !self.exists(owner_sql, id).await? {
            return Ok(None);
        }

        let ids = self.article_ids(ids_sql, Some(id)).await?;
        Ok(Some(self.summaries(ids).await?))
    }
}

#[async_trait]
impl ArticleCatalog for SqliteCatalog {
    async fn find_article(&self, id: ArticleId) -> StoreResult<Option<ArticleSummary>> {
        let mut found = self.find_articles(&[id]).await?;
        Ok(found.remove(&id))
    }

    async fn find_articles(
        &self,
        ids: &[ArticleId],
    ) -> StoreResult<HashMap<ArticleId, ArticleSummary>> {
        let mut articles = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(IDS_PER_QUERY) {
            self.load_chunk(chunk, &mut articles).await?;
        }
        Ok(articles)
    }

    async fn list_articles(&self) -> StoreResult<Vec<ArticleSummary>> {
        let ids = self
            .article_ids("SELECT id FROM articles ORDER BY id ASC", None)
            .await?;
        self.summaries(ids).await
    }

    async fn find_by_category(
        &self,
        category_id: i64,
    ) -> StoreResult<Option<Vec<ArticleSummary>>> {
        self.filtered(
            "SELECT id FROM categories WHERE id = ?",
            "SELECT id FROM articles WHERE category_id = ? ORDER BY id ASC",
            category_id,
        )
        .await
    }

    async fn find_by_label(&self, label_id: i64) -> StoreResult<Option<Vec<ArticleSummary>>> {
        self.filtered(
            "SELECT id FROM labels WHERE id = ?",
            "SELECT article_id AS id FROM article_labels WHERE label_id = ? ORDER BY article_id ASC",
            label_id,
        )
        .await
    }

    async fn find_by_author(&self, author: UserId) -> StoreResult<Option<Vec<ArticleSummary>>> {
        self.filtered(
            "SELECT id FROM users WHERE id = ?",
            "SELECT id FROM articles WHERE author_id = ? ORDER BY id ASC",
            author.0,
        )
        .await
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> StoreResult<Category> {
                Ok(Category {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect()
    }

    async fn list_labels(&self) -> StoreResult<Vec<Label>> {
        let rows = sqlx::query("SELECT id, name FROM labels ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> StoreResult<Label> {
                Ok(Label {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect()
    }
}
