//! In-memory collaborators
//!
//! Stores keep check-and-insert under a single lock acquisition, which gives
//! the same composite uniqueness as the SQLite constraint. Useful for tests
//! and for embedding the service without a database.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::Mutex;

use crate::catalog::ArticleCatalog;
use crate::identity::{GateError, IdentityGate};
use crate::models::{
    ArticleId, ArticleSummary, Category, EntryId, FavoriteEntry, Label, ProgramEntry, UserId,
};
use crate::store::{FavoriteStore, Inserted, ProgramStore, StoreResult};

/// Program store over a vector kept in insertion order
#[derive(Default)]
pub struct MemoryProgramStore {
    entries: Mutex<Vec<ProgramEntry>>,
}

impl MemoryProgramStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgramStore for MemoryProgramStore {
    async fn insert(&self, entry: ProgramEntry) -> StoreResult<Inserted<ProgramEntry>> {
        let mut entries = self.entries.lock().await;

        if let Some(existing) = entries
            .iter()
            .find(|e| e.user_id == entry.user_id && e.article_id == entry.article_id)
        {
            return Ok(Inserted {
                value: existing.clone(),
                created: false,
            });
        }

        entries.push(entry.clone());
        Ok(Inserted {
            value: entry,
            created: true,
        })
    }

    async fn find_by_id(&self, id: EntryId) -> StoreResult<Option<ProgramEntry>> {
        let entries = self.entries.lock().await;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn find_one(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> StoreResult<Option<ProgramEntry>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .find(|e| e.user_id == user_id && e.article_id == article_id)
            .cloned())
    }

    async fn find_by_owner(&self, user_id: UserId) -> StoreResult<Vec<ProgramEntry>> {
        let entries = self.entries.lock().await;
        let mut owned: Vec<ProgramEntry> = entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal timestamps
        owned.sort_by_key(|e| e.created_at);
        Ok(owned)
    }

    async fn delete_by_owner_and_key(&self, user_id: UserId, id: EntryId) -> StoreResult<bool> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(entries.len() != before)
    }

    async fn mark_validated(&self, id: EntryId) -> StoreResult<Option<ProgramEntry>> {
        let mut entries = self.entries.lock().await;
        Ok(entries.iter_mut().find(|e| e.id == id).map(|entry| {
            entry.validated = true;
            entry.clone()
        }))
    }
}

/// Favorite store keyed by (user, article)
#[derive(Default)]
pub struct MemoryFavoriteStore {
    favorites: Mutex<HashMap<(UserId, ArticleId), FavoriteEntry>>,
}

impl MemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn insert(&self, entry: FavoriteEntry) -> StoreResult<Inserted<FavoriteEntry>> {
        let mut favorites = self.favorites.lock().await;
        let key = (entry.user_id, entry.article_id);

        if let Some(existing) = favorites.get(&key) {
            return Ok(Inserted {
                value: existing.clone(),
                created: false,
            });
        }

        favorites.insert(key, entry.clone());
        Ok(Inserted {
            value: entry,
            created: true,
        })
    }

    async fn find_one(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> StoreResult<Option<FavoriteEntry>> {
        let favorites = self.favorites.lock().await;
        Ok(favorites.get(&(user_id, article_id)).cloned())
    }

    async fn find_by_owner(&self, user_id: UserId) -> StoreResult<Vec<FavoriteEntry>> {
        let favorites = self.favorites.lock().await;
        let mut owned: Vec<FavoriteEntry> = favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|f| (f.created_at, f.article_id));
        Ok(owned)
    }

    async fn delete_by_owner_and_key(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> StoreResult<bool> {
        let mut favorites = self.favorites.lock().await;
        Ok(favorites.remove(&(user_id, article_id)).is_some())
    }
}

/// Fixed catalog
///
/// Categories and labels are registered alongside the articles that carry
/// them; authors are registered with [`MemoryCatalog::with_author`].
#[derive(Default)]
pub struct MemoryCatalog {
    articles: BTreeMap<ArticleId, ArticleSummary>,
    categories: BTreeMap<i64, Category>,
    labels: BTreeMap<i64, Label>,
    authors: HashMap<ArticleId, UserId>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an uncategorized, unlabeled article
    pub fn with_article(self, id: i64, title: &str) -> Self {
        let id = ArticleId(id);
        self.with_summary(ArticleSummary {
            id,
            title: title.to_string(),
            category: None,
            labels: Vec::new(),
        })
    }

    pub fn with_summary(mut self, summary: ArticleSummary) -> Self {
        if let Some(category) = &summary.category {
            self.categories.insert(category.id, category.clone());
        }
        for label in &summary.labels {
            self.labels.insert(label.id, label.clone());
        }
        self.articles.insert(summary.id, summary);
        self
    }

    pub fn with_author(mut self, article_id: i64, author: i64) -> Self {
        self.authors.insert(ArticleId(article_id), UserId(author));
        self
    }

    fn matching(&self, keep: impl Fn(&ArticleSummary) -> bool) -> Vec<ArticleSummary> {
        self.articles.values().filter(|a| keep(a)).cloned().collect()
    }
}

#[async_trait]
impl ArticleCatalog for MemoryCatalog {
    async fn find_article(&self, id: ArticleId) -> StoreResult<Option<ArticleSummary>> {
        Ok(self.articles.get(&id).cloned())
    }

    async fn find_articles(
        &self,
        ids: &[ArticleId],
    ) -> StoreResult<HashMap<ArticleId, ArticleSummary>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.articles.get(id).map(|a| (*id, a.clone())))
            .collect())
    }

    async fn list_articles(&self) -> StoreResult<Vec<ArticleSummary>> {
        Ok(self.articles.values().cloned().collect())
    }

    async fn find_by_category(
        &self,
        category_id: i64,
    ) -> StoreResult<Option<Vec<ArticleSummary>>> {
        if !self.categories.contains_key(&category_id) {
            return Ok(None);
        }
        Ok(Some(self.matching(|a| {
            a.category.as_ref().map(|c| c.id) == Some(category_id)
        })))
    }

    async fn find_by_label(&self, label_id: i64) -> StoreResult<Option<Vec<ArticleSummary>>> {
        if !self.labels.contains_key(&label_id) {
            return Ok(None);
        }
        Ok(Some(self.matching(|a| a.labels.iter().any(|l| l.id == label_id))))
    }

    async fn find_by_author(&self, author: UserId) -> StoreResult<Option<Vec<ArticleSummary>>> {
        if !self.authors.values().any(|a| *a == author) {
            return Ok(None);
        }
        Ok(Some(self.matching(|a| self.authors.get(&a.id) == Some(&author))))
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let mut categories: Vec<Category> = self.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_labels(&self) -> StoreResult<Vec<Label>> {
        let mut labels: Vec<Label> = self.labels.values().cloned().collect();
        labels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(labels)
    }
}

/// Identity gate with fixed credentials
///
/// Each credential maps to a user; every mapped user exists, and further
/// users may be registered without a credential.
#[derive(Default)]
pub struct StaticGate {
    credentials: HashMap<String, UserId>,
    users: HashSet<UserId>,
}

impl StaticGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, credential: &str, user_id: i64) -> Self {
        self.credentials.insert(credential.to_string(), UserId(user_id));
        self.users.insert(UserId(user_id));
        self
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.users.insert(UserId(user_id));
        self
    }
}

#[async_trait]
impl IdentityGate for StaticGate {
    async fn authenticate(&self, credential: &str) -> Result<UserId, GateError> {
        self.credentials
            .get(credential)
            .copied()
            .ok_or_else(|| GateError::Unauthorized("Unknown credential".to_string()))
    }

    async fn user_exists(&self, user_id: UserId) -> Result<bool, GateError> {
        Ok(self.users.contains(&user_id))
    }
}
