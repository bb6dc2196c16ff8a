//! Collection service
//!
//! The policy layer over the program and favorite stores. Every operation
//! touches exactly one store. Collaborators are injected at construction so
//! the service holds no process-wide state.

mod favorite;
mod ownership;
mod program;
mod types;

pub use ownership::ensure_owner;
pub use types::*;

use std::sync::Arc;

use crate::catalog::ArticleCatalog;
use crate::error::{CollectionError, Missing};
use crate::identity::IdentityGate;
use crate::models::{ArticleId, ArticleSummary, UserId};
use crate::store::{FavoriteStore, ProgramStore};

#[derive(Clone)]
pub struct CollectionService {
    programs: Arc<dyn ProgramStore>,
    favorites: Arc<dyn FavoriteStore>,
    catalog: Arc<dyn ArticleCatalog>,
    identity: Arc<dyn IdentityGate>,
}

impl CollectionService {
    pub fn new(
        programs: Arc<dyn ProgramStore>,
        favorites: Arc<dyn FavoriteStore>,
        catalog: Arc<dyn ArticleCatalog>,
        identity: Arc<dyn IdentityGate>,
    ) -> Self {
        Self {
            programs,
            favorites,
            catalog,
            identity,
        }
    }

    /// Resolve a bearer credential to the acting user
    pub async fn authenticate(&self, credential: &str) -> Result<UserId, CollectionError> {
        Ok(self.identity.authenticate(credential).await?)
    }

    /// Fail with `NotFound(User)` unless the user exists
    async fn ensure_user(&self, user_id: UserId) -> Result<(), CollectionError> {
        if self.identity.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(CollectionError::NotFound(Missing::User(user_id)))
        }
    }

    /// Catalog metadata for an article that must exist
    async fn require_article(&self, article_id: ArticleId) -> Result<ArticleSummary, CollectionError> {
        self.catalog
            .find_article(article_id)
            .await?
            .ok_or(CollectionError::NotFound(Missing::Article(article_id)))
    }
}
