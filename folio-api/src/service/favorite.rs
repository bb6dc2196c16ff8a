//! Favorite operations

use tracing::{debug, info};

use super::{AddFavorite, CollectionService, FavoriteItem, RemoveFavorite};
use crate::error::{CollectionError, Missing};
use crate::models::{FavoriteEntry, UserId};

impl CollectionService {
    /// The user's favorites joined with article metadata, in the order they
    /// were added
    pub async fn list_favorites(&self, user_id: UserId) -> Result<Vec<FavoriteItem>, CollectionError> {
        self.ensure_user(user_id).await?;

        let favorites = self.favorites.find_by_owner(user_id).await?;
        if favorites.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<_> = favorites.iter().map(|f| f.article_id).collect();
        let mut articles = self.catalog.find_articles(&ids).await?;

        Ok(favorites
            .into_iter()
            .filter_map(|favorite| match articles.remove(&favorite.article_id) {
                Some(article) => Some(FavoriteItem::new(favorite, article)),
                None => {
                    debug!(
                        "Skipping favorite of user {}: article {} no longer in catalog",
                        user_id, favorite.article_id
                    );
                    None
                }
            })
            .collect())
    }

    /// Favorite an article; re-adding succeeds silently
    pub async fn add_favorite(&self, req: AddFavorite) -> Result<FavoriteItem, CollectionError> {
        let article = self.require_article(req.article_id).await?;

        let inserted = self
            .favorites
            .insert(FavoriteEntry::new(req.user_id, req.article_id))
            .await?;

        if inserted.created {
            info!("User {} favorited article {}", req.user_id, req.article_id);
        } else {
            debug!(
                "Article {} already a favorite of user {}",
                req.article_id, req.user_id
            );
        }

        Ok(FavoriteItem::new(inserted.value, article))
    }

    /// Remove a favorite. Removing one that is absent fails with `NotFound`.
    pub async fn remove_favorite(&self, req: RemoveFavorite) -> Result<(), CollectionError> {
        if !self
            .favorites
            .delete_by_owner_and_key(req.user_id, req.article_id)
            .await?
        {
            return Err(CollectionError::NotFound(Missing::Favorite {
                user_id: req.user_id,
                article_id: req.article_id,
            }));
        }

        info!("User {} unfavorited article {}", req.user_id, req.article_id);
        Ok(())
    }
}
