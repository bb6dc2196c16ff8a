//! Typed requests and results for collection operations

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ArticleId, ArticleSummary, EntryId, FavoriteEntry, ProgramEntry, UserId};

/// Queue an article in the acting user's program
#[derive(Debug, Clone, Copy)]
pub struct AddToProgram {
    pub user_id: UserId,
    pub article_id: ArticleId,
}

/// Delete one of the acting user's program entries
#[derive(Debug, Clone, Copy)]
pub struct RemoveFromProgram {
    pub user_id: UserId,
    pub entry_id: EntryId,
}

/// Mark one of the acting user's program entries as read
#[derive(Debug, Clone, Copy)]
pub struct ValidateProgramEntry {
    pub user_id: UserId,
    pub entry_id: EntryId,
}

/// Favorite an article for the acting user
#[derive(Debug, Clone, Copy)]
pub struct AddFavorite {
    pub user_id: UserId,
    pub article_id: ArticleId,
}

/// Drop an article from the acting user's favorites
#[derive(Debug, Clone, Copy)]
pub struct RemoveFavorite {
    pub user_id: UserId,
    pub article_id: ArticleId,
}

/// Program entry joined with its article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramItem {
    pub entry_id: EntryId,
    pub article: ArticleSummary,
    pub validated: bool,
    pub created_at: DateTime<Utc>,
}

impl ProgramItem {
    pub fn new(entry: ProgramEntry, article: ArticleSummary) -> Self {
        Self {
            entry_id: entry.id,
            article,
            validated: entry.validated,
            created_at: entry.created_at,
        }
    }
}

/// Result of a validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedEntry {
    pub entry_id: EntryId,
    pub article_id: ArticleId,
    pub validated: bool,
}

impl From<&ProgramEntry> for ValidatedEntry {
    fn from(entry: &ProgramEntry) -> Self {
        Self {
            entry_id: entry.id,
            article_id: entry.article_id,
            validated: entry.validated,
        }
    }
}

/// Favorite joined with its article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteItem {
    pub article: ArticleSummary,
    pub created_at: DateTime<Utc>,
}

impl FavoriteItem {
    pub fn new(entry: FavoriteEntry, article: ArticleSummary) -> Self {
        Self {
            article,
            created_at: entry.created_at,
        }
    }
}
