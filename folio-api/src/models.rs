//! Domain models for personal collections
//!
//! Ids are newtypes so a user id can never be passed where an article id is
//! expected. All of them serialize as their inner value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User identifier, as yielded by the identity gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Article identifier in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

/// Program entry identifier, generated on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation state of a program entry
///
/// Pending -> Validated is the only transition. Deletion is not a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationState {
    Pending,
    Validated,
}

/// One article queued in one user's reading program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub article_id: ArticleId,
    pub validated: bool,
    pub created_at: DateTime<Utc>,
}

impl ProgramEntry {
    /// New pending entry stamped with the current time
    ///
    /// The timestamp is truncated to milliseconds, the precision the SQLite
    /// store keeps, so a freshly built entry equals its persisted form.
    pub fn new(user_id: UserId, article_id: ArticleId) -> Self {
        Self {
            id: EntryId::generate(),
            user_id,
            article_id,
            validated: false,
            created_at: folio_common::time::from_millis(folio_common::time::now_millis()),
        }
    }

    pub fn state(&self) -> ValidationState {
        if self.validated {
            ValidationState::Validated
        } else {
            ValidationState::Pending
        }
    }
}

/// One article in one user's favorites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub user_id: UserId,
    pub article_id: ArticleId,
    pub created_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn new(user_id: UserId, article_id: ArticleId) -> Self {
        Self {
            user_id,
            article_id,
            created_at: folio_common::time::from_millis(folio_common::time::now_millis()),
        }
    }
}

/// Category as shown alongside an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Label as shown alongside an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
}

/// Minimal catalog metadata joined into collection views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: ArticleId,
    pub title: String,
    pub category: Option<Category>,
    pub labels: Vec<Label>,
}
