//! Reading program operations

use tracing::{debug, info};

use super::{ensure_owner, AddToProgram, CollectionService, ProgramItem, RemoveFromProgram};
use super::{ValidateProgramEntry, ValidatedEntry};
use crate::error::{CollectionError, Missing};
use crate::models::{EntryId, ProgramEntry, UserId, ValidationState};

impl CollectionService {
    /// The user's program joined with article metadata, oldest first
    pub async fn list_program(&self, user_id: UserId) -> Result<Vec<ProgramItem>, CollectionError> {
        self.ensure_user(user_id).await?;

        let entries = self.programs.find_by_owner(user_id).await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<_> = entries.iter().map(|e| e.article_id).collect();
        let mut articles = self.catalog.find_articles(&ids).await?;

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            match articles.remove(&entry.article_id) {
                Some(article) => items.push(ProgramItem::new(entry, article)),
                None => debug!(
                    "Skipping program entry {}: article {} no longer in catalog",
                    entry.id, entry.article_id
                ),
            }
        }

        Ok(items)
    }

    /// Queue an article; re-adding returns the existing entry unchanged
    pub async fn add_to_program(&self, req: AddToProgram) -> Result<ProgramItem, CollectionError> {
        let article = self.require_article(req.article_id).await?;

        let inserted = self
            .programs
            .insert(ProgramEntry::new(req.user_id, req.article_id))
            .await?;

        if inserted.created {
            info!(
                "User {} added article {} to program (entry {})",
                req.user_id, req.article_id, inserted.value.id
            );
        } else {
            debug!(
                "Article {} already in program of user {} (entry {})",
                req.article_id, req.user_id, inserted.value.id
            );
        }

        Ok(ProgramItem::new(inserted.value, article))
    }

    /// Permanently delete an entry owned by the acting user
    pub async fn remove_from_program(&self, req: RemoveFromProgram) -> Result<(), CollectionError> {
        self.owned_entry(req.user_id, req.entry_id).await?;

        if !self
            .programs
            .delete_by_owner_and_key(req.user_id, req.entry_id)
            .await?
        {
            // Removed concurrently between lookup and delete
            return Err(CollectionError::NotFound(Missing::Entry(req.entry_id)));
        }

        info!("User {} removed program entry {}", req.user_id, req.entry_id);
        Ok(())
    }

    /// Mark an entry as read. Already validated entries are returned as-is.
    pub async fn validate_program_entry(
        &self,
        req: ValidateProgramEntry,
    ) -> Result<ValidatedEntry, CollectionError> {
        let entry = self.owned_entry(req.user_id, req.entry_id).await?;

        // Pending -> Validated is the only transition
        if let ValidationState::Validated = entry.state() {
            debug!("Program entry {} already validated", entry.id);
            return Ok(ValidatedEntry::from(&entry));
        }

        let updated = self
            .programs
            .mark_validated(req.entry_id)
            .await?
            .ok_or(CollectionError::NotFound(Missing::Entry(req.entry_id)))?;

        info!("User {} validated program entry {}", req.user_id, updated.id);
        Ok(ValidatedEntry::from(&updated))
    }

    async fn owned_entry(
        &self,
        actor: UserId,
        entry_id: EntryId,
    ) -> Result<ProgramEntry, CollectionError> {
        let entry = self
            .programs
            .find_by_id(entry_id)
            .await?
            .ok_or(CollectionError::NotFound(Missing::Entry(entry_id)))?;

        ensure_owner(actor, entry.user_id, format!("program entry {}", entry_id))?;
        Ok(entry)
    }
}
