//! Ownership assertion shared by every mutating operation

use std::fmt::Display;
use tracing::warn;

use crate::error::CollectionError;
use crate::models::UserId;

/// Succeed only when `actor` is `owner`
///
/// A mismatch is logged as a potential misuse signal.
pub fn ensure_owner(
    actor: UserId,
    owner: UserId,
    resource: impl Display,
) -> Result<(), CollectionError> {
    if actor == owner {
        return Ok(());
    }

    warn!(
        "Ownership violation: user {} targeted {} owned by user {}",
        actor, resource, owner
    );
    Err(CollectionError::Forbidden {
        actor,
        resource: resource.to_string(),
    })
}
