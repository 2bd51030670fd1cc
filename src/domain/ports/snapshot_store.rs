use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;

/// Stable storage for the whole document collection.
pub trait SnapshotStore: Send + Sync {
    /// Missing or unreadable snapshots load as an empty collection.
    fn load(&self) -> Vec<Document>;
    /// Overwrites the snapshot with `documents`.
    fn save(&self, documents: &[Document]) -> Result<(), DomainError>;
}
