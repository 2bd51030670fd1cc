//! In-memory document collection mirrored to a snapshot.
//!
//! The embedding call happens before any lock is taken. Dimension check,
//! append and snapshot write then run as one critical section, so concurrent
//! adds never interleave and the snapshot always holds every appended document.

use crate::domain::entities::document::{Document, Metadata};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::ports::retriever::Retriever;
use crate::domain::ports::snapshot_store::SnapshotStore;
use crate::domain::values::similarity::{self, ScoredDocument};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Result of a successful [`DocumentStore::add`].
///
/// `persisted == false` means the document is in memory but the snapshot
/// write failed; memory and disk diverge until the next successful save.
#[derive(Debug, Clone, Serialize)]
pub struct AddOutcome {
    pub id: String,
    pub persisted: bool,
}

pub struct DocumentStore {
    documents: Mutex<Vec<Document>>,
    snapshot: Arc<dyn SnapshotStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl DocumentStore {
    /// Loads the existing snapshot, or starts empty.
    pub fn open(snapshot: Arc<dyn SnapshotStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let documents = snapshot.load();
        Self {
            documents: Mutex::new(documents),
            snapshot,
            embedder,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Document>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn add(&self, content: String, metadata: Option<Metadata>) -> Result<AddOutcome, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::InvalidInput("document content is empty".into()));
        }

        let embedding = self.embedder.embed_one(&content, InputType::Document).await?;
        ensure_finite(&embedding)?;

        let mut docs = self.lock();
        if let Some(expected) = docs.first().map(Document::dimension) {
            if expected != embedding.len() {
                return Err(DomainError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        let doc = Document::new(content, embedding, metadata);
        let id = doc.id.clone();
        docs.push(doc);

        let persisted = match self.snapshot.save(&docs) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Document {id} kept in memory but not persisted: {e}");
                false
            }
        };
        Ok(AddOutcome { id, persisted })
    }

    /// Snapshot copy of the collection.
    pub fn list(&self) -> Vec<Document> {
        self.lock().clone()
    }

    pub fn clear(&self) -> Result<(), DomainError> {
        let mut docs = self.lock();
        docs.clear();
        self.snapshot.save(&docs).map_err(|e| {
            tracing::warn!("Collection cleared in memory but snapshot not rewritten: {e}");
            e
        })
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Embedding dimension of the stored documents, if any.
    pub fn stored_dimension(&self) -> Option<usize> {
        self.lock().first().map(Document::dimension)
    }

    /// Embeds `query` and ranks the collection against it.
    ///
    /// An empty collection or `top_k == 0` returns immediately without calling
    /// the embedding provider.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredDocument>, DomainError> {
        if top_k == 0 || self.count() == 0 {
            return Ok(vec![]);
        }
        let query_embedding = self.embedder.embed_one(query, InputType::Query).await?;
        ensure_finite(&query_embedding)?;
        let collection = self.list();
        similarity::search_scored(&collection, &query_embedding, top_k)
    }
}

/// NaN and infinities serialize as `null` and would make the snapshot unloadable.
fn ensure_finite(embedding: &[f32]) -> Result<(), DomainError> {
    if embedding.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(DomainError::Provider("embedding contains non-finite values".into()))
    }
}

#[async_trait]
impl Retriever for DocumentStore {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Document>, DomainError> {
        Ok(self
            .search(query, top_k)
            .await?
            .into_iter()
            .map(|s| s.document)
            .collect())
    }
}
