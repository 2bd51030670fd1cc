use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Top-K semantic retrieval over a document collection.
///
/// Implemented by the in-process `DocumentStore`; a hosted vector database
/// would plug in here as well.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Document>, DomainError>;
}
