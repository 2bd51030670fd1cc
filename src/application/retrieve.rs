use crate::application::rate_limit::RateLimiter;
use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use crate::domain::ports::retriever::Retriever;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Context documents for one chat turn plus the caller's remaining quota.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResponse {
    pub documents: Vec<Document>,
    pub remaining: u32,
    pub reset_time: DateTime<Utc>,
}

/// Rate-limited retrieval: the query path of a chat turn.
pub struct RetrieveUseCase {
    retriever: Arc<dyn Retriever>,
    limiter: Arc<RateLimiter>,
}

impl RetrieveUseCase {
    pub fn new(retriever: Arc<dyn Retriever>, limiter: Arc<RateLimiter>) -> Self {
        Self { retriever, limiter }
    }

    /// A quota slot is reserved before the provider call, so concurrent
    /// requests from one key cannot all reach the provider. The window entry
    /// is only charged after retrieval succeeds; a failed or abandoned call
    /// releases its slot and leaves the caller's window untouched.
    pub async fn execute(&self, key: &str, query: &str, top_k: usize) -> Result<RetrievalResponse, DomainError> {
        let slot = self.limiter.reserve(key).map_err(|gate| DomainError::RateLimited {
            remaining: 0,
            reset_time: gate.reset_time,
        })?;

        let documents = self.retriever.retrieve(query, top_k).await?;

        let decision = slot.commit();
        if !decision.allowed {
            return Err(DomainError::RateLimited {
                remaining: decision.remaining,
                reset_time: decision.reset_time,
            });
        }

        Ok(RetrievalResponse {
            documents,
            remaining: decision.remaining,
            reset_time: decision.reset_time,
        })
    }
}
