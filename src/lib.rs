pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::document_store::{AddOutcome, DocumentStore};
use crate::application::ingest::{IngestRecord, IngestReport, IngestUseCase};
use crate::application::rate_limit::{CleanupTask, RateLimitConfig, RateLimiter};
use crate::application::retrieve::{RetrievalResponse, RetrieveUseCase};
use crate::config::{Config, ProviderKind};
use crate::domain::entities::document::{Document, Metadata};
use crate::domain::entities::rate_limit::RateLimitDecision;
use crate::domain::error::DomainError;
use crate::domain::ports::clock::Clock;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::snapshot_store::SnapshotStore;
use crate::domain::values::similarity::ScoredDocument;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::embeddings::gemini::GeminiProvider;
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::embeddings::voyage::VoyageProvider;
use crate::infrastructure::persistence::json_snapshot::JsonSnapshotStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Document store, rate limiter and the use cases built on them.
///
/// Construct once at startup and share by reference with request handlers.
pub struct RagDesk {
    store: Arc<DocumentStore>,
    limiter: Arc<RateLimiter>,
    retrieve_uc: RetrieveUseCase,
    ingest_uc: IngestUseCase,
    top_k: usize,
    sweep_interval: Duration,
}

impl RagDesk {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        config.validate()?;
        let api_key = config.api_key.clone();
        let model = config.model.clone();

        let embedder: Arc<dyn EmbeddingProvider> = match config.provider {
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(api_key, model, None)),
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(api_key, model)),
            ProviderKind::Voyage => Arc::new(VoyageProvider::new(api_key, model, None)),
            ProviderKind::Hashing => Arc::new(HashingProvider::default()),
        };

        let mut desk = Self::with_providers(
            &config.db_path,
            embedder,
            Arc::new(SystemClock),
            config.rate_limit,
        );
        desk.top_k = config.top_k;
        desk.sweep_interval = Duration::from_millis(config.sweep_interval_ms);
        Ok(desk)
    }

    pub fn with_providers(
        db_path: &Path,
        embedder: Arc<dyn EmbeddingProvider>,
        clock: Arc<dyn Clock>,
        rate_limit: RateLimitConfig,
    ) -> Self {
        let snapshot: Arc<dyn SnapshotStore> = Arc::new(JsonSnapshotStore::new(db_path));
        Self::with_snapshot(snapshot, embedder, clock, rate_limit)
    }

    pub fn with_snapshot(
        snapshot: Arc<dyn SnapshotStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        clock: Arc<dyn Clock>,
        rate_limit: RateLimitConfig,
    ) -> Self {
        let provider_dim = embedder.dimension();
        let store = Arc::new(DocumentStore::open(snapshot, embedder));

        if let Some(stored_dim) = store.stored_dimension() {
            if provider_dim > 0 && stored_dim != provider_dim {
                tracing::warn!(
                    "Stored documents have dimension {stored_dim} but the embedding provider reports {provider_dim}; searches will fail until the collection is rebuilt"
                );
            }
        }

        let limiter = Arc::new(RateLimiter::new(rate_limit, clock));

        Self {
            retrieve_uc: RetrieveUseCase::new(store.clone(), limiter.clone()),
            ingest_uc: IngestUseCase::new(store.clone()),
            store,
            limiter,
            top_k: 3,
            sweep_interval: Duration::from_secs(60),
        }
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn default_top_k(&self) -> usize {
        self.top_k
    }

    /// Starts the rate limiter's periodic sweep. Keep the handle alive for as
    /// long as sweeping should continue and call `stop` on shutdown.
    pub fn start_cleanup(&self) -> CleanupTask {
        self.limiter.start_cleanup(self.sweep_interval)
    }

    // Delegating methods
    pub async fn add_document(&self, content: String, metadata: Option<Metadata>) -> Result<AddOutcome, DomainError> {
        self.store.add(content, metadata).await
    }

    pub fn list_documents(&self) -> Vec<Document> {
        self.store.list()
    }

    pub fn clear(&self) -> Result<(), DomainError> {
        self.store.clear()
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }

    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredDocument>, DomainError> {
        self.store.search(query, top_k).await
    }

    pub async fn retrieve(&self, key: &str, query: &str, top_k: usize) -> Result<RetrievalResponse, DomainError> {
        self.retrieve_uc.execute(key, query, top_k).await
    }

    pub fn check_rate(&self, key: &str) -> RateLimitDecision {
        self.limiter.check(key)
    }

    pub fn reset_rate(&self, key: &str) {
        self.limiter.reset(key)
    }

    pub async fn ingest(&self, records: &[IngestRecord], source: &str) -> IngestReport {
        self.ingest_uc.execute(records, source).await
    }
}
