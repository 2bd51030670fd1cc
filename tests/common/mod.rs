//! Shared test helpers.
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use ragdesk::application::rate_limit::RateLimitConfig;
use ragdesk::domain::entities::document::Document;
use ragdesk::domain::error::DomainError;
use ragdesk::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use ragdesk::domain::ports::snapshot_store::SnapshotStore;
use ragdesk::infrastructure::clock::ManualClock;
use ragdesk::RagDesk;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Returns a fixed vector per known text and `fallback` for anything else.
pub struct TableProvider {
    table: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
    pub calls: AtomicUsize,
}

impl TableProvider {
    pub fn new(entries: &[(&str, Vec<f32>)], fallback: Vec<f32>) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TableProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| self.table.get(t).cloned().unwrap_or_else(|| self.fallback.clone()))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.fallback.len()
    }
}

/// Fails for every text containing `poison`; otherwise embeds as `[len, 1, 0]`.
pub struct FlakyProvider {
    pub poison: String,
}

#[async_trait::async_trait]
impl EmbeddingProvider for FlakyProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.iter().any(|t| t.contains(&self.poison)) {
            return Err(DomainError::Provider("quota exceeded".into()));
        }
        Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0, 0.0]).collect())
    }

    fn dimension(&self) -> usize {
        3
    }
}

/// Sleeps before answering, to simulate a slow network call.
pub struct SlowProvider {
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl SlowProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for SlowProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }

    fn dimension(&self) -> usize {
        2
    }
}

/// Snapshot store whose writes always fail.
#[derive(Default)]
pub struct BrokenSnapshot {
    pub attempts: Mutex<usize>,
}

impl SnapshotStore for BrokenSnapshot {
    fn load(&self) -> Vec<Document> {
        Vec::new()
    }

    fn save(&self, _documents: &[Document]) -> Result<(), DomainError> {
        *self.attempts.lock().unwrap() += 1;
        Err(DomainError::Persistence("disk full".into()))
    }
}

pub fn fixed_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()))
}

pub fn limits(max_requests: u32, window_ms: u64) -> RateLimitConfig {
    RateLimitConfig {
        max_requests,
        window_ms,
    }
}

pub fn setup(db_path: &Path, embedder: Arc<dyn EmbeddingProvider>) -> RagDesk {
    RagDesk::with_providers(db_path, embedder, fixed_clock(), limits(4, 60_000))
}
