use crate::application::document_store::DocumentStore;
use crate::domain::entities::document::titled_metadata;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRecord {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestFailure {
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub added: Vec<String>,
    pub failed: Vec<IngestFailure>,
    /// Added documents whose snapshot write failed.
    pub unpersisted: usize,
    pub total_documents: usize,
}

pub struct IngestUseCase {
    store: Arc<DocumentStore>,
}

impl IngestUseCase {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Adds each record in order, tagging it with `{title, source}`.
    /// A failing record is logged and skipped; the batch always completes.
    pub async fn execute(&self, records: &[IngestRecord], source: &str) -> IngestReport {
        let mut report = IngestReport::default();

        for record in records {
            let meta = titled_metadata(&record.title, source);
            match self.store.add(record.content.clone(), Some(meta)).await {
                Ok(outcome) => {
                    tracing::info!("Added: {}", record.title);
                    if !outcome.persisted {
                        report.unpersisted += 1;
                    }
                    report.added.push(outcome.id);
                }
                Err(e) => {
                    tracing::warn!("Error adding {}: {e}", record.title);
                    report.failed.push(IngestFailure {
                        title: record.title.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.total_documents = self.store.count();
        report
    }
}
