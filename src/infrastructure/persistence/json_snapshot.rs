//! Whole-collection JSON snapshot on local disk.
//! Every save rewrites the file: write to a sibling temp file, then rename over
//! the snapshot so a reader never sees a half-written array.

use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use crate::domain::ports::snapshot_store::SnapshotStore;
use std::path::{Path, PathBuf};

pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default snapshot location (`./data/vectordb.json`).
    pub fn default_path() -> PathBuf {
        PathBuf::from("data").join("vectordb.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "vectordb.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> Vec<Document> {
        if !self.path.exists() {
            tracing::debug!("No snapshot at {}, starting empty", self.path.display());
            return Vec::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(json) => match serde_json::from_str::<Vec<Document>>(&json) {
                Ok(docs) => {
                    tracing::debug!("Loaded {} documents from {}", docs.len(), self.path.display());
                    docs
                }
                Err(e) => {
                    tracing::warn!("Failed to parse snapshot {}: {e}", self.path.display());
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read snapshot {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    fn save(&self, documents: &[Document]) -> Result<(), DomainError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                DomainError::Persistence(format!("create {}: {e}", dir.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(documents)
            .map_err(|e| DomainError::Persistence(format!("serialize: {e}")))?;

        let tmp = self.temp_path();
        std::fs::write(&tmp, json)
            .map_err(|e| DomainError::Persistence(format!("write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            DomainError::Persistence(format!("rename onto {}: {e}", self.path.display()))
        })?;

        tracing::debug!("Saved {} documents to {}", documents.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("absent.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectordb.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonSnapshotStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("vectordb.json");
        let store = JsonSnapshotStore::new(&path);
        let docs = vec![Document::new("hello".into(), vec![1.0, 2.0], None)];

        store.save(&docs).unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load(), docs);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("vectordb.json"));
        store
            .save(&[Document::new("one".into(), vec![1.0], None)])
            .unwrap();
        store.save(&[]).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_snapshot_is_pretty_printed_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectordb.json");
        JsonSnapshotStore::new(&path)
            .save(&[Document::new("x".into(), vec![0.5], None)])
            .unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {"));
    }
}
