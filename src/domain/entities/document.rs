use serde::{Deserialize, Serialize};

/// Free-form document attributes such as `title` and `source`.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A stored piece of text together with its embedding.
///
/// Documents are immutable once created. Every embedding in one store shares
/// the dimension of the provider that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub embedding: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Document {
    pub fn new(content: String, embedding: Vec<f32>, metadata: Option<Metadata>) -> Self {
        Self {
            id: new_document_id(),
            content,
            embedding,
            metadata,
        }
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }

    /// Title from metadata, if one was recorded at ingestion.
    pub fn title(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("title")?.as_str()
    }
}

fn new_document_id() -> String {
    format!("doc_{}", uuid::Uuid::new_v4().simple())
}

/// Builds the `{title, source}` metadata attached by bulk ingestion.
pub fn titled_metadata(title: &str, source: &str) -> Metadata {
    let mut meta = Metadata::new();
    meta.insert("title".into(), serde_json::Value::String(title.to_string()));
    meta.insert("source".into(), serde_json::Value::String(source.to_string()));
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_prefixed() {
        let a = Document::new("a".into(), vec![1.0], None);
        let b = Document::new("a".into(), vec![1.0], None);
        assert!(a.id.starts_with("doc_"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_missing_metadata_is_not_serialized() {
        let doc = Document::new("text".into(), vec![0.5, 0.25], None);
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("metadata").is_none());

        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_title_lookup() {
        let doc = Document::new(
            "body".into(),
            vec![1.0],
            Some(titled_metadata("Test Cricket", "kb")),
        );
        assert_eq!(doc.title(), Some("Test Cricket"));
        assert_eq!(Document::new("x".into(), vec![], None).title(), None);
    }
}
