use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Document,
    Query,
}

#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError>;
    fn dimension(&self) -> usize;

    /// Embed a single text, rejecting empty or missing vectors.
    async fn embed_one(&self, text: &str, input_type: InputType) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.embed(&[text.to_string()], input_type).await?;
        match vectors.pop() {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(DomainError::Provider("provider returned no embedding".into())),
        }
    }
}
