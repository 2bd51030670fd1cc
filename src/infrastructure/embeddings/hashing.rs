//! Offline embedder: feature-hashed bag of words.
//!
//! Each lowercase alphanumeric token is hashed with SHA-256; the digest picks
//! a bucket and a sign. Texts sharing vocabulary land close together, which is
//! enough for local runs and tests without network access.

use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use sha2::{Digest, Sha256};

pub const DEFAULT_DIMENSION: usize = 256;

pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0_f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let bucket = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize
                % self.dimension;
            let sign = if digest[4] & 1 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl Default for HashingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::similarity::cosine_similarity;

    #[test]
    fn test_deterministic_and_fixed_dimension() {
        let p = HashingProvider::new(64);
        let a = p.embed_text("Test cricket is played over five days");
        let b = p.embed_text("Test cricket is played over five days");
        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let p = HashingProvider::default();
        assert_eq!(p.embed_text("T20, Cricket!"), p.embed_text("t20 cricket"));
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let p = HashingProvider::default();
        let q = p.embed_text("who won the world cup");
        let related = p.embed_text("India won the 2023 world cup final");
        let unrelated = p.embed_text("willow bat and leather ball");
        let s_rel = cosine_similarity(&q, &related).unwrap();
        let s_unrel = cosine_similarity(&q, &unrelated).unwrap();
        assert!(s_rel > s_unrel);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let p = HashingProvider::new(8);
        assert!(p.embed_text("  ,, ").iter().all(|x| *x == 0.0));
    }
}
