//! Cosine similarity and brute-force top-K ranking.
//!
//! Pure functions over a borrowed collection. Ranking is stable: documents
//! with equal scores keep their collection order, so repeated searches over an
//! unchanged collection return the same sequence.

use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use serde::Serialize;

/// A document paired with its similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// Cosine of the angle between `a` and `b`, in `[-1, 1]`.
///
/// Zero-magnitude vectors score `0.0`. Vectors of different length are a hard
/// failure rather than a silently wrong score.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, DomainError> {
    if a.len() != b.len() {
        return Err(DomainError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        Ok(0.0)
    } else {
        Ok((dot / denom).clamp(-1.0, 1.0))
    }
}

/// Ranks `collection` by descending similarity to `query` and keeps the best
/// `top_k`. Every stored embedding is checked against the query dimension,
/// even those that would fall outside the top K.
pub fn search_scored(
    collection: &[Document],
    query: &[f32],
    top_k: usize,
) -> Result<Vec<ScoredDocument>, DomainError> {
    if collection.is_empty() || top_k == 0 {
        return Ok(vec![]);
    }

    let mut scored = Vec::with_capacity(collection.len());
    for (idx, doc) in collection.iter().enumerate() {
        scored.push((idx, cosine_similarity(query, &doc.embedding)?));
    }

    // sort_by is stable, ties stay in collection order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);

    Ok(scored
        .into_iter()
        .map(|(idx, score)| ScoredDocument {
            document: collection[idx].clone(),
            score,
        })
        .collect())
}

pub fn search(collection: &[Document], query: &[f32], top_k: usize) -> Result<Vec<Document>, DomainError> {
    Ok(search_scored(collection, query, top_k)?
        .into_iter()
        .map(|s| s.document)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str, embedding: Vec<f32>) -> Document {
        Document::new(content.into(), embedding, None)
    }

    #[test]
    fn test_identical_vectors_score_one() {
        let v = [0.3_f32, -1.2, 4.0, 0.01];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        let v = [0.3_f32, -1.2, 4.0];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        let sim = cosine_similarity(&v, &neg).unwrap();
        assert!((sim + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_length_mismatch_fails() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            DomainError::DimensionMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_search_orders_by_descending_score() {
        let docs = vec![
            doc("far", vec![0.0, 1.0]),
            doc("close", vec![1.0, 0.1]),
            doc("middle", vec![1.0, 1.0]),
        ];
        let results = search_scored(&docs, &[1.0, 0.0], 3).unwrap();
        let order: Vec<&str> = results.iter().map(|r| r.document.content.as_str()).collect();
        assert_eq!(order, vec!["close", "middle", "far"]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_top_k_is_clamped_to_collection_size() {
        let docs = vec![doc("a", vec![1.0, 0.0]), doc("b", vec![0.0, 1.0])];
        assert_eq!(search(&docs, &[1.0, 1.0], 10).unwrap().len(), 2);
        assert_eq!(search(&docs, &[1.0, 1.0], 1).unwrap().len(), 1);
    }

    #[test]
    fn test_zero_top_k_returns_nothing() {
        let docs = vec![doc("a", vec![1.0, 0.0])];
        assert!(search(&docs, &[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_collection_returns_nothing() {
        assert!(search(&[], &[1.0, 0.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_mismatch_outside_top_k_still_fails() {
        let docs = vec![doc("good", vec![1.0, 0.0]), doc("bad", vec![1.0, 0.0, 0.0])];
        assert!(matches!(
            search(&docs, &[1.0, 0.0], 1),
            Err(DomainError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_ties_are_stable_across_calls() {
        let docs: Vec<Document> = (0..6).map(|i| doc(&format!("d{i}"), vec![2.0, 2.0])).collect();
        let first = search(&docs, &[1.0, 1.0], 4).unwrap();
        let second = search(&docs, &[1.0, 1.0], 4).unwrap();
        let ids = |v: &[Document]| v.iter().map(|d| d.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first[0].content, "d0");
    }

    #[test]
    fn test_nan_scores_do_not_disturb_ordering() {
        let docs = vec![
            doc("low", vec![0.1, 1.0]),
            doc("broken", vec![f32::NAN, 1.0]),
            doc("high", vec![1.0, 0.1]),
        ];
        let first = search_scored(&docs, &[1.0, 0.0], 3).unwrap();
        let second = search_scored(&docs, &[1.0, 0.0], 3).unwrap();
        let names = |v: &[ScoredDocument]| {
            v.iter().map(|s| s.document.content.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&first), names(&second));

        let finite: Vec<&str> = first
            .iter()
            .filter(|s| s.score.is_finite())
            .map(|s| s.document.content.as_str())
            .collect();
        assert_eq!(finite, vec!["high", "low"]);
    }
}
