//! In-memory vector index for a single transcript.
//!
//! The index is a flat list of chunk/vector pairs searched by brute-force
//! cosine similarity. It is built in one pass and replaced wholesale when the
//! session moves to another video.

use crate::chunking::Chunk;
use crate::embedding::Embedder;
use crate::error::{Result, TubetalkError};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

/// A chunk with its similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The matched chunk.
    pub chunk: Chunk,
    /// Cosine similarity (higher is better).
    pub score: f32,
}

/// Embedded chunks of one transcript.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
    embedder: String,
    dimensions: usize,
}

impl VectorIndex {
    /// Assemble an index from chunks and their vectors.
    ///
    /// Fails if the counts differ or any vector has the wrong length.
    pub fn new(
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
        embedder: impl Into<String>,
        dimensions: usize,
    ) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(TubetalkError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                vectors.len()
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(TubetalkError::Embedding(format!(
                "Embedding has {} dimensions, expected {}",
                bad.len(),
                dimensions
            )));
        }

        Ok(Self {
            entries: chunks.into_iter().zip(vectors).collect(),
            embedder: embedder.into(),
            dimensions,
        })
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the embedder the index was built with.
    pub fn embedder(&self) -> &str {
        &self.embedder
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Indexed chunks in transcript order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|(chunk, _)| chunk)
    }

    /// Top `k` chunks by cosine similarity, best first.
    ///
    /// Equal scores keep transcript order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        if k == 0 {
            return Vec::new();
        }

        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, vector)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query, vector),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(k);
        results
    }
}

/// Embed every chunk and build the index.
///
/// Batches of `batch_size` texts are embedded with up to `max_concurrent`
/// requests in flight; results keep chunk order. Any failure aborts the build.
#[instrument(skip(chunks, embedder), fields(chunks = chunks.len(), embedder = %embedder.name()))]
pub async fn build_index(
    chunks: Vec<Chunk>,
    embedder: &dyn Embedder,
    batch_size: usize,
    max_concurrent: usize,
) -> Result<VectorIndex> {
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let batch_size = batch_size.max(1);

    debug!(
        "Embedding {} chunks in batches of {}",
        texts.len(),
        batch_size
    );

    let batches: Vec<Vec<Vec<f32>>> = stream::iter(texts.chunks(batch_size))
        .map(|batch| embedder.embed_batch(batch))
        .buffered(max_concurrent.max(1))
        .try_collect()
        .await?;

    let vectors: Vec<Vec<f32>> = batches.into_iter().flatten().collect();
    let index = VectorIndex::new(chunks, vectors, embedder.name(), embedder.dimensions())?;

    info!("Indexed {} chunks", index.len());
    Ok(index)
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use async_trait::async_trait;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(i, *t, i * 10))
            .collect()
    }

    /// Embeds text as a fixed direction chosen by its first character.
    struct AxisEmbedder;

    #[async_trait]
    impl Embedder for AxisEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(match text.chars().next() {
                Some('a') => vec![1.0, 0.0],
                Some('b') => vec![0.0, 1.0],
                _ => vec![1.0, 1.0],
            })
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::new();
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> String {
            "axis".to_string()
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl Embedder for BrokenEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(TubetalkError::Embedding("boom".to_string()))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if texts.iter().any(|t| t.contains("fail")) {
                return Err(TubetalkError::Embedding("boom".to_string()));
            }
            Ok(texts.iter().map(|_| vec![1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            1
        }

        fn name(&self) -> String {
            "broken".to_string()
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_build_index_keeps_order_across_batches() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let texts = ["alpha", "beta", "gamma", "delta", "epsilon"];
        let index = build_index(chunks(&texts), &embedder, 2, 3).await.unwrap();

        assert_eq!(index.len(), 5);
        assert_eq!(index.dimensions(), 64);
        assert_eq!(index.embedder(), "hashing-64");
        let contents: Vec<&str> = index.chunks().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, texts);

        for (chunk, vector) in &index.entries {
            assert_eq!(vector, &embedder.embed_text(&chunk.content));
        }
    }

    #[tokio::test]
    async fn test_build_index_fails_whole_on_batch_error() {
        let result = build_index(chunks(&["ok", "ok", "fail", "ok"]), &BrokenEmbedder, 1, 2).await;
        assert!(matches!(result, Err(TubetalkError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_empty_chunks_build_empty_index() {
        let index = build_index(Vec::new(), &AxisEmbedder, 10, 2).await.unwrap();
        assert!(index.is_empty());
        assert!(index.search(&[1.0, 0.0], 4).is_empty());
    }

    #[test]
    fn test_new_rejects_mismatches() {
        let err = VectorIndex::new(chunks(&["a", "b"]), vec![vec![1.0, 0.0]], "x", 2);
        assert!(matches!(err, Err(TubetalkError::Embedding(_))));

        let err = VectorIndex::new(chunks(&["a"]), vec![vec![1.0, 0.0, 0.0]], "x", 2);
        assert!(matches!(err, Err(TubetalkError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_search_orders_by_score_and_keeps_ties_stable() {
        let index = build_index(chunks(&["b1", "a1", "c1", "a2", "b2"]), &AxisEmbedder, 10, 1)
            .await
            .unwrap();

        let results = index.search(&[1.0, 0.0], 3);
        let contents: Vec<&str> = results.iter().map(|r| r.chunk.content.as_str()).collect();
        assert_eq!(contents, vec!["a1", "a2", "c1"]);
        assert!(results[0].score >= results[1].score && results[1].score >= results[2].score);

        assert_eq!(index.search(&[1.0, 0.0], 10).len(), 5);
        assert!(index.search(&[1.0, 0.0], 0).is_empty());
    }
}
