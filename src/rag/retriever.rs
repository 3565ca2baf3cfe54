//! Query-time similarity search.

use super::ScoredChunk;
use crate::embedding::Embedder;
use crate::error::{Result, TubetalkError};
use crate::vector_store::VectorIndex;
use tracing::{debug, instrument};

/// Embed `query` and return the `k` most similar chunks, best first.
///
/// The embedder must be the one the index was built with.
#[instrument(skip(index, embedder, query), fields(k = k, indexed = index.len()))]
pub async fn retrieve(
    index: &VectorIndex,
    embedder: &dyn Embedder,
    query: &str,
    k: usize,
) -> Result<Vec<ScoredChunk>> {
    if k == 0 || index.is_empty() {
        return Ok(Vec::new());
    }

    let query_embedding = embedder.embed(query).await?;
    if query_embedding.len() != index.dimensions() {
        return Err(TubetalkError::Embedding(format!(
            "Query embedding has {} dimensions but the index uses {} ({})",
            query_embedding.len(),
            index.dimensions(),
            index.embedder()
        )));
    }

    let results = index.search(&query_embedding, k);
    debug!(
        "Retrieved {} chunks, top score {:.3}",
        results.len(),
        results.first().map_or(0.0, |r| r.score)
    );
    Ok(results)
}
