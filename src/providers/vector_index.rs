//! Vector index provider trait for storing and searching embeddings

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Chunk, DocCategory, DocumentSource};

/// A nearest-neighbor hit from the vector index.
///
/// Carries the chunk id through the index metadata so retrieval can resolve
/// the hit against the corpus without scanning it.
#[derive(Debug, Clone)]
pub struct IndexHit {
    /// Id of the stored chunk
    pub chunk_id: Uuid,
    /// Stored text
    pub content: String,
    /// Stored source metadata
    pub source: DocumentSource,
    /// Cosine distance in [0, 2]; 0 = identical, 2 = opposite
    pub distance: f32,
}

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `MemoryVectorIndex`: in-process cosine index
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Insert chunks with their embeddings, batched at ingest time.
    ///
    /// `chunks` and `embeddings` must correspond 1:1; a length mismatch is a
    /// programmer error and panics.
    async fn upsert(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()>;

    /// Search for the `k` nearest neighbors, ascending by distance, with an
    /// optional category filter applied at the index level
    async fn query(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&[DocCategory]>,
    ) -> Result<Vec<IndexHit>>;

    /// Total number of vectors stored
    async fn count(&self) -> Result<usize>;

    /// Remove everything from the index
    async fn clear(&self) -> Result<()>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
