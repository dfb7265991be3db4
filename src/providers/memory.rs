//! In-process cosine vector index

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Chunk, DocCategory, DocumentSource};

use super::vector_index::{IndexHit, VectorIndexProvider};

struct StoredVector {
    chunk_id: Uuid,
    embedding: Vec<f32>,
    content: String,
    source: DocumentSource,
}

/// In-memory vector index using exact cosine distance.
///
/// Ingest and query phases do not overlap, so a plain `RwLock` around the
/// vector list is sufficient; queries are pure reads over the snapshot.
#[derive(Default)]
pub struct MemoryVectorIndex {
    vectors: RwLock<Vec<StoredVector>>,
}

impl MemoryVectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorIndexProvider for MemoryVectorIndex {
    async fn upsert(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()> {
        assert_eq!(
            chunks.len(),
            embeddings.len(),
            "chunk/embedding batch sizes must match"
        );

        let mut vectors = self.vectors.write();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            if embedding.is_empty() {
                return Err(Error::vector_index(format!(
                    "Empty embedding for chunk {}",
                    chunk.id
                )));
            }
            vectors.push(StoredVector {
                chunk_id: chunk.id,
                embedding: embedding.clone(),
                content: chunk.content.clone(),
                source: chunk.source.clone(),
            });
        }

        tracing::debug!("Indexed {} vectors ({} total)", chunks.len(), vectors.len());
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&[DocCategory]>,
    ) -> Result<Vec<IndexHit>> {
        let vectors = self.vectors.read();

        let mut hits: Vec<IndexHit> = vectors
            .iter()
            .filter(|v| match filter {
                Some(categories) => categories.contains(&v.source.category),
                None => true,
            })
            .map(|v| IndexHit {
                chunk_id: v.chunk_id,
                content: v.content.clone(),
                source: v.source.clone(),
                distance: cosine_distance(embedding, &v.embedding),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);

        Ok(hits)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.vectors.read().len())
    }

    async fn clear(&self) -> Result<()> {
        self.vectors.write().clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Cosine distance, clamped to [0, 2]
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0; // Undefined similarity, treat as orthogonal
    }

    (1.0 - dot / (norm_a * norm_b)).clamp(0.0, 2.0)
}
