//! Hybrid retrieval fusing vector similarity with BM25 term relevance

use std::sync::Arc;

use uuid::Uuid;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, IndexHit, VectorIndexProvider};
use crate::types::{Chunk, Corpus, DocCategory, ScoredChunk};

use super::bm25::Bm25Model;

/// Keeps keyword normalization stable when the best lexical score is zero
const NORM_EPSILON: f32 = 1e-6;

/// Retriever that blends semantic and lexical evidence.
///
/// The vector index is queried for more candidates than requested, each
/// candidate is rescored as `w * semantic + (1 - w) * lexical`, and the top
/// `top_n` survive.
pub struct HybridRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    corpus: Arc<Corpus>,
    bm25: Bm25Model,
    config: RetrievalConfig,
}

impl HybridRetriever {
    /// Build a retriever over an ingested corpus. Fits the BM25 model from
    /// the corpus contents.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        corpus: Arc<Corpus>,
        config: RetrievalConfig,
    ) -> Self {
        let bm25 = Bm25Model::fit(&corpus);
        Self {
            embedder,
            index,
            corpus,
            bm25,
            config,
        }
    }

    /// Retrieve the best chunks for a question.
    ///
    /// `semantic_weight` overrides the configured default when given;
    /// `categories` restricts candidates to the named categories.
    pub async fn retrieve(
        &self,
        question: &str,
        top_n: usize,
        semantic_weight: Option<f32>,
        categories: Option<&[DocCategory]>,
    ) -> Result<Vec<ScoredChunk>> {
        if self.corpus.is_empty() {
            tracing::warn!("Retrieval requested against an empty corpus");
            return Ok(Vec::new());
        }

        let weight = semantic_weight
            .unwrap_or(self.config.semantic_weight)
            .clamp(0.0, 1.0);

        // Over-fetch so fusion has room to reorder; the corpus bounds what
        // the index can return, so an oversized top_n never needs more
        let candidates = top_n
            .saturating_mul(self.config.candidate_multiplier.max(1))
            .min(self.corpus.len());

        let query_embedding = self.embedder.embed(question).await?;
        let hits = self
            .index
            .query(&query_embedding, candidates, categories)
            .await?;

        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let lexical_raw = self.bm25.scores(question);
        let mut scored = self.fuse(&hits, &lexical_raw, weight, categories);

        // Stable sort keeps index order among ties
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_n);

        tracing::debug!(
            "Retrieved {} chunks for question ({} candidates, weight {:.2})",
            scored.len(),
            hits.len(),
            weight
        );

        Ok(scored)
    }

    /// Combine vector distances with BM25 scores for the candidate set
    fn fuse(
        &self,
        hits: &[IndexHit],
        lexical_raw: &[f32],
        weight: f32,
        categories: Option<&[DocCategory]>,
    ) -> Vec<ScoredChunk> {
        // Normalize keyword scores against the best raw score among the
        // candidates, not the whole corpus
        let max_raw = hits
            .iter()
            .filter_map(|hit| self.resolve(hit).map(|pos| lexical_raw[pos]))
            .fold(0.0f32, f32::max);
        let norm = max_raw + NORM_EPSILON;

        hits.iter()
            .filter_map(|hit| {
                // The index already filtered, but a misconfigured backend must
                // not leak chunks past the caller's restriction
                if let Some(allowed) = categories {
                    if !allowed.contains(&hit.source.category) {
                        return None;
                    }
                }

                let semantic = 1.0 - hit.distance / 2.0;
                // A hit with no corpus counterpart keeps its semantic score
                // and a zero lexical component; it is ranked, not dropped
                let (chunk, lexical) = match self.resolve(hit) {
                    Some(pos) => (
                        self.corpus.chunks()[pos].clone(),
                        lexical_raw[pos] / norm,
                    ),
                    None => {
                        tracing::warn!(
                            "Index hit {} not found in corpus, lexical score set to 0",
                            hit.chunk_id
                        );
                        (chunk_from_hit(hit), 0.0)
                    }
                };
                let combined = weight * semantic + (1.0 - weight) * lexical;

                Some(ScoredChunk {
                    chunk,
                    score: combined,
                    semantic_score: semantic,
                    lexical_score: lexical,
                })
            })
            .collect()
    }

    /// Resolve an index hit to its corpus position. Id lookup first, then an
    /// exact content + filename scan for indexes that do not round-trip ids.
    fn resolve(&self, hit: &IndexHit) -> Option<usize> {
        self.corpus
            .position_of(&hit.chunk_id)
            .or_else(|| self.corpus.position_by_content(&hit.content, &hit.source.filename))
    }

    /// Number of chunks the retriever can draw from
    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }
}

/// Reconstruct a citable chunk from index metadata alone, for hits the
/// corpus cannot account for
fn chunk_from_hit(hit: &IndexHit) -> Chunk {
    Chunk {
        id: hit.chunk_id,
        document_id: Uuid::nil(),
        content: hit.content.clone(),
        source: hit.source.clone(),
        chunk_index: 0,
        start_unit: 0,
        end_unit: 0,
        unit_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryVectorIndex;
    use crate::types::{Chunk, DocumentSource, FileType};
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Embeds text as term counts over a tiny fixed vocabulary, so similarity
    /// is fully deterministic in tests
    struct VocabEmbedder;

    const VOCAB: &[&str] = &[
        "insurance",
        "premium",
        "policy",
        "drug",
        "trial",
        "hospital",
        "patient",
        "care",
    ];

    #[async_trait]
    impl EmbeddingProvider for VocabEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            let tokens: Vec<&str> = lower.split_whitespace().collect();
            Ok(VOCAB
                .iter()
                .map(|word| tokens.iter().filter(|t| *t == word).count() as f32)
                .collect())
        }

        fn dimensions(&self) -> usize {
            VOCAB.len()
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "vocab"
        }
    }

    fn chunk(category: DocCategory, filename: &str, content: &str) -> Chunk {
        Chunk::new(
            Uuid::new_v4(),
            content.to_string(),
            DocumentSource {
                filename: filename.to_string(),
                file_path: format!("/docs/{}/{}", category, filename),
                file_type: FileType::Txt,
                page_number: None,
                category,
            },
            0,
            0,
            content.len(),
        )
    }

    async fn build_retriever(chunks: Vec<Chunk>) -> HybridRetriever {
        let embedder = Arc::new(VocabEmbedder);
        let index = Arc::new(MemoryVectorIndex::new());

        let mut embeddings = Vec::new();
        for c in &chunks {
            embeddings.push(embedder.embed(&c.content).await.unwrap());
        }
        index.upsert(&chunks, &embeddings).await.unwrap();

        HybridRetriever::new(
            embedder,
            index,
            Arc::new(Corpus::new(chunks)),
            RetrievalConfig::default(),
        )
    }

    fn sample_chunks() -> Vec<Chunk> {
        vec![
            chunk(
                DocCategory::Insurance,
                "renewal.txt",
                "annual premium increase for health insurance policy",
            ),
            chunk(
                DocCategory::Pharmaceutical,
                "trial.txt",
                "drug trial results for new pharmaceutical compound",
            ),
            chunk(
                DocCategory::Healthcare,
                "guidelines.txt",
                "hospital patient care guidelines",
            ),
        ]
    }

    #[tokio::test]
    async fn best_match_ranks_first() {
        let retriever = build_retriever(sample_chunks()).await;
        let results = retriever
            .retrieve("insurance premium", 1, Some(0.5), None)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.source.filename, "renewal.txt");
    }

    #[tokio::test]
    async fn category_filter_is_respected() {
        let retriever = build_retriever(sample_chunks()).await;
        let results = retriever
            .retrieve(
                "insurance premium",
                5,
                None,
                Some(&[DocCategory::Pharmaceutical]),
            )
            .await
            .unwrap();

        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|r| r.chunk.source.category == DocCategory::Pharmaceutical));
    }

    #[tokio::test]
    async fn scores_are_non_increasing_and_capped_at_top_n() {
        let retriever = build_retriever(sample_chunks()).await;
        let results = retriever
            .retrieve("hospital patient care", 2, None, None)
            .await
            .unwrap();

        assert!(results.len() <= 2);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn pure_semantic_weight_ignores_lexical() {
        let retriever = build_retriever(sample_chunks()).await;
        let results = retriever
            .retrieve("drug trial", 3, Some(1.0), None)
            .await
            .unwrap();

        for r in &results {
            assert!((r.score - r.semantic_score).abs() < 1e-6);
        }
        assert_eq!(results[0].chunk.source.filename, "trial.txt");
    }

    #[tokio::test]
    async fn pure_lexical_weight_ignores_semantic() {
        let retriever = build_retriever(sample_chunks()).await;
        let results = retriever
            .retrieve("drug trial", 3, Some(0.0), None)
            .await
            .unwrap();

        for r in &results {
            assert!((r.score - r.lexical_score).abs() < 1e-6);
        }
        assert_eq!(results[0].chunk.source.filename, "trial.txt");
    }

    #[tokio::test]
    async fn empty_corpus_returns_no_results() {
        let retriever = build_retriever(Vec::new()).await;
        let results = retriever.retrieve("anything", 5, None, None).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn top_n_larger_than_corpus_returns_all() {
        let retriever = build_retriever(sample_chunks()).await;
        let results = retriever
            .retrieve("insurance drug hospital", 50, None, None)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn extreme_top_n_does_not_overflow_candidate_count() {
        // top_n * candidate_multiplier would wrap without saturation
        let retriever = build_retriever(sample_chunks()).await;
        let results = retriever
            .retrieve("insurance drug hospital", usize::MAX, None, None)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn retrieval_is_deterministic() {
        let retriever = build_retriever(sample_chunks()).await;
        let first = retriever
            .retrieve("patient care", 3, None, None)
            .await
            .unwrap();
        let second = retriever
            .retrieve("patient care", 3, None, None)
            .await
            .unwrap();

        let ids: Vec<_> = first.iter().map(|r| r.chunk.id).collect();
        let ids2: Vec<_> = second.iter().map(|r| r.chunk.id).collect();
        assert_eq!(ids, ids2);
    }
}
