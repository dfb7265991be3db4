//! End-to-end RAG engine: ingest once, answer many

use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::{PromptBuilder, RelevanceGate};
use crate::ingestion::{DocumentLoader, TokenChunker};
use crate::providers::{EmbeddingProvider, LlmProvider, VectorIndexProvider};
use crate::retrieval::HybridRetriever;
use crate::types::{Citation, Corpus, QueryRequest, QueryResponse};

/// The assembled pipeline.
///
/// `build` runs the ingest phase (load, chunk, embed, index, fit BM25);
/// `ask` runs the query phase against the frozen corpus.
pub struct RagEngine {
    retriever: HybridRetriever,
    llm: Arc<dyn LlmProvider>,
    config: RagConfig,
}

impl RagEngine {
    /// Ingest the document corpus and assemble the pipeline.
    ///
    /// Embeddings are computed in configured batches and upserted into the
    /// index as they come, so a large corpus never holds every embedding in
    /// flight at once.
    pub async fn build(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let started = Instant::now();

        let documents = DocumentLoader::load_all(&config.documents.root)?;
        tracing::info!(
            "Loaded {} documents from {}",
            documents.len(),
            config.documents.root.display()
        );

        let chunker = TokenChunker::new(&config.chunking);
        let corpus = chunker.chunk_corpus(&documents);
        tracing::info!("Chunked corpus into {} chunks", corpus.len());

        let batch_size = config.embeddings.batch_size.max(1);
        for batch in corpus.chunks().chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = embedder.embed_batch(&texts).await?;
            index.upsert(batch, &embeddings).await?;
        }

        let corpus = Arc::new(corpus);
        let retriever = HybridRetriever::new(
            embedder,
            index,
            corpus,
            config.retrieval.clone(),
        );

        tracing::info!(
            "Engine ready: {} chunks indexed in {:?}",
            retriever.corpus_len(),
            started.elapsed()
        );

        Ok(Self {
            retriever,
            llm,
            config,
        })
    }

    /// Assemble the pipeline over an already-prepared corpus, skipping the
    /// ingest phase. The index must already hold the corpus embeddings.
    pub fn from_corpus(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        llm: Arc<dyn LlmProvider>,
        corpus: Arc<Corpus>,
    ) -> Self {
        let retriever = HybridRetriever::new(embedder, index, corpus, config.retrieval.clone());
        Self {
            retriever,
            llm,
            config,
        }
    }

    /// Answer a question end-to-end: gate, retrieve, prompt, generate
    pub async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let started = Instant::now();
        let elapsed_ms = |s: Instant| s.elapsed().as_millis() as u64;

        if !RelevanceGate::is_relevant(&request.question) {
            tracing::info!("Question gated as out of domain");
            return Ok(QueryResponse::declined(elapsed_ms(started)));
        }

        let top_n = if request.top_n == 0 {
            self.config.retrieval.top_n
        } else {
            request.top_n
        };

        let retrieved = self
            .retriever
            .retrieve(
                &request.question,
                top_n,
                request.semantic_weight,
                request.category_filter(),
            )
            .await?;

        if retrieved.is_empty() {
            return Ok(QueryResponse::not_found(elapsed_ms(started)));
        }

        let context = PromptBuilder::build_context(&retrieved);
        let answer = self
            .llm
            .generate_answer(&request.question, &context)
            .await?;

        let citations: Vec<Citation> = retrieved.iter().map(Citation::from_scored).collect();

        // Deduplicate filenames, best-first
        let mut sources: Vec<String> = Vec::new();
        for citation in &citations {
            if !sources.contains(&citation.filename) {
                sources.push(citation.filename.clone());
            }
        }

        Ok(QueryResponse {
            answer,
            sources,
            chunks_retrieved: citations.len(),
            citations,
            relevant: true,
            processing_time_ms: elapsed_ms(started),
        })
    }

    /// Number of chunks available for retrieval
    pub fn corpus_len(&self) -> usize {
        self.retriever.corpus_len()
    }

    /// The active configuration
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Name of the generation model in use
    pub fn model(&self) -> &str {
        self.llm.model()
    }
}
