//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::engine::RagEngine;
use crate::error::Result;
use crate::providers::{MemoryVectorIndex, OllamaClient, OllamaEmbedder, OllamaLlm};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    engine: RagEngine,
}

impl AppState {
    /// Initialize providers, ingest the corpus, and wrap the engine.
    ///
    /// Ingest runs to completion before the server accepts queries, so every
    /// request sees the full corpus.
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        let embedder = Arc::new(OllamaEmbedder::from_client(
            ollama.clone(),
            config.embeddings.dimensions,
        ));
        let llm = Arc::new(OllamaLlm::from_client(
            ollama,
            config.llm.generate_model.clone(),
        ));
        let index = Arc::new(MemoryVectorIndex::new());

        let engine = RagEngine::build(config, embedder, index, llm).await?;
        tracing::info!("Engine initialized with {} chunks", engine.corpus_len());

        Ok(Self {
            inner: Arc::new(AppStateInner { engine }),
        })
    }

    /// The assembled pipeline
    pub fn engine(&self) -> &RagEngine {
        &self.inner.engine
    }
}
