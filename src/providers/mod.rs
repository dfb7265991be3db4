//! Provider abstractions for embeddings, vector indexing, and LLM generation
//!
//! Trait-based seams around the external collaborators so the retrieval core
//! can be exercised against in-process implementations.

pub mod embedding;
pub mod llm;
pub mod memory;
pub mod ollama;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use memory::MemoryVectorIndex;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use vector_index::{IndexHit, VectorIndexProvider};
