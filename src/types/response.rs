//! Response types for RAG queries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Chunk, DocCategory};

/// A retrieved chunk with its fused ranking scores.
///
/// The ordered top-N sequence of these is the retrieval pipeline's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Fused score (semantic_weight * semantic + (1 - weight) * lexical)
    pub score: f32,
    /// Normalized semantic component (1 - distance/2)
    pub semantic_score: f32,
    /// Normalized lexical component (raw BM25 / max among candidates)
    pub lexical_score: f32,
}

/// Citation derived from a retrieved chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Chunk ID
    pub chunk_id: Uuid,
    /// Source filename
    pub filename: String,
    /// Page number (if applicable)
    pub page_number: Option<u32>,
    /// Domain category
    pub category: DocCategory,
    /// Exact snippet from the source
    pub snippet: String,
    /// Fused relevance score
    pub score: f32,
}

impl Citation {
    /// Create a citation from a scored chunk
    pub fn from_scored(scored: &ScoredChunk) -> Self {
        Self {
            chunk_id: scored.chunk.id,
            filename: scored.chunk.source.filename.clone(),
            page_number: scored.chunk.source.page_number,
            category: scored.chunk.source.category,
            snippet: scored.chunk.content.clone(),
            score: scored.score,
        }
    }

    /// Format citation for display in text
    pub fn format_inline(&self) -> String {
        match self.page_number {
            Some(page) => format!("{}, Page {}", self.filename, page),
            None => self.filename.clone(),
        }
    }
}

/// Response from a RAG query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer
    pub answer: String,
    /// Deduplicated source filenames, best-first
    pub sources: Vec<String>,
    /// Citations with source snippets
    pub citations: Vec<Citation>,
    /// Number of chunks retrieved
    pub chunks_retrieved: usize,
    /// Whether the question was in-domain (retrieval ran at all)
    pub relevant: bool,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl QueryResponse {
    /// Canned decline for out-of-domain questions
    pub fn declined(processing_time_ms: u64) -> Self {
        Self {
            answer: "I'm sorry, but your question doesn't seem to be related to \
                     healthcare, insurance, or pharmaceutical topics. I can only \
                     answer questions about these domains based on the documents \
                     I have access to."
                .to_string(),
            sources: Vec::new(),
            citations: Vec::new(),
            chunks_retrieved: 0,
            relevant: false,
            processing_time_ms,
        }
    }

    /// Response when retrieval found nothing usable
    pub fn not_found(processing_time_ms: u64) -> Self {
        Self {
            answer: "This information is not available in the provided documents."
                .to_string(),
            sources: Vec::new(),
            citations: Vec::new(),
            chunks_retrieved: 0,
            relevant: true,
            processing_time_ms,
        }
    }
}
