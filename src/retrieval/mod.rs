//! Hybrid retrieval: vector similarity fused with BM25 term relevance

pub mod bm25;
pub mod hybrid;

pub use bm25::Bm25Model;
pub use hybrid::HybridRetriever;
