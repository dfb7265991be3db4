//! Retrieval-augmented question answering over a categorized document
//! corpus (healthcare, insurance, pharmaceutical).
//!
//! Pipeline: load PDF/text documents, chunk them with overlapping token
//! windows, embed and index the chunks, then answer questions with hybrid
//! (vector + BM25) retrieval and LLM generation with citations.

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use engine::RagEngine;
pub use error::{Error, Result};
