//! Document ingestion: loading and chunking

pub mod chunker;
pub mod loader;

pub use chunker::TokenChunker;
pub use loader::DocumentLoader;
