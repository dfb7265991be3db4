//! Core data types

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Corpus, DocCategory, Document, DocumentSource, FileType};
pub use query::QueryRequest;
pub use response::{Citation, QueryResponse, ScoredChunk};
