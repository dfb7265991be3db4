//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// Domain category of a document (closed vocabulary)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocCategory {
    Healthcare,
    Insurance,
    Pharmaceutical,
}

impl DocCategory {
    /// All known categories
    pub const ALL: [DocCategory; 3] = [
        DocCategory::Healthcare,
        DocCategory::Insurance,
        DocCategory::Pharmaceutical,
    ];

    /// Lowercase name used in paths and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthcare => "healthcare",
            Self::Insurance => "insurance",
            Self::Pharmaceutical => "pharmaceutical",
        }
    }
}

impl FromStr for DocCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "healthcare" => Ok(Self::Healthcare),
            "insurance" => Ok(Self::Insurance),
            "pharmaceutical" => Ok(Self::Pharmaceutical),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

impl std::fmt::Display for DocCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Plain text file
    Txt,
}

impl FileType {
    /// Detect file type from extension; unsupported extensions return None
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" => Some(Self::Txt),
            _ => None,
        }
    }
}

/// Source information inherited by every chunk (used for citations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSource {
    /// Original filename
    pub filename: String,
    /// Full path the document was loaded from
    pub file_path: String,
    /// File type
    pub file_type: FileType,
    /// Page number (1-indexed, PDFs only)
    pub page_number: Option<u32>,
    /// Domain category
    pub category: DocCategory,
}

impl DocumentSource {
    /// Format source for display in answers
    pub fn format_citation(&self) -> String {
        match self.page_number {
            Some(page) => format!("{}, Page {}", self.filename, page),
            None => self.filename.clone(),
        }
    }
}

/// A document that has been loaded and extracted.
///
/// One `Document` per PDF page or per text file; immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Extracted text content
    pub content: String,
    /// Source information
    pub source: DocumentSource,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document
    pub fn new(content: String, source: DocumentSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            source,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// A chunk of text cut from a document.
///
/// Chunks are fixed-length overlapping windows over a document's unit
/// sequence; a document's final window may be shorter. Created once at
/// ingest, never re-chunked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID, carried through the vector index metadata
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content (whitespace-trimmed window)
    pub content: String,
    /// Source information for citations
    pub source: DocumentSource,
    /// Chunk index within the document
    pub chunk_index: u32,
    /// Window start offset in units (tokens or characters)
    pub start_unit: usize,
    /// Window end offset in units (exclusive)
    pub end_unit: usize,
    /// Number of units in the window
    pub unit_count: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(
        document_id: Uuid,
        content: String,
        source: DocumentSource,
        chunk_index: u32,
        start_unit: usize,
        end_unit: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            source,
            chunk_index,
            start_unit,
            end_unit,
            unit_count: end_unit - start_unit,
        }
    }
}

/// The ordered sequence of all chunks across all documents.
///
/// Corpus order defines cross-reference identity between the lexical model
/// and the vector index: both are fed the same chunks in the same order.
/// Built once at startup, read-only afterwards.
#[derive(Debug, Default)]
pub struct Corpus {
    chunks: Vec<Chunk>,
    positions: HashMap<Uuid, usize>,
}

impl Corpus {
    /// Build a corpus from chunks in final order
    pub fn new(chunks: Vec<Chunk>) -> Self {
        let positions = chunks
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        Self { chunks, positions }
    }

    /// All chunks in corpus order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Resolve a chunk id to its corpus position
    pub fn position_of(&self, id: &Uuid) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Linear scan fallback: exact content plus source filename match,
    /// first match wins
    pub fn position_by_content(&self, content: &str, filename: &str) -> Option<usize> {
        self.chunks
            .iter()
            .position(|c| c.content == content && c.source.filename == filename)
    }
}
