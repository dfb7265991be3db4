//! Token-aware text chunking with overlapping fixed-length windows

use std::path::Path;

use tokenizers::Tokenizer;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Corpus, Document};

/// Token-aware chunker with configurable window size and overlap.
///
/// Units are tokenizer ids when a tokenizer is available, characters
/// otherwise (with a fixed characters-per-token approximation). The fallback
/// preserves the same sliding-window contract.
pub struct TokenChunker {
    /// Window size in units
    chunk_size: usize,
    /// Overlap between consecutive windows in units
    overlap: usize,
    /// Characters per token for the fallback
    chars_per_token: usize,
    /// Optional HuggingFace tokenizer
    tokenizer: Option<Tokenizer>,
}

impl TokenChunker {
    /// Create a chunker from configuration.
    ///
    /// A missing or unloadable tokenizer is a soft fallback to character
    /// windows, not an error.
    pub fn new(config: &ChunkingConfig) -> Self {
        let tokenizer = config.tokenizer_file.as_deref().and_then(Self::load_tokenizer);
        if tokenizer.is_none() {
            tracing::warn!(
                "No tokenizer available, using {}-chars-per-token approximation",
                config.chars_per_token
            );
        }
        Self {
            chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
            chars_per_token: config.chars_per_token,
            tokenizer,
        }
    }

    /// Create a chunker with explicit parameters and no tokenizer
    pub fn with_params(chunk_size: usize, overlap: usize, chars_per_token: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            chars_per_token,
            tokenizer: None,
        }
    }

    fn load_tokenizer(path: &Path) -> Option<Tokenizer> {
        match Tokenizer::from_file(path) {
            Ok(tokenizer) => {
                tracing::info!("Loaded tokenizer from {}", path.display());
                Some(tokenizer)
            }
            Err(e) => {
                tracing::warn!("Failed to load tokenizer {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Chunk a single document into overlapping windows.
    ///
    /// Empty content yields an empty chunk list. Every window except
    /// possibly the last has exactly `chunk_size` units; consecutive windows
    /// overlap by exactly `overlap` units.
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        if doc.content.trim().is_empty() {
            return Vec::new();
        }

        if let Some(tokenizer) = &self.tokenizer {
            match self.chunk_tokens(doc, tokenizer) {
                Ok(chunks) => return chunks,
                Err(e) => {
                    tracing::warn!(
                        "Tokenizer failed on '{}' ({}), falling back to character windows",
                        doc.source.filename,
                        e
                    );
                }
            }
        }

        self.chunk_chars(doc)
    }

    /// Chunk all documents, concatenating per-document chunks in document
    /// order. Inputs are not mutated.
    pub fn chunk_corpus(&self, documents: &[Document]) -> Corpus {
        let mut chunks = Vec::new();
        for doc in documents {
            chunks.extend(self.chunk_document(doc));
        }
        tracing::info!(
            "Created {} chunks from {} documents",
            chunks.len(),
            documents.len()
        );
        Corpus::new(chunks)
    }

    fn chunk_tokens(&self, doc: &Document, tokenizer: &Tokenizer) -> tokenizers::Result<Vec<Chunk>> {
        let encoding = tokenizer.encode(doc.content.as_str(), false)?;
        let ids = encoding.get_ids();

        let mut chunks = Vec::new();
        for (index, (start, end)) in sliding_windows(ids.len(), self.chunk_size, self.overlap)
            .into_iter()
            .enumerate()
        {
            let text = tokenizer.decode(&ids[start..end], true)?;
            chunks.push(Chunk::new(
                doc.id,
                text.trim().to_string(),
                doc.source.clone(),
                index as u32,
                start,
                end,
            ));
        }
        Ok(chunks)
    }

    fn chunk_chars(&self, doc: &Document) -> Vec<Chunk> {
        let chars: Vec<char> = doc.content.chars().collect();
        let window = self.chunk_size * self.chars_per_token;
        let overlap = self.overlap * self.chars_per_token;

        sliding_windows(chars.len(), window, overlap)
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                let text: String = chars[start..end].iter().collect();
                Chunk::new(
                    doc.id,
                    text.trim().to_string(),
                    doc.source.clone(),
                    index as u32,
                    start,
                    end,
                )
            })
            .collect()
    }
}

/// Sliding-window offsets over a sequence of `total` units.
///
/// Windows advance by `window - overlap` and stop with the window that
/// reaches the end of the sequence, so the final window may be shorter than
/// `window` but is never fully contained in the previous one.
fn sliding_windows(total: usize, window: usize, overlap: usize) -> Vec<(usize, usize)> {
    debug_assert!(overlap < window, "overlap must be smaller than window");

    let mut windows = Vec::new();
    if total == 0 {
        return windows;
    }

    let step = window - overlap;
    let mut start = 0;
    loop {
        let end = (start + window).min(total);
        windows.push((start, end));
        if end == total {
            break;
        }
        start += step;
    }
    windows
}
