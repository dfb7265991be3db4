//! Okapi BM25 lexical scoring over the chunk corpus
//!
//! Built once from the full corpus; scores are returned aligned to corpus
//! order so they can be joined against vector-index hits by position.

use std::collections::HashMap;

use crate::types::Corpus;

const K1: f32 = 1.5;
const B: f32 = 0.75;
/// Negative IDF values are floored to EPSILON * mean IDF
const EPSILON: f32 = 0.25;

/// In-memory BM25 term-relevance model.
///
/// Tokenization is a case-insensitive whitespace split, independent of the
/// chunker's tokenizer.
pub struct Bm25Model {
    /// Per-chunk term frequencies, in corpus order
    term_freqs: Vec<HashMap<String, u32>>,
    /// Per-chunk token counts, in corpus order
    doc_lens: Vec<f32>,
    /// Average chunk length in tokens
    avgdl: f32,
    /// Inverse document frequency per term
    idf: HashMap<String, f32>,
}

impl Bm25Model {
    /// Build the model from the corpus. An empty corpus is valid and scores
    /// to an empty vector.
    pub fn fit(corpus: &Corpus) -> Self {
        let mut term_freqs = Vec::with_capacity(corpus.len());
        let mut doc_lens = Vec::with_capacity(corpus.len());
        let mut doc_freqs: HashMap<String, u32> = HashMap::new();

        for chunk in corpus.chunks() {
            let tokens = tokenize(&chunk.content);
            doc_lens.push(tokens.len() as f32);

            let mut freqs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *freqs.entry(token).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(freqs);
        }

        let n = term_freqs.len() as f32;
        let avgdl = if term_freqs.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<f32>() / n
        };

        // Okapi IDF with a floor for terms that appear in most chunks:
        // negative values are replaced by EPSILON * mean IDF
        let mut idf: HashMap<String, f32> = doc_freqs
            .iter()
            .map(|(term, &df)| {
                let value = ((n - df as f32 + 0.5) / (df as f32 + 0.5)).ln();
                (term.clone(), value)
            })
            .collect();

        if !idf.is_empty() {
            let mean_idf = idf.values().sum::<f32>() / idf.len() as f32;
            let floor = EPSILON * mean_idf.abs();
            for value in idf.values_mut() {
                if *value < 0.0 {
                    *value = floor;
                }
            }
        }

        tracing::debug!(
            "BM25 model fitted: {} chunks, {} terms, avgdl {:.1}",
            term_freqs.len(),
            idf.len(),
            avgdl
        );

        Self {
            term_freqs,
            doc_lens,
            avgdl,
            idf,
        }
    }

    /// Raw BM25 scores for the query against every chunk, aligned to corpus
    /// order
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let query_terms = tokenize(query);
        let mut scores = vec![0.0f32; self.term_freqs.len()];

        if self.avgdl == 0.0 {
            return scores;
        }

        for term in &query_terms {
            let Some(&idf) = self.idf.get(term) else {
                continue;
            };
            for (i, freqs) in self.term_freqs.iter().enumerate() {
                let tf = *freqs.get(term).unwrap_or(&0) as f32;
                if tf == 0.0 {
                    continue;
                }
                let norm = K1 * (1.0 - B + B * self.doc_lens[i] / self.avgdl);
                scores[i] += idf * tf * (K1 + 1.0) / (tf + norm);
            }
        }

        scores
    }

    /// Number of chunks the model was fitted on
    pub fn len(&self) -> usize {
        self.term_freqs.len()
    }

    /// Check if the model is empty
    pub fn is_empty(&self) -> bool {
        self.term_freqs.is_empty()
    }
}

/// Case-insensitive whitespace tokenization
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}
